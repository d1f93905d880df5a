use super::dto::{CreateVehicle, ListVehiclesQuery, SortBy, UpdateVehicle, VehicleChangeset};
use crate::database::error::DbError;
use crate::database::models::Vehicle;
use crate::database::pagination::Paginate;
use crate::database::schema::vehicle;
use crate::modules::audit::repository::{
    append_audit_log, AuditAction, AuditActor, VEHICLE_ENTITY_TYPE,
};
use crate::modules::audit::snapshot;
use crate::modules::common::responses::SimpleError;
use axum::http::StatusCode;
use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use std::str::FromStr;

pub const FEATURED_VEHICLES_LIMIT: i64 = 8;

pub enum VehicleMutationError {
    /// no vehicle with the requested id
    NotFound,

    /// the vehicle exists but belongs to another dealership
    NotOwned,

    /// the payload carried a price that cannot be stored as `NUMERIC`
    InvalidPrice,

    Db(DbError),
}

impl From<diesel::result::Error> for VehicleMutationError {
    fn from(err: diesel::result::Error) -> Self {
        VehicleMutationError::Db(DbError::from(err))
    }
}

impl From<VehicleMutationError> for (StatusCode, SimpleError) {
    fn from(err: VehicleMutationError) -> Self {
        match err {
            VehicleMutationError::NotFound => {
                (StatusCode::NOT_FOUND, SimpleError::from("vehicle not found"))
            }
            VehicleMutationError::NotOwned => (
                StatusCode::FORBIDDEN,
                SimpleError::from(crate::modules::common::error_codes::DEALERSHIP_ACCESS_DENIED),
            ),
            VehicleMutationError::InvalidPrice => {
                (StatusCode::BAD_REQUEST, SimpleError::from("invalid price"))
            }
            VehicleMutationError::Db(db_err) => db_err.into(),
        }
    }
}

/// normalized storefront listing filters, price bounds already parsed
/// out of their wire format
#[derive(Debug, Default, PartialEq)]
pub struct VehicleFilters {
    pub dealership_id: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub price_min: Option<BigDecimal>,
    pub price_max: Option<BigDecimal>,
    pub search: Option<String>,
}

impl VehicleFilters {
    /// `dealership_id` is resolved separately since the query might carry a
    /// slug instead of a id
    pub fn from_query(query: &ListVehiclesQuery, dealership_id: Option<i32>) -> Self {
        VehicleFilters {
            dealership_id,
            make: query.make.clone(),
            model: query.model.clone(),
            year_min: query.year_min,
            year_max: query.year_max,
            price_min: parse_decimal(query.price_min.as_deref()),
            price_max: parse_decimal(query.price_max.as_deref()),
            search: query.search_query.clone(),
        }
    }
}

fn parse_decimal(raw: Option<&str>) -> Option<BigDecimal> {
    raw.and_then(|value| BigDecimal::from_str(value).ok())
}

/// escapes `LIKE` pattern metacharacters so user input matches literally
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input))
}

fn filtered_query(filters: &VehicleFilters) -> vehicle::BoxedQuery<'static, Pg> {
    let mut query = vehicle::table.into_boxed();

    if let Some(dealership_id) = filters.dealership_id {
        query = query.filter(vehicle::dealership_id.eq(dealership_id));
    }

    if let Some(make) = &filters.make {
        query = query.filter(vehicle::make.ilike(contains_pattern(make)));
    }

    if let Some(model) = &filters.model {
        query = query.filter(vehicle::model.ilike(contains_pattern(model)));
    }

    if let Some(year_min) = filters.year_min {
        query = query.filter(vehicle::year.ge(year_min));
    }

    if let Some(year_max) = filters.year_max {
        query = query.filter(vehicle::year.le(year_max));
    }

    if let Some(price_min) = &filters.price_min {
        query = query.filter(vehicle::price.ge(price_min.clone()));
    }

    if let Some(price_max) = &filters.price_max {
        query = query.filter(vehicle::price.le(price_max.clone()));
    }

    if let Some(search) = &filters.search {
        let pattern = contains_pattern(search);

        // the nullable trim column must come first so the whole
        // condition types as a nullable boolean
        query = query.filter(
            vehicle::trim
                .ilike(pattern.clone())
                .or(vehicle::make.ilike(pattern.clone()))
                .or(vehicle::model.ilike(pattern)),
        );
    }

    query
}

/// Lists vehicles matching the filters, returning the requested page and
/// the total count the filters match without pagination
pub async fn list_vehicles(
    conn: &mut AsyncPgConnection,
    filters: &VehicleFilters,
    sort_by: Option<SortBy>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Vehicle>, i64), diesel::result::Error> {
    let query = filtered_query(filters);

    let query = match sort_by {
        Some(SortBy::PriceAsc) => query.order(vehicle::price.asc()),
        Some(SortBy::PriceDesc) => query.order(vehicle::price.desc()),
        Some(SortBy::YearAsc) => query.order(vehicle::year.asc()),
        Some(SortBy::YearDesc) => query.order(vehicle::year.desc()),
        Some(SortBy::MileageAsc) => query.order(vehicle::mileage.asc()),
        Some(SortBy::MileageDesc) => query.order(vehicle::mileage.desc()),
        // newest first when no sort is requested
        None => query.order(vehicle::created_at.desc()),
    };

    let (vehicles, mut total) = query
        .then_order_by(vehicle::id.asc())
        .paginate(limit, offset)
        .load_and_count::<Vehicle>(conn)
        .await?;

    // the window count comes back with the rows, so an offset past the
    // last match returns no rows and a zero count even when the filters
    // match records
    if vehicles.is_empty() && offset > 0 {
        total = filtered_query(filters).count().get_result(conn).await?;
    }

    Ok((vehicles, total))
}

/// newest featured vehicles, capped at a fixed small page
pub async fn featured_vehicles(
    conn: &mut AsyncPgConnection,
    dealership_id: Option<i32>,
) -> Result<Vec<Vehicle>, diesel::result::Error> {
    let mut query = vehicle::table.into_boxed();

    if let Some(dealership_id) = dealership_id {
        query = query.filter(vehicle::dealership_id.eq(dealership_id));
    }

    query
        .filter(vehicle::is_featured.eq(true))
        .order(vehicle::created_at.desc())
        .limit(FEATURED_VEHICLES_LIMIT)
        .load::<Vehicle>(conn)
        .await
}

pub async fn find_vehicle(
    conn: &mut AsyncPgConnection,
    vehicle_id: i32,
) -> Result<Option<Vehicle>, diesel::result::Error> {
    Vehicle::all()
        .find(vehicle_id)
        .first(conn)
        .await
        .optional()
}

/// a vehicle with a null dealership is legacy inventory no tenant owns,
/// so it fails the check for every caller
fn is_owned_by(vehicle: &Vehicle, dealership_id: i32) -> bool {
    vehicle.dealership_id == Some(dealership_id)
}

/// Single gate for every mutation that targets an existing vehicle, the
/// dealership id is required so call sites cannot skip the ownership check
async fn find_owned_vehicle(
    conn: &mut AsyncPgConnection,
    vehicle_id: i32,
    dealership_id: i32,
) -> Result<Vehicle, VehicleMutationError> {
    let vehicle = find_vehicle(conn, vehicle_id)
        .await?
        .ok_or(VehicleMutationError::NotFound)?;

    if !is_owned_by(&vehicle, dealership_id) {
        return Err(VehicleMutationError::NotOwned);
    }

    Ok(vehicle)
}

/// Inserts a vehicle owned by the dealership and its creation audit record
/// in a single transaction
pub async fn create_vehicle(
    conn: &mut AsyncPgConnection,
    dealership_id: i32,
    dto: CreateVehicle,
    actor: &AuditActor,
) -> Result<Vehicle, VehicleMutationError> {
    let price =
        BigDecimal::from_str(&dto.price).or(Err(VehicleMutationError::InvalidPrice))?;

    let created = conn
        .transaction::<Vehicle, diesel::result::Error, _>(|conn| {
            async move {
                let created: Vehicle = diesel::insert_into(vehicle::table)
                    .values((
                        vehicle::make.eq(&dto.make),
                        vehicle::model.eq(&dto.model),
                        vehicle::year.eq(dto.year),
                        vehicle::trim.eq(&dto.trim),
                        vehicle::price.eq(&price),
                        vehicle::mileage.eq(dto.mileage),
                        vehicle::condition.eq(&dto.condition),
                        vehicle::exterior_color.eq(&dto.exterior_color),
                        vehicle::interior_color.eq(&dto.interior_color),
                        vehicle::fuel_type.eq(&dto.fuel_type),
                        vehicle::transmission.eq(&dto.transmission),
                        vehicle::drivetrain.eq(&dto.drivetrain),
                        vehicle::features.eq(&dto.features),
                        vehicle::images.eq(&dto.images),
                        vehicle::status.eq(&dto.status),
                        vehicle::status_banner.eq(&dto.status_banner),
                        vehicle::stock_number.eq(&dto.stock_number),
                        vehicle::vin.eq(&dto.vin),
                        vehicle::is_featured.eq(dto.is_featured),
                        vehicle::description.eq(&dto.description),
                        vehicle::dealership_id.eq(dealership_id),
                    ))
                    .get_result(conn)
                    .await?;

                append_audit_log(
                    conn,
                    actor,
                    AuditAction::Create,
                    VEHICLE_ENTITY_TYPE,
                    created.id,
                    snapshot::creation_snapshot(&created),
                )
                .await?;

                Ok(created)
            }
            .scope_boxed()
        })
        .await?;

    Ok(created)
}

fn build_changeset(dto: UpdateVehicle) -> Result<VehicleChangeset, VehicleMutationError> {
    let price = match dto.price {
        Some(raw) => {
            Some(BigDecimal::from_str(&raw).or(Err(VehicleMutationError::InvalidPrice))?)
        }
        None => None,
    };

    Ok(VehicleChangeset {
        make: dto.make,
        model: dto.model,
        year: dto.year,
        trim: dto.trim,
        price,
        mileage: dto.mileage,
        condition: dto.condition,
        exterior_color: dto.exterior_color,
        interior_color: dto.interior_color,
        fuel_type: dto.fuel_type,
        transmission: dto.transmission,
        drivetrain: dto.drivetrain,
        features: dto.features,
        images: dto.images,
        status: dto.status,
        status_banner: dto.status_banner,
        stock_number: dto.stock_number,
        vin: dto.vin,
        is_featured: dto.is_featured,
        description: dto.description,
        updated_at: Some(Utc::now()),
    })
}

/// Applies a partial update to a vehicle owned by the dealership, writing
/// the update and its audit record in a single transaction
pub async fn update_vehicle(
    conn: &mut AsyncPgConnection,
    vehicle_id: i32,
    dealership_id: i32,
    dto: UpdateVehicle,
    actor: &AuditActor,
) -> Result<Vehicle, VehicleMutationError> {
    let before = find_owned_vehicle(conn, vehicle_id, dealership_id).await?;

    let changeset = build_changeset(dto)?;

    let updated = conn
        .transaction::<Vehicle, diesel::result::Error, _>(|conn| {
            async move {
                let updated: Vehicle = diesel::update(vehicle::table.find(vehicle_id))
                    .set(changeset)
                    .get_result(conn)
                    .await?;

                append_audit_log(
                    conn,
                    actor,
                    AuditAction::Update,
                    VEHICLE_ENTITY_TYPE,
                    vehicle_id,
                    snapshot::change_set(&before, &updated),
                )
                .await?;

                Ok(updated)
            }
            .scope_boxed()
        })
        .await?;

    Ok(updated)
}

/// Deletes a vehicle owned by the dealership, the deletion and its audit
/// record happen in a single transaction
pub async fn delete_vehicle(
    conn: &mut AsyncPgConnection,
    vehicle_id: i32,
    dealership_id: i32,
    actor: &AuditActor,
) -> Result<(), VehicleMutationError> {
    let vehicle = find_owned_vehicle(conn, vehicle_id, dealership_id).await?;

    conn.transaction::<(), diesel::result::Error, _>(|conn| {
        async move {
            diesel::delete(vehicle::table.find(vehicle_id))
                .execute(conn)
                .await?;

            append_audit_log(
                conn,
                actor,
                AuditAction::Delete,
                VEHICLE_ENTITY_TYPE,
                vehicle_id,
                snapshot::deletion_snapshot(&vehicle),
            )
            .await?;

            Ok(())
        }
        .scope_boxed()
    })
    .await?;

    Ok(())
}

/// Ids of vehicles a public sitemap should link to
pub async fn available_vehicle_ids(
    conn: &mut AsyncPgConnection,
) -> Result<Vec<i32>, diesel::result::Error> {
    vehicle::table
        .filter(vehicle::status.ne("sold"))
        .order(vehicle::id.asc())
        .select(vehicle::id)
        .load::<i32>(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::vehicle::dto::ListVehiclesQuery;

    fn empty_query() -> ListVehiclesQuery {
        ListVehiclesQuery {
            make: None,
            model: None,
            year_min: None,
            year_max: None,
            price_min: None,
            price_max: None,
            search_query: None,
            sort_by: None,
            limit: None,
            offset: None,
            dealership_id: None,
            dealership_slug: None,
        }
    }

    #[test]
    fn filters_parse_price_bounds() {
        let mut query = empty_query();
        query.price_min = Some(String::from("5000"));
        query.price_max = Some(String::from("15000.50"));

        let filters = VehicleFilters::from_query(&query, Some(1));

        assert_eq!(filters.dealership_id, Some(1));
        assert_eq!(filters.price_min, BigDecimal::from_str("5000").ok());
        assert_eq!(filters.price_max, BigDecimal::from_str("15000.50").ok());
    }

    #[test]
    fn filters_drop_unparseable_prices() {
        let mut query = empty_query();
        query.price_min = Some(String::from("not a number"));

        let filters = VehicleFilters::from_query(&query, None);

        assert_eq!(filters.price_min, None);
    }

    #[test]
    fn like_patterns_are_escaped() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c\\d"), "c\\\\d");
        assert_eq!(contains_pattern("civic"), "%civic%");
    }

    fn vehicle_of_dealership(dealership_id: Option<i32>) -> Vehicle {
        Vehicle {
            id: 1,
            created_at: Utc::now(),
            updated_at: None,
            make: String::from("Honda"),
            model: String::from("Civic"),
            year: 2019,
            trim: None,
            price: BigDecimal::from_str("18500.00").unwrap(),
            mileage: 62000,
            condition: String::from("used"),
            exterior_color: None,
            interior_color: None,
            fuel_type: None,
            transmission: None,
            drivetrain: None,
            features: vec![],
            images: vec![],
            status: String::from("available"),
            status_banner: None,
            stock_number: String::from("H-2201"),
            vin: String::from("2HGFC2F59KH500001"),
            is_featured: false,
            description: None,
            dealership_id,
        }
    }

    #[test]
    fn ownership_requires_the_exact_dealership() {
        let owned = vehicle_of_dealership(Some(3));

        assert!(is_owned_by(&owned, 3));
        assert!(!is_owned_by(&owned, 4));
    }

    #[test]
    fn legacy_vehicles_without_a_dealership_are_owned_by_nobody() {
        let legacy = vehicle_of_dealership(None);

        assert!(!is_owned_by(&legacy, 3));
    }

    #[test]
    fn cross_tenant_mutations_are_forbidden() {
        let (status, _) = <(StatusCode, SimpleError)>::from(VehicleMutationError::NotOwned);
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = <(StatusCode, SimpleError)>::from(VehicleMutationError::NotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn filtered_query_binds_every_filter() {
        let filters = VehicleFilters {
            dealership_id: Some(1),
            make: Some(String::from("Toyota")),
            model: None,
            year_min: Some(2015),
            year_max: None,
            price_min: BigDecimal::from_str("1000").ok(),
            price_max: None,
            search: Some(String::from("corolla")),
        };

        let sql = diesel::debug_query::<Pg, _>(&filtered_query(&filters)).to_string();

        assert!(sql.contains("\"vehicle\".\"dealership_id\" = "));
        assert!(sql.contains("ILIKE"));
        assert!(sql.contains("\"vehicle\".\"year\" >= "));
        assert!(sql.contains("\"vehicle\".\"price\" >= "));
    }

    #[test]
    fn out_of_range_pages_recount_with_the_same_filters() {
        let filters = VehicleFilters {
            dealership_id: Some(1),
            make: Some(String::from("Toyota")),
            ..Default::default()
        };

        let sql = diesel::debug_query::<Pg, _>(&filtered_query(&filters).count()).to_string();

        assert!(sql.contains("count(*)") || sql.contains("COUNT(*)"));
        assert!(sql.contains("\"vehicle\".\"dealership_id\" = "));
        assert!(sql.contains("ILIKE"));
    }
}
