use super::dto::{
    CreateVehicle, FeaturedVehiclesQuery, ListVehiclesQuery, ListVehiclesResponse,
    UpdateVehicle,
};
use super::repository::{self, VehicleFilters};
use crate::database::models::Vehicle;
use crate::database::pagination::has_more;
use crate::modules::audit::repository::AuditActor;
use crate::modules::auth::dto::SuccessResponse;
use crate::modules::auth::middleware::AdminSession;
use crate::modules::common::extractors::{SelectedDealership, ValidatedJson, ValidatedQuery};
use crate::modules::common::responses::{internal_error_res, SimpleError};
use crate::modules::dealership;
use crate::server::controller::AppState;
use axum::headers::UserAgent;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router, TypedHeader,
};
use axum_client_ip::SecureClientIp;
use diesel_async::AsyncPgConnection;
use ipnetwork::IpNetwork;

/// routes nested under /api/vehicles, the mutation handlers are layered
/// with session and CSRF checks before the public read handlers are merged
/// into the same paths
pub fn create_vehicle_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle))
        .route("/:vehicle_id", put(update_vehicle).delete(delete_vehicle))
        .layer(axum::middleware::from_fn(
            crate::modules::auth::middleware::check_csrf,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state,
            crate::modules::auth::middleware::require_admin,
        ))
        .route("/", get(list_vehicles))
        .route("/featured", get(featured_vehicles))
        .route("/:vehicle_id", get(get_vehicle))
}

/// resolves the tenant a public storefront query is scoped to, a explicit
/// dealership id wins over a slug, a unknown slug is a 404
async fn resolve_tenant(
    conn: &mut AsyncPgConnection,
    dealership_id: Option<i32>,
    dealership_slug: Option<&str>,
) -> Result<Option<i32>, (StatusCode, SimpleError)> {
    if dealership_id.is_some() {
        return Ok(dealership_id);
    }

    let slug = match dealership_slug {
        Some(slug) => slug,
        None => return Ok(None),
    };

    let found = dealership::repository::find_by_slug(conn, slug)
        .await
        .or(Err(internal_error_res()))?
        .ok_or((
            StatusCode::NOT_FOUND,
            SimpleError::from("dealership not found"),
        ))?;

    Ok(Some(found.id))
}

fn actor_from_request(
    admin_session: &AdminSession,
    dealership_id: i32,
    client_ip: std::net::IpAddr,
    user_agent: Option<TypedHeader<UserAgent>>,
) -> AuditActor {
    AuditActor {
        user_id: admin_session.user_id,
        username: admin_session.username.clone(),
        dealership_id,
        ip: Some(IpNetwork::from(client_ip)),
        user_agent: user_agent.map(|TypedHeader(ua)| ua.to_string()),
    }
}

/// Lists vehicles for the public storefront
///
/// supports filtering, sorting and limit / offset pagination, responses
/// carry the total match count and whether another page exists
#[utoipa::path(
    get,
    path = "/api/vehicles",
    tag = "vehicle",
    params(ListVehiclesQuery),
    responses(
        (
            status = OK,
            body = ListVehiclesResponse,
        ),
        (
            status = BAD_REQUEST,
            description = "invalid filter values",
            body = SimpleError,
        ),
        (
            status = NOT_FOUND,
            description = "unknown dealership slug",
            body = SimpleError,
        ),
    ),
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListVehiclesQuery>,
) -> Result<Json<ListVehiclesResponse>, (StatusCode, SimpleError)> {
    let conn = &mut state.get_db_conn().await?;

    let tenant =
        resolve_tenant(conn, query.dealership_id, query.dealership_slug.as_deref()).await?;

    let filters = VehicleFilters::from_query(&query, tenant);

    let offset = query.offset.unwrap_or(0).max(0);

    let (vehicles, total_count) = repository::list_vehicles(
        conn,
        &filters,
        query.sort_by,
        query.limit.unwrap_or(0),
        offset,
    )
    .await
    .map_err(crate::database::error::DbError::from)?;

    let has_more = has_more(offset, vehicles.len(), total_count);

    Ok(Json(ListVehiclesResponse {
        vehicles,
        total_count,
        has_more,
    }))
}

/// Lists featured vehicles, a fixed size newest first subset
#[utoipa::path(
    get,
    path = "/api/vehicles/featured",
    tag = "vehicle",
    params(FeaturedVehiclesQuery),
    responses(
        (
            status = OK,
            body = Vec<Vehicle>,
        ),
        (
            status = NOT_FOUND,
            description = "unknown dealership slug",
            body = SimpleError,
        ),
    ),
)]
pub async fn featured_vehicles(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<FeaturedVehiclesQuery>,
) -> Result<Json<Vec<Vehicle>>, (StatusCode, SimpleError)> {
    let conn = &mut state.get_db_conn().await?;

    let tenant =
        resolve_tenant(conn, query.dealership_id, query.dealership_slug.as_deref()).await?;

    let vehicles = repository::featured_vehicles(conn, tenant)
        .await
        .map_err(crate::database::error::DbError::from)?;

    Ok(Json(vehicles))
}

/// Gets a single vehicle by id
#[utoipa::path(
    get,
    path = "/api/vehicles/{vehicle_id}",
    tag = "vehicle",
    params(("vehicle_id" = i32, Path, description = "id of the vehicle")),
    responses(
        (
            status = OK,
            body = Vehicle,
        ),
        (
            status = NOT_FOUND,
            body = SimpleError,
        ),
    ),
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<i32>,
) -> Result<Json<Vehicle>, (StatusCode, SimpleError)> {
    let conn = &mut state.get_db_conn().await?;

    let vehicle = repository::find_vehicle(conn, vehicle_id)
        .await
        .map_err(crate::database::error::DbError::from)?
        .ok_or((
            StatusCode::NOT_FOUND,
            SimpleError::from("vehicle not found"),
        ))?;

    Ok(Json(vehicle))
}

/// Creates a vehicle owned by the dealership selected on the session
///
/// the creation and its audit record are committed atomically
#[utoipa::path(
    post,
    path = "/api/vehicles",
    tag = "vehicle",
    security(("session_id" = [])),
    request_body = CreateVehicle,
    responses(
        (
            status = CREATED,
            body = Vehicle,
        ),
        (
            status = BAD_REQUEST,
            description = "invalid dto or a stock number / VIN already in use",
            body = SimpleError,
        ),
        (
            status = UNAUTHORIZED,
            description = "invalid session",
            body = SimpleError,
        ),
        (
            status = FORBIDDEN,
            description = "CSRF failure or no dealership selected",
            body = SimpleError,
        ),
    ),
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    client_ip: SecureClientIp,
    SelectedDealership(dealership_id): SelectedDealership,
    Extension(admin_session): Extension<AdminSession>,
    user_agent: Option<TypedHeader<UserAgent>>,
    ValidatedJson(payload): ValidatedJson<CreateVehicle>,
) -> Result<(StatusCode, Json<Vehicle>), (StatusCode, SimpleError)> {
    let actor = actor_from_request(&admin_session, dealership_id, client_ip.0, user_agent);

    let conn = &mut state.get_db_conn().await?;

    let created = repository::create_vehicle(conn, dealership_id, payload, &actor).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially updates a vehicle owned by the dealership selected on the session
///
/// the update and its audit record are committed atomically, the audit
/// details carry the before image and the changed fields
#[utoipa::path(
    put,
    path = "/api/vehicles/{vehicle_id}",
    tag = "vehicle",
    security(("session_id" = [])),
    params(("vehicle_id" = i32, Path, description = "id of the vehicle to update")),
    request_body = UpdateVehicle,
    responses(
        (
            status = OK,
            body = Vehicle,
        ),
        (
            status = BAD_REQUEST,
            description = "invalid dto or a stock number / VIN already in use",
            body = SimpleError,
        ),
        (
            status = FORBIDDEN,
            description = "vehicle belongs to another dealership",
            body = SimpleError,
        ),
        (
            status = NOT_FOUND,
            body = SimpleError,
        ),
    ),
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    client_ip: SecureClientIp,
    SelectedDealership(dealership_id): SelectedDealership,
    Extension(admin_session): Extension<AdminSession>,
    user_agent: Option<TypedHeader<UserAgent>>,
    Path(vehicle_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateVehicle>,
) -> Result<Json<Vehicle>, (StatusCode, SimpleError)> {
    let actor = actor_from_request(&admin_session, dealership_id, client_ip.0, user_agent);

    let conn = &mut state.get_db_conn().await?;

    let updated =
        repository::update_vehicle(conn, vehicle_id, dealership_id, payload, &actor).await?;

    Ok(Json(updated))
}

/// Deletes a vehicle owned by the dealership selected on the session
///
/// the deletion and its audit record are committed atomically, the audit
/// details carry a final snapshot of the deleted row
#[utoipa::path(
    delete,
    path = "/api/vehicles/{vehicle_id}",
    tag = "vehicle",
    security(("session_id" = [])),
    params(("vehicle_id" = i32, Path, description = "id of the vehicle to delete")),
    responses(
        (
            status = OK,
            body = SuccessResponse,
        ),
        (
            status = FORBIDDEN,
            description = "vehicle belongs to another dealership",
            body = SimpleError,
        ),
        (
            status = NOT_FOUND,
            body = SimpleError,
        ),
    ),
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    client_ip: SecureClientIp,
    SelectedDealership(dealership_id): SelectedDealership,
    Extension(admin_session): Extension<AdminSession>,
    user_agent: Option<TypedHeader<UserAgent>>,
    Path(vehicle_id): Path<i32>,
) -> Result<Json<SuccessResponse>, (StatusCode, SimpleError)> {
    let actor = actor_from_request(&admin_session, dealership_id, client_ip.0, user_agent);

    let conn = &mut state.get_db_conn().await?;

    repository::delete_vehicle(conn, vehicle_id, dealership_id, &actor).await?;

    Ok(Json(SuccessResponse { success: true }))
}
