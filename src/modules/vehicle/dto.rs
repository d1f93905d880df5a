use crate::database::models::Vehicle;
use crate::database::schema::vehicle;
use crate::modules::common::validators::{is_vehicle_status, REGEX_IS_DECIMAL, REGEX_IS_VIN};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::AsChangeset;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum VehicleStatus {
    Available,
    Pending,
    Sold,
}

/// sort keys accepted by the vehicle listing, the wire format is
/// `<field>-<direction>`, eg: `price-asc`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    PriceAsc,
    PriceDesc,
    YearAsc,
    YearDesc,
    MileageAsc,
    MileageDesc,
}

#[derive(Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListVehiclesQuery {
    /// substring match on the make
    pub make: Option<String>,

    /// substring match on the model
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year_min: Option<i32>,

    #[validate(range(min = 1900, max = 2100))]
    pub year_max: Option<i32>,

    #[validate(regex(path = "REGEX_IS_DECIMAL", message = "must be a decimal string"))]
    pub price_min: Option<String>,

    #[validate(regex(path = "REGEX_IS_DECIMAL", message = "must be a decimal string"))]
    pub price_max: Option<String>,

    /// free text search over make, model and trim
    pub search_query: Option<String>,

    pub sort_by: Option<SortBy>,

    #[validate(range(min = 1))]
    pub limit: Option<i64>,

    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    pub dealership_id: Option<i32>,

    pub dealership_slug: Option<String>,
}

#[derive(Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FeaturedVehiclesQuery {
    pub dealership_id: Option<i32>,

    pub dealership_slug: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListVehiclesResponse {
    pub vehicles: Vec<Vehicle>,
    pub total_count: i64,
    pub has_more: bool,
}

fn def_condition() -> String {
    String::from("used")
}

fn def_status() -> String {
    VehicleStatus::Available.to_string()
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicle {
    #[validate(length(min = 1, max = 255))]
    pub make: String,

    #[validate(length(min = 1, max = 255))]
    pub model: String,

    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    #[validate(length(max = 255))]
    pub trim: Option<String>,

    /// decimal string, eg: "18999.00"
    #[validate(regex(path = "REGEX_IS_DECIMAL", message = "must be a decimal string"))]
    pub price: String,

    #[validate(range(min = 0))]
    #[serde(default)]
    pub mileage: i32,

    #[serde(default = "def_condition")]
    #[validate(length(min = 1, max = 50))]
    pub condition: String,

    pub exterior_color: Option<String>,

    pub interior_color: Option<String>,

    pub fuel_type: Option<String>,

    pub transmission: Option<String>,

    pub drivetrain: Option<String>,

    #[serde(default)]
    pub features: Vec<String>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default = "def_status")]
    #[validate(custom = "is_vehicle_status")]
    pub status: String,

    #[validate(length(max = 100))]
    pub status_banner: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub stock_number: String,

    #[validate(regex(path = "REGEX_IS_VIN", message = "invalid VIN"))]
    pub vin: String,

    #[serde(default)]
    pub is_featured: bool,

    pub description: Option<String>,
}

/// Partial update payload.
///
/// double optioned fields distinguish "absent from the payload" from an
/// explicit null that clears the column. there is deliberately no
/// `dealershipId` field: vehicles cannot be reassigned between dealerships
/// through the update endpoint.
#[derive(Deserialize, Validate, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicle {
    #[validate(length(min = 1, max = 255))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub trim: Option<Option<String>>,

    #[validate(regex(path = "REGEX_IS_DECIMAL", message = "must be a decimal string"))]
    pub price: Option<String>,

    #[validate(range(min = 0))]
    pub mileage: Option<i32>,

    #[validate(length(min = 1, max = 50))]
    pub condition: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub exterior_color: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub interior_color: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub fuel_type: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub transmission: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub drivetrain: Option<Option<String>>,

    pub features: Option<Vec<String>>,

    pub images: Option<Vec<String>>,

    #[validate(custom = "is_vehicle_status")]
    pub status: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub status_banner: Option<Option<String>>,

    #[validate(length(min = 1, max = 100))]
    pub stock_number: Option<String>,

    #[validate(regex(path = "REGEX_IS_VIN", message = "invalid VIN"))]
    pub vin: Option<String>,

    pub is_featured: Option<bool>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
}

/// diesel changeset built from a `UpdateVehicle` payload, note the absence
/// of the `dealership_id` column
#[derive(AsChangeset)]
#[diesel(table_name = vehicle)]
pub struct VehicleChangeset {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub trim: Option<Option<String>>,
    pub price: Option<BigDecimal>,
    pub mileage: Option<i32>,
    pub condition: Option<String>,
    pub exterior_color: Option<Option<String>>,
    pub interior_color: Option<Option<String>>,
    pub fuel_type: Option<Option<String>>,
    pub transmission: Option<Option<String>>,
    pub drivetrain: Option<Option<String>>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub status: Option<String>,
    pub status_banner: Option<Option<String>>,
    pub stock_number: Option<String>,
    pub vin: Option<String>,
    pub is_featured: Option<bool>,
    pub description: Option<Option<String>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_by_accepts_the_documented_wire_values() {
        let parse = |v: &str| serde_json::from_value::<SortBy>(serde_json::json!(v));

        assert_eq!(parse("price-asc").unwrap(), SortBy::PriceAsc);
        assert_eq!(parse("price-desc").unwrap(), SortBy::PriceDesc);
        assert_eq!(parse("year-asc").unwrap(), SortBy::YearAsc);
        assert_eq!(parse("mileage-desc").unwrap(), SortBy::MileageDesc);
        assert!(parse("created-asc").is_err());
    }

    #[test]
    fn create_vehicle_rejects_invalid_payloads() {
        let payload: CreateVehicle = serde_json::from_value(serde_json::json!({
            "make": "Toyota",
            "model": "Corolla",
            "year": 2020,
            "price": "not-a-price",
            "stockNumber": "C-1",
            "vin": "1HGBH41JXMN109186"
        }))
        .unwrap();

        assert!(payload.validate().is_err());
    }

    #[test]
    fn create_vehicle_defaults() {
        let payload: CreateVehicle = serde_json::from_value(serde_json::json!({
            "make": "Toyota",
            "model": "Corolla",
            "year": 2020,
            "price": "18999.00",
            "stockNumber": "C-1",
            "vin": "1HGBH41JXMN109186"
        }))
        .unwrap();

        assert!(payload.validate().is_ok());
        assert_eq!(payload.status, "available");
        assert_eq!(payload.condition, "used");
        assert_eq!(payload.mileage, 0);
        assert!(!payload.is_featured);
    }

    #[test]
    fn update_vehicle_distinguishes_absent_from_null() {
        let payload: UpdateVehicle = serde_json::from_value(serde_json::json!({
            "statusBanner": null,
            "price": "12000.00"
        }))
        .unwrap();

        // explicit null clears the column
        assert_eq!(payload.status_banner, Some(None));
        // absent fields stay untouched
        assert_eq!(payload.trim, None);
        assert_eq!(payload.price.as_deref(), Some("12000.00"));
    }

    #[test]
    fn update_vehicle_has_no_dealership_field() {
        // a client supplied dealershipId is silently dropped instead of
        // reassigning the vehicle to another tenant
        let payload: UpdateVehicle = serde_json::from_value(serde_json::json!({
            "dealershipId": 999,
            "make": "Honda"
        }))
        .unwrap();

        assert_eq!(payload.make.as_deref(), Some("Honda"));
    }
}
