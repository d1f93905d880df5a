use crate::modules::common::validators::{
    REGEX_IS_DECIMAL, REGEX_IS_ISO_DATE, REGEX_IS_SLUG,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Inquiry payload.
///
/// deliberately carries no dealership field, the tenant is derived server
/// side from the referenced vehicle so clients cannot spoof it
#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiry {
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,

    #[validate(length(min = 1, max = 255))]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub message: String,

    pub vehicle_id: Option<i32>,
}

/// Financing application payload.
///
/// the tenant is resolved from the dealership slug server side, never from
/// a client supplied id
#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFinancingApplication {
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,

    #[validate(length(min = 1, max = 255))]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 50))]
    pub phone: String,

    #[validate(regex(path = "REGEX_IS_ISO_DATE", message = "must be a YYYY-MM-DD date"))]
    pub date_of_birth: String,

    #[validate(length(min = 1, max = 100))]
    pub employment_status: String,

    /// decimal string, eg: "85000.00"
    #[validate(regex(path = "REGEX_IS_DECIMAL", message = "must be a decimal string"))]
    pub annual_income: String,

    #[validate(regex(path = "REGEX_IS_DECIMAL", message = "must be a decimal string"))]
    pub down_payment: Option<String>,

    #[validate(length(max = 5000))]
    pub notes: Option<String>,

    pub vehicle_id: Option<i32>,

    #[validate(regex(path = "REGEX_IS_SLUG", message = "must be a lowercase slug"))]
    pub dealership_slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inquiry_payload_ignores_client_supplied_tenant_fields() {
        let payload: CreateInquiry = serde_json::from_value(serde_json::json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "message": "is this still available?",
            "vehicleId": 3,
            "dealershipId": 999
        }))
        .unwrap();

        assert!(payload.validate().is_ok());
        assert_eq!(payload.vehicle_id, Some(3));
    }

    #[test]
    fn financing_application_requires_a_valid_birth_date() {
        let payload: CreateFinancingApplication =
            serde_json::from_value(serde_json::json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@example.com",
                "phone": "555-0100",
                "dateOfBirth": "not a date",
                "employmentStatus": "employed",
                "annualIncome": "85000.00",
                "dealershipSlug": "trex-auto-sales"
            }))
            .unwrap();

        assert!(payload.validate().is_err());
    }
}
