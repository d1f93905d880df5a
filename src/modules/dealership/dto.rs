use crate::database::schema::dealership;
use crate::modules::common::validators::{REGEX_IS_HEX_COLOR, REGEX_IS_SLUG};
use chrono::{DateTime, Utc};
use diesel::AsChangeset;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Partial update of the tenant branding / contact profile, double optioned
/// fields distinguish "absent" from an explicit null that clears the column
#[derive(Deserialize, Validate, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDealership {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(regex(path = "REGEX_IS_SLUG", message = "must be a lowercase slug"))]
    pub slug: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub custom_domain: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub logo_url: Option<Option<String>>,

    #[validate(regex(path = "REGEX_IS_HEX_COLOR", message = "must be a hex color"))]
    pub primary_color: Option<String>,

    #[validate(regex(path = "REGEX_IS_HEX_COLOR", message = "must be a hex color"))]
    pub secondary_color: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub phone: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub email: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub address: Option<Option<String>>,
}

#[derive(AsChangeset)]
#[diesel(table_name = dealership)]
pub struct DealershipChangeset {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub custom_domain: Option<Option<String>>,
    pub logo_url: Option<Option<String>>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<UpdateDealership> for DealershipChangeset {
    fn from(dto: UpdateDealership) -> Self {
        DealershipChangeset {
            name: dto.name,
            slug: dto.slug,
            custom_domain: dto.custom_domain,
            logo_url: dto.logo_url,
            primary_color: dto.primary_color,
            secondary_color: dto.secondary_color,
            phone: dto.phone,
            email: dto.email,
            address: dto.address,
            updated_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_dealership_validates_colors_and_slug() {
        let valid: UpdateDealership = serde_json::from_value(serde_json::json!({
            "slug": "trex-auto-sales",
            "primaryColor": "#1a2b3c"
        }))
        .unwrap();

        assert!(valid.validate().is_ok());

        let invalid: UpdateDealership = serde_json::from_value(serde_json::json!({
            "slug": "Not A Slug",
            "primaryColor": "blue"
        }))
        .unwrap();

        assert!(invalid.validate().is_err());
    }

    #[test]
    fn clearing_the_custom_domain_requires_an_explicit_null() {
        let payload: UpdateDealership = serde_json::from_value(serde_json::json!({
            "customDomain": null
        }))
        .unwrap();

        assert_eq!(payload.custom_domain, Some(None));
        assert_eq!(payload.logo_url, None);
    }
}
