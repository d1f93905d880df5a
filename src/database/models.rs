use bigdecimal::BigDecimal;
use chrono::offset::Utc;
use chrono::DateTime;
use diesel::{Identifiable, Queryable, Selectable};
use ipnetwork::IpNetwork;
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

/// serializes a `NUMERIC` column as a plain decimal string, the wire
/// format for money values is a string such as "18999.00"
fn decimal_string<S: Serializer>(v: &BigDecimal, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&v.to_string())
}

fn opt_decimal_string<S: Serializer>(
    v: &Option<BigDecimal>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match v {
        Some(d) => s.serialize_some(&d.to_string()),
        None => s.serialize_none(),
    }
}

/// A tenant, all storefront and lead data is partitioned by this id
#[derive(Queryable, Debug, Identifiable, Selectable, Serialize, Clone, ToSchema)]
#[diesel(table_name = crate::database::schema::dealership)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Dealership {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub name: String,
    pub slug: String,
    pub custom_domain: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
}

#[derive(Queryable, Debug, Identifiable, Selectable, Serialize, Clone, ToSchema)]
#[diesel(table_name = crate::database::schema::vehicle)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub trim: Option<String>,
    #[serde(serialize_with = "decimal_string")]
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub mileage: i32,
    pub condition: String,
    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub drivetrain: Option<String>,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub status: String,
    pub status_banner: Option<String>,
    pub stock_number: String,
    pub vin: String,
    pub is_featured: bool,
    pub description: Option<String>,
    pub dealership_id: Option<i32>,
}

#[derive(Queryable, Debug, Identifiable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = crate::database::schema::inquiry)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub vehicle_id: Option<i32>,
    pub dealership_id: Option<i32>,
}

#[derive(Queryable, Debug, Identifiable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = crate::database::schema::financing_application)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct FinancingApplication {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub employment_status: String,
    #[serde(serialize_with = "decimal_string")]
    #[schema(value_type = String)]
    pub annual_income: BigDecimal,
    #[serde(serialize_with = "opt_decimal_string")]
    #[schema(value_type = Option<String>)]
    pub down_payment: Option<BigDecimal>,
    pub notes: Option<String>,
    pub vehicle_id: Option<i32>,
    pub dealership_id: i32,
}

/// An admin dashboard user, the password is a bcrypt hash and must
/// never be serialized in any response body
#[derive(Queryable, Debug, Identifiable, Selectable, Clone)]
#[diesel(table_name = crate::database::schema::app_user)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub username: String,
    pub password: String,
    pub dealership_id: Option<i32>,
}

#[derive(Queryable, Debug, Identifiable, Selectable, Clone)]
#[diesel(primary_key(session_token))]
#[diesel(table_name = crate::database::schema::session)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Session {
    pub session_token: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub user_agent: String,
    pub ip: IpNetwork,
    pub csrf_token: Option<String>,
    pub selected_dealership_id: Option<i32>,
    pub user_id: i32,
}

/// Append only record of an administrative mutation
#[derive(Queryable, Debug, Identifiable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = crate::database::schema::audit_log)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: i32,
    pub username: String,
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
    #[schema(value_type = Option<String>)]
    pub ip: Option<IpNetwork>,
    pub user_agent: Option<String>,
    pub user_id: Option<i32>,
    pub dealership_id: Option<i32>,
}
