use super::dto::{CreateFinancingApplication, CreateInquiry};
use crate::database::models::{FinancingApplication, Inquiry};
use crate::database::schema::{financing_application, inquiry};
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use std::str::FromStr;

/// Inserts an inquiry, `dealership_id` must come from the referenced
/// vehicle and never from the client
pub async fn create_inquiry(
    conn: &mut AsyncPgConnection,
    dto: &CreateInquiry,
    dealership_id: Option<i32>,
) -> Result<Inquiry, diesel::result::Error> {
    diesel::insert_into(inquiry::table)
        .values((
            inquiry::first_name.eq(&dto.first_name),
            inquiry::last_name.eq(&dto.last_name),
            inquiry::email.eq(&dto.email),
            inquiry::phone.eq(&dto.phone),
            inquiry::message.eq(&dto.message),
            inquiry::vehicle_id.eq(dto.vehicle_id),
            inquiry::dealership_id.eq(dealership_id),
        ))
        .get_result(conn)
        .await
}

/// money fields arrive as decimal strings that the dto regex already
/// vetted, a parse failure here means the dto and this fn disagree
pub fn parse_money(raw: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(raw).ok()
}

/// Inserts a financing application, `dealership_id` must come from the
/// slug lookup and never from the client
pub async fn create_financing_application(
    conn: &mut AsyncPgConnection,
    dto: &CreateFinancingApplication,
    dealership_id: i32,
    annual_income: BigDecimal,
    down_payment: Option<BigDecimal>,
) -> Result<FinancingApplication, diesel::result::Error> {
    diesel::insert_into(financing_application::table)
        .values((
            financing_application::first_name.eq(&dto.first_name),
            financing_application::last_name.eq(&dto.last_name),
            financing_application::email.eq(&dto.email),
            financing_application::phone.eq(&dto.phone),
            financing_application::date_of_birth.eq(&dto.date_of_birth),
            financing_application::employment_status.eq(&dto.employment_status),
            financing_application::annual_income.eq(annual_income),
            financing_application::down_payment.eq(down_payment),
            financing_application::notes.eq(&dto.notes),
            financing_application::vehicle_id.eq(dto.vehicle_id),
            financing_application::dealership_id.eq(dealership_id),
        ))
        .get_result(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_strings_parse() {
        assert_eq!(parse_money("85000.00"), BigDecimal::from_str("85000.00").ok());
        assert_eq!(parse_money("not money"), None);
    }
}
