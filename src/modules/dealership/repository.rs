use super::dto::DealershipChangeset;
use crate::database::models::Dealership;
use crate::database::schema::dealership;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

/// Finds an active dealership by its slug, disabled tenants are treated
/// as missing everywhere on the public surface
pub async fn find_by_slug(
    conn: &mut AsyncPgConnection,
    slug: &str,
) -> Result<Option<Dealership>, diesel::result::Error> {
    Dealership::by_slug(slug)
        .filter(dealership::is_active.eq(true))
        .first(conn)
        .await
        .optional()
}

pub async fn update_dealership(
    conn: &mut AsyncPgConnection,
    dealership_id: i32,
    changeset: DealershipChangeset,
) -> Result<Dealership, diesel::result::Error> {
    diesel::update(dealership::table.find(dealership_id))
        .set(changeset)
        .get_result(conn)
        .await
}
