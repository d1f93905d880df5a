use crate::database::models::AuditLog;
use crate::database::schema::audit_log;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use ipnetwork::IpNetwork;
use strum::Display;

/// hard cap on audit listing page sizes, bounds the response size no matter
/// what the caller asks for
pub const MAX_AUDIT_LOG_LIMIT: i64 = 500;

pub const VEHICLE_ENTITY_TYPE: &str = "vehicle";

#[derive(Debug, Clone, Copy, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

/// the admin responsible for an audited mutation, resolved from the request
/// session and connection, never from the request body
pub struct AuditActor {
    pub user_id: i32,
    pub username: String,
    pub dealership_id: i32,
    pub ip: Option<IpNetwork>,
    pub user_agent: Option<String>,
}

/// Appends an audit record.
///
/// takes a plain connection instead of the pool so callers can run the
/// append inside the same transaction as the audited mutation.
pub async fn append_audit_log(
    conn: &mut AsyncPgConnection,
    actor: &AuditActor,
    action: AuditAction,
    entity_type: &str,
    entity_id: i32,
    details: serde_json::Value,
) -> Result<AuditLog, diesel::result::Error> {
    diesel::insert_into(audit_log::table)
        .values((
            audit_log::action.eq(action.to_string()),
            audit_log::entity_type.eq(entity_type),
            audit_log::entity_id.eq(entity_id),
            audit_log::username.eq(&actor.username),
            audit_log::details.eq(&details),
            audit_log::ip.eq(actor.ip),
            audit_log::user_agent.eq(actor.user_agent.as_deref()),
            audit_log::user_id.eq(actor.user_id),
            audit_log::dealership_id.eq(actor.dealership_id),
        ))
        .get_result::<AuditLog>(conn)
        .await
}

/// Lists audit records of a single dealership, newest first.
///
/// the limit is clamped to `MAX_AUDIT_LOG_LIMIT`, there is intentionally no
/// way to pass a dealership id other than the scoped one.
pub async fn list_audit_logs(
    conn: &mut AsyncPgConnection,
    dealership_id: i32,
    limit: i64,
) -> Result<Vec<AuditLog>, diesel::result::Error> {
    let clamped_limit = clamp_audit_limit(limit);

    audit_log::table
        .filter(audit_log::dealership_id.eq(dealership_id))
        .order(audit_log::created_at.desc())
        .limit(clamped_limit)
        .select(AuditLog::as_select())
        .load::<AuditLog>(conn)
        .await
}

pub fn clamp_audit_limit(limit: i64) -> i64 {
    if limit <= 0 {
        return 100;
    }

    limit.min(MAX_AUDIT_LOG_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_actions_serialize_lowercase() {
        assert_eq!(AuditAction::Create.to_string(), "create");
        assert_eq!(AuditAction::Update.to_string(), "update");
        assert_eq!(AuditAction::Delete.to_string(), "delete");
    }

    #[test]
    fn audit_limit_is_clamped() {
        assert_eq!(clamp_audit_limit(0), 100);
        assert_eq!(clamp_audit_limit(-1), 100);
        assert_eq!(clamp_audit_limit(50), 50);
        assert_eq!(clamp_audit_limit(500), 500);
        assert_eq!(clamp_audit_limit(10_000), 500);
    }
}
