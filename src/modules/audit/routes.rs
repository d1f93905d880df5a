use super::dto::ListAuditLogsQuery;
use super::repository;
use crate::database::models::AuditLog;
use crate::modules::auth;
use crate::modules::common::extractors::{SelectedDealership, ValidatedQuery};
use crate::modules::common::responses::SimpleError;
use crate::server::controller::AppState;
use axum::{extract::State, routing::get, Json, Router};
use http::StatusCode;

pub fn create_audit_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/audit-logs", get(list_audit_logs))
        .layer(axum::middleware::from_fn_with_state(
            state,
            auth::middleware::require_admin,
        ))
}

/// Lists audit records of the dealership selected on the session
///
/// strictly scoped to the session tenant, an arbitrary dealership id cannot
/// be passed so cross tenant log disclosure is not possible
#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    tag = "audit",
    security(("session_id" = [])),
    params(ListAuditLogsQuery),
    responses(
        (
            status = OK,
            body = Vec<AuditLog>,
        ),
        (
            status = UNAUTHORIZED,
            description = "invalid or expired session",
            body = SimpleError,
        ),
        (
            status = FORBIDDEN,
            description = "no dealership selected on the session",
            body = SimpleError,
        ),
    ),
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    SelectedDealership(dealership_id): SelectedDealership,
    ValidatedQuery(query): ValidatedQuery<ListAuditLogsQuery>,
) -> Result<Json<Vec<AuditLog>>, (StatusCode, SimpleError)> {
    let conn = &mut state.get_db_conn().await?;

    let logs = repository::list_audit_logs(conn, dealership_id, query.limit)
        .await
        .map_err(crate::database::error::DbError::from)?;

    Ok(Json(logs))
}
