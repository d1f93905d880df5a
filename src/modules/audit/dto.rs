use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

fn default_limit() -> i64 {
    100
}

#[derive(Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListAuditLogsQuery {
    /// page size, clamped to 500 server side
    #[serde(default = "default_limit")]
    #[validate(range(min = 1))]
    pub limit: i64,
}
