use super::dto::{DealershipChangeset, UpdateDealership};
use super::repository;
use crate::database::models::Dealership;
use crate::modules::common::extractors::{SelectedDealership, ValidatedJson};
use crate::modules::common::responses::{internal_error_res, SimpleError};
use crate::server::controller::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

/// public routes, nested under /api/dealerships
pub fn create_dealership_router() -> Router<AppState> {
    Router::new().route("/:slug", get(get_dealership))
}

/// admin only routes, nested under /api/admin
pub fn create_admin_dealership_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dealership", put(update_dealership))
        .layer(axum::middleware::from_fn(
            crate::modules::auth::middleware::check_csrf,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state,
            crate::modules::auth::middleware::require_admin,
        ))
}

/// Gets the public branding / contact profile of an active dealership
#[utoipa::path(
    get,
    path = "/api/dealerships/{slug}",
    tag = "dealership",
    params(("slug" = String, Path, description = "url slug of the dealership")),
    responses(
        (
            status = OK,
            body = Dealership,
        ),
        (
            status = NOT_FOUND,
            description = "no active dealership with this slug",
            body = SimpleError,
        ),
    ),
)]
pub async fn get_dealership(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Dealership>, (StatusCode, SimpleError)> {
    let conn = &mut state.get_db_conn().await?;

    let dealership = repository::find_by_slug(conn, &slug)
        .await
        .or(Err(internal_error_res()))?
        .ok_or((
            StatusCode::NOT_FOUND,
            SimpleError::from("dealership not found"),
        ))?;

    Ok(Json(dealership))
}

/// Updates the branding / contact profile of the dealership selected on
/// the session
#[utoipa::path(
    put,
    path = "/api/admin/dealership",
    tag = "dealership",
    security(("session_id" = [])),
    request_body = UpdateDealership,
    responses(
        (
            status = OK,
            body = Dealership,
        ),
        (
            status = BAD_REQUEST,
            description = "invalid dto or a slug / custom domain already in use",
            body = SimpleError,
        ),
        (
            status = FORBIDDEN,
            description = "CSRF failure or no dealership selected",
            body = SimpleError,
        ),
    ),
)]
pub async fn update_dealership(
    State(state): State<AppState>,
    SelectedDealership(dealership_id): SelectedDealership,
    ValidatedJson(payload): ValidatedJson<UpdateDealership>,
) -> Result<Json<Dealership>, (StatusCode, SimpleError)> {
    let conn = &mut state.get_db_conn().await?;

    let updated = repository::update_dealership(
        conn,
        dealership_id,
        DealershipChangeset::from(payload),
    )
    .await
    .map_err(crate::database::error::DbError::from)?;

    Ok(Json(updated))
}
