use super::dto::{CreateFinancingApplication, CreateInquiry};
use super::repository;
use crate::database::models::{FinancingApplication, Inquiry};
use crate::modules::common::extractors::ValidatedJson;
use crate::modules::common::rate_limit::rate_limit_requests;
use crate::modules::common::responses::{internal_error_res, SimpleError};
use crate::modules::{dealership, vehicle};
use crate::server::controller::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

/// lead capture routes, nested under /api, both rate limited per client ip
pub fn create_lead_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/inquiries", post(create_inquiry))
        .route("/financing-applications", post(create_financing_application))
        .layer(axum::middleware::from_fn_with_state(
            state.lead_rate_limiter,
            rate_limit_requests,
        ))
}

/// Creates an inquiry lead
///
/// when the inquiry references a vehicle its dealership is copied onto the
/// lead, any tenant value on the request body is ignored
#[utoipa::path(
    post,
    path = "/api/inquiries",
    tag = "lead",
    request_body = CreateInquiry,
    responses(
        (
            status = CREATED,
            body = Inquiry,
        ),
        (
            status = BAD_REQUEST,
            description = "invalid dto",
            body = SimpleError,
        ),
        (
            status = NOT_FOUND,
            description = "referenced vehicle does not exist",
            body = SimpleError,
        ),
        (
            status = TOO_MANY_REQUESTS,
            description = "more than 10 submissions within a hour",
            body = SimpleError,
        ),
    ),
)]
pub async fn create_inquiry(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateInquiry>,
) -> Result<(StatusCode, Json<Inquiry>), (StatusCode, SimpleError)> {
    let conn = &mut state.get_db_conn().await?;

    let dealership_id = match payload.vehicle_id {
        Some(vehicle_id) => {
            let referenced = vehicle::repository::find_vehicle(conn, vehicle_id)
                .await
                .or(Err(internal_error_res()))?
                .ok_or((
                    StatusCode::NOT_FOUND,
                    SimpleError::from("vehicle not found"),
                ))?;

            referenced.dealership_id
        }
        None => None,
    };

    let created = repository::create_inquiry(conn, &payload, dealership_id)
        .await
        .map_err(crate::database::error::DbError::from)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Creates a financing application lead
///
/// the tenant is resolved from the dealership slug on the payload, unknown
/// or disabled dealerships are a 404
#[utoipa::path(
    post,
    path = "/api/financing-applications",
    tag = "lead",
    request_body = CreateFinancingApplication,
    responses(
        (
            status = CREATED,
            body = FinancingApplication,
        ),
        (
            status = BAD_REQUEST,
            description = "invalid dto",
            body = SimpleError,
        ),
        (
            status = NOT_FOUND,
            description = "unknown dealership slug",
            body = SimpleError,
        ),
        (
            status = TOO_MANY_REQUESTS,
            description = "more than 10 submissions within a hour",
            body = SimpleError,
        ),
    ),
)]
pub async fn create_financing_application(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateFinancingApplication>,
) -> Result<(StatusCode, Json<FinancingApplication>), (StatusCode, SimpleError)> {
    let conn = &mut state.get_db_conn().await?;

    let tenant = dealership::repository::find_by_slug(conn, &payload.dealership_slug)
        .await
        .or(Err(internal_error_res()))?
        .ok_or((
            StatusCode::NOT_FOUND,
            SimpleError::from("dealership not found"),
        ))?;

    let annual_income = repository::parse_money(&payload.annual_income)
        .ok_or((StatusCode::BAD_REQUEST, SimpleError::from("invalid annual income")))?;

    let down_payment = match &payload.down_payment {
        Some(raw) => Some(repository::parse_money(raw).ok_or((
            StatusCode::BAD_REQUEST,
            SimpleError::from("invalid down payment"),
        ))?),
        None => None,
    };

    let created = repository::create_financing_application(
        conn,
        &payload,
        tenant.id,
        annual_income,
        down_payment,
    )
    .await
    .map_err(crate::database::error::DbError::from)?;

    Ok((StatusCode::CREATED, Json(created)))
}
