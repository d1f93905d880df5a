use super::dto::{self, AuthCheck, LoginResponse, SuccessResponse};
use super::middleware::AdminSession;
use super::session::OptionalSessionToken;
use crate::database::models::Dealership;
use crate::modules::common::error_codes::{DEALERSHIP_ACCESS_DENIED, INVALID_CREDENTIALS};
use crate::modules::common::extractors::ValidatedJson;
use crate::modules::common::rate_limit::rate_limit_requests;
use crate::modules::common::responses::{internal_error_res, SimpleError};
use crate::server::controller::AppState;
use axum::headers::UserAgent;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router, TypedHeader,
};
use axum_client_ip::SecureClientIp;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use http::HeaderMap;

pub fn create_auth_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/select-dealership", post(select_dealership))
        .layer(axum::middleware::from_fn(super::middleware::check_csrf))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            super::middleware::require_admin,
        ))
        .route("/logout", post(logout))
        .route("/check", get(check))
        .route(
            "/login",
            post(login).layer(axum::middleware::from_fn_with_state(
                state.login_rate_limiter,
                rate_limit_requests,
            )),
        )
}

/// Logs an admin user in
///
/// verifies the credentials, creates a session with a fresh CSRF token and
/// returns it alongside the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = Login,
    responses(
        (
            status = OK,
            description = "login successful",
            body = LoginResponse,
            headers(("Set-Cookie" = String, description = "new session id cookie"))
        ),
        (
            status = BAD_REQUEST,
            description = "invalid dto",
            body = SimpleError,
        ),
        (
            status = UNAUTHORIZED,
            description = "invalid credentials",
            body = SimpleError,
        ),
        (
            status = TOO_MANY_REQUESTS,
            description = "more than 5 attempts within 15 minutes",
            body = SimpleError,
        ),
    ),
)]
pub async fn login(
    client_ip: SecureClientIp,
    old_session_token: OptionalSessionToken,
    State(state): State<AppState>,
    TypedHeader(user_agent): TypedHeader<UserAgent>,
    ValidatedJson(payload): ValidatedJson<dto::Login>,
) -> Result<(HeaderMap, Json<LoginResponse>), (StatusCode, SimpleError)> {
    use crate::modules::auth::service::UserFromCredentialsError as Err;

    let user = state
        .auth_service
        .get_user_from_credentials(&payload.username, &payload.password)
        .await
        .map_err(|e| match e {
            Err::InternalError => internal_error_res(),
            Err::NotFound | Err::InvalidPassword => (
                StatusCode::UNAUTHORIZED,
                SimpleError::from(INVALID_CREDENTIALS),
            ),
        })?;

    let (session_token, csrf_token) = state
        .auth_service
        .new_session(&user, client_ip.0, user_agent.to_string())
        .await
        .or(Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            SimpleError::from("failed to create session"),
        )))?;

    if let Some(old_ses_token) = old_session_token.get_value() {
        state.auth_service.delete_session(old_ses_token).await.ok();
    }

    let mut headers = HeaderMap::new();
    headers.insert("Set-Cookie", session_token.into_set_cookie_header());

    Ok((
        headers,
        Json(LoginResponse {
            success: true,
            csrf_token,
        }),
    ))
}

/// Logs out of the current session
///
/// deletes the session on the sid (session id) request cookie, succeeding
/// even when the request carries no session at all
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    security(("session_id" = [])),
    responses(
        (
            status = OK,
            body = SuccessResponse,
            headers(("Set-Cookie" = String, description = "expired sid cookie, so the client browser deletes it"))
        ),
    ),
)]
pub async fn logout(
    session: OptionalSessionToken,
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<SuccessResponse>), (StatusCode, SimpleError)> {
    let mut headers = HeaderMap::new();

    if let Some(session_token) = session.get_value() {
        state
            .auth_service
            .delete_session(session_token)
            .await
            .or(Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                SimpleError::from("failed to delete session"),
            )))?;

        headers.insert("Set-Cookie", session_token.into_delete_cookie_header());
    }

    Ok((headers, Json(SuccessResponse { success: true })))
}

/// Reports the authentication state of the request session
///
/// idempotent and safe to poll, never fails for anonymous requests. lazily
/// issues a CSRF token when the session is authenticated without one and
/// slides the session expiry.
#[utoipa::path(
    get,
    path = "/api/auth/check",
    tag = "auth",
    responses(
        (
            status = OK,
            body = AuthCheck,
        ),
    ),
)]
pub async fn check(
    session_token: OptionalSessionToken,
    State(state): State<AppState>,
) -> Result<Json<AuthCheck>, (StatusCode, SimpleError)> {
    let anonymous = AuthCheck {
        is_authenticated: false,
        selected_dealership_id: None,
        csrf_token: None,
    };

    let token = match session_token.get_value() {
        Some(token) => token,
        None => return Ok(Json(anonymous)),
    };

    let maybe_session = state
        .auth_service
        .get_session_and_user(token)
        .await
        .or(Err(internal_error_res()))?;

    let (session, _user) = match maybe_session {
        Some(found) => found,
        None => return Ok(Json(anonymous)),
    };

    let csrf_token = state
        .auth_service
        .ensure_csrf_token(&session)
        .await
        .or(Err(internal_error_res()))?;

    let _ = state.auth_service.renew_session(token).await;

    Ok(Json(AuthCheck {
        is_authenticated: true,
        selected_dealership_id: session.selected_dealership_id,
        csrf_token: Some(csrf_token),
    }))
}

/// Selects the dealership the session operates on
///
/// only available to platform admins, users bound to a dealership cannot
/// switch tenants
#[utoipa::path(
    post,
    path = "/api/auth/select-dealership",
    tag = "auth",
    security(("session_id" = [])),
    request_body = SelectDealership,
    responses(
        (
            status = OK,
            body = SuccessResponse,
        ),
        (
            status = FORBIDDEN,
            description = "user is bound to another dealership or CSRF failure",
            body = SimpleError,
        ),
        (
            status = NOT_FOUND,
            description = "dealership does not exist or is disabled",
            body = SimpleError,
        ),
    ),
)]
pub async fn select_dealership(
    State(state): State<AppState>,
    Extension(admin_session): Extension<AdminSession>,
    ValidatedJson(payload): ValidatedJson<dto::SelectDealership>,
) -> Result<Json<SuccessResponse>, (StatusCode, SimpleError)> {
    if let Some(bound_dealership) = admin_session.user_dealership_id {
        if bound_dealership != payload.dealership_id {
            return Err((
                StatusCode::FORBIDDEN,
                SimpleError::from(DEALERSHIP_ACCESS_DENIED),
            ));
        }
    }

    let conn = &mut state.get_db_conn().await?;

    let dealership = crate::database::schema::dealership::table
        .find(payload.dealership_id)
        .select(Dealership::as_select())
        .first::<Dealership>(conn)
        .await
        .optional()
        .or(Err(internal_error_res()))?
        .filter(|d| d.is_active)
        .ok_or((
            StatusCode::NOT_FOUND,
            SimpleError::from("dealership not found"),
        ))?;

    state
        .auth_service
        .set_selected_dealership(admin_session.session_token, dealership.id)
        .await
        .or(Err(internal_error_res()))?;

    Ok(Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db::get_connection_pool;
    use crate::modules::auth::service::AuthService;
    use crate::modules::common::rate_limit::RateLimiter;
    use axum::extract::FromRequestParts;
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    // the pool connects lazily, so handlers that never touch the database
    // can run against it
    async fn test_state() -> AppState {
        let pool = get_connection_pool("postgres://localhost/unreachable").await;

        AppState {
            auth_service: AuthService::new(pool.clone(), ChaCha8Rng::seed_from_u64(0)),
            db_conn_pool: pool,
            login_rate_limiter: RateLimiter::for_login(),
            lead_rate_limiter: RateLimiter::for_leads(),
        }
    }

    #[tokio::test]
    async fn logout_without_a_session_cookie_succeeds() {
        let (mut parts, _) = http::Request::builder().body(()).unwrap().into_parts();

        let no_session = OptionalSessionToken::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        let (headers, Json(body)) = logout(no_session, State(test_state().await))
            .await
            .unwrap();

        assert!(body.success);
        assert!(headers.get("Set-Cookie").is_none());
    }
}
