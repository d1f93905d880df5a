use super::csrf::constant_time_eq;
use super::session::{get_session_token_from_request_headers, SessionToken};
use crate::{
    database::models,
    modules::common::{
        error_codes::{
            DEALERSHIP_DISABLED, INVALID_CSRF_TOKEN, INVALID_SESSION, NO_CSRF_TOKEN,
            NO_SID_COOKIE,
        },
        responses::{internal_error_res, SimpleError},
    },
    server::controller::AppState,
};
use axum::{extract::State, middleware::Next, response::Response};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use http::StatusCode;

/// name of the header that must carry the session CSRF token on every
/// state changing admin request
pub const CSRF_TOKEN_HEADER: &str = "x-csrf-token";

/// Request scoped authentication context, created by `require_admin` and
/// carried as a request extension so handlers and extractors never touch
/// ambient session state.
#[derive(Clone)]
pub struct AdminSession {
    pub user_id: i32,
    pub username: String,
    /// dealership the user account is bound to, `None` for platform admins
    pub user_dealership_id: Option<i32>,
    pub session_token: SessionToken,
    pub csrf_token: Option<String>,
    pub selected_dealership_id: Option<i32>,
}

impl From<(&models::Session, &models::User)> for AdminSession {
    fn from((session, user): (&models::Session, &models::User)) -> Self {
        AdminSession {
            user_id: user.id,
            username: user.username.clone(),
            user_dealership_id: user.dealership_id,
            session_token: SessionToken::from_database_value(&session.session_token)
                // the token was just used to look the session up, so it is 16 bytes
                .unwrap_or_else(|| SessionToken::from(0)),
            csrf_token: session.csrf_token.clone(),
            selected_dealership_id: session.selected_dealership_id,
        }
    }
}

/// middleware for admin only routes, resolves the session on the sid cookie to
/// its user, slides the session expiry and adds the `AdminSession` extension.
///
/// requests without a valid non expired session are rejected with 401, requests
/// whose selected dealership was soft disabled are rejected as well.
pub async fn require_admin<B>(
    State(state): State<AppState>,
    mut req: http::Request<B>,
    next: Next<B>,
) -> Result<Response, (StatusCode, SimpleError)> {
    let session_id = get_session_token_from_request_headers(req.headers())
        .ok_or((StatusCode::UNAUTHORIZED, SimpleError::from(NO_SID_COOKIE)))?;

    let token = SessionToken::from(session_id);

    let (session, user) = state
        .auth_service
        .get_session_and_user(token)
        .await
        .map_err(|_| internal_error_res())?
        .ok_or((StatusCode::UNAUTHORIZED, SimpleError::from(INVALID_SESSION)))?;

    if let Some(dealership_id) = session.selected_dealership_id {
        if dealership_is_disabled(&state, dealership_id).await? {
            return Err((
                StatusCode::UNAUTHORIZED,
                SimpleError::from(DEALERSHIP_DISABLED),
            ));
        }
    }

    // sliding expiry, renewal failures must not fail the request itself
    let _ = state.auth_service.renew_session(token).await;

    req.extensions_mut().insert(token);
    req.extensions_mut()
        .insert(AdminSession::from((&session, &user)));

    Ok(next.run(req).await)
}

/// middleware for state changing admin routes, compares the `x-csrf-token`
/// header against the token stored on the session in constant time.
///
/// absence or mismatch is a 403 regardless of how valid the session is, so
/// this must be layered under `require_admin`.
pub async fn check_csrf<B>(
    req: http::Request<B>,
    next: Next<B>,
) -> Result<Response, (StatusCode, SimpleError)> {
    let session = req
        .extensions()
        .get::<AdminSession>()
        .ok_or((StatusCode::FORBIDDEN, SimpleError::from(NO_CSRF_TOKEN)))?;

    let header_token = req
        .headers()
        .get(CSRF_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or((StatusCode::FORBIDDEN, SimpleError::from(NO_CSRF_TOKEN)))?;

    let session_token = session.csrf_token.as_deref().ok_or((
        StatusCode::FORBIDDEN,
        SimpleError::from(INVALID_CSRF_TOKEN),
    ))?;

    if !constant_time_eq(header_token, session_token) {
        return Err((
            StatusCode::FORBIDDEN,
            SimpleError::from(INVALID_CSRF_TOKEN),
        ));
    }

    Ok(next.run(req).await)
}

async fn dealership_is_disabled(
    state: &AppState,
    dealership_id: i32,
) -> Result<bool, (StatusCode, SimpleError)> {
    use crate::database::schema::dealership;

    let conn = &mut state.get_db_conn().await?;

    let is_active: Option<bool> = dealership::table
        .find(dealership_id)
        .select(dealership::is_active)
        .first(conn)
        .await
        .optional()
        .or(Err(internal_error_res()))?;

    Ok(!is_active.unwrap_or(false))
}
