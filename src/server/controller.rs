use super::open_api;
use crate::{
    config::app_config,
    database::db::{DbConn, DbPool},
    modules::{
        audit::routes::create_audit_router,
        auth::{routes::create_auth_router, service::AuthService},
        common::{
            rate_limit::{rate_limit_requests, RateLimiter},
            responses::{internal_error_res, SimpleError},
        },
        dealership::routes::{create_admin_dealership_router, create_dealership_router},
        lead::routes::create_lead_router,
        seo::routes::create_seo_router,
        vehicle::routes::create_vehicle_router,
    },
};
use axum::{routing::get, Router};
use axum_client_ip::SecureClientIpSource;
use http::{header, HeaderValue, Method, StatusCode};
use rand_chacha::ChaCha8Rng;
use rand_core::{OsRng, RngCore, SeedableRng};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub db_conn_pool: DbPool,
    pub login_rate_limiter: RateLimiter,
    pub lead_rate_limiter: RateLimiter,
}

impl AppState {
    pub async fn get_db_conn(&self) -> Result<DbConn, (StatusCode, SimpleError)> {
        self.db_conn_pool.get().await.or(Err(internal_error_res()))
    }
}

fn origin_is_allowed(origin: &HeaderValue) -> bool {
    let origin = match origin.to_str() {
        Ok(origin) => origin,
        Err(_) => return false,
    };

    let config = app_config();

    if config.allowed_origins.iter().any(|allowed| allowed == origin) {
        return true;
    }

    // local frontends and replit preview hosts are fine in development
    if config.is_development {
        return origin.starts_with("http://localhost")
            || origin.starts_with("http://127.0.0.1")
            || origin.ends_with(".replit.dev");
    }

    false
}

/// Creates the main axum router/controller to be served over http
pub fn new(db_conn_pool: DbPool) -> Router {
    let rng = ChaCha8Rng::seed_from_u64(OsRng.next_u64());

    let state = AppState {
        auth_service: AuthService::new(db_conn_pool.clone(), rng),
        db_conn_pool,
        login_rate_limiter: RateLimiter::for_login(),
        lead_rate_limiter: RateLimiter::for_leads(),
    };

    let cors = CorsLayer::new()
        .allow_methods([
            Method::PATCH,
            Method::POST,
            Method::GET,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_origin(AllowOrigin::predicate(|origin, _| origin_is_allowed(origin)))
        .allow_credentials(true)
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static(
                crate::modules::auth::middleware::CSRF_TOKEN_HEADER,
            ),
        ]);

    let admin_router =
        create_audit_router(state.clone()).merge(create_admin_dealership_router(state.clone()));

    // the client ip extension must sit outside the rate limiter so the
    // limiter can read the caller address
    let global_middlewares = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SecureClientIpSource::ConnectInfo.into_extension())
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::global(),
            rate_limit_requests,
        ));

    let api_router = Router::new()
        .nest("/auth", create_auth_router(state.clone()))
        .nest("/vehicles", create_vehicle_router(state.clone()))
        .nest("/dealerships", create_dealership_router())
        .nest("/admin", admin_router)
        .merge(create_lead_router(state.clone()));

    Router::new()
        .route("/healthcheck", get(healthcheck))
        .merge(open_api::create_openapi_router())
        .merge(create_seo_router())
        .nest("/api", api_router)
        .layer(global_middlewares)
        .with_state(state)
}

#[utoipa::path(
    get,
    tag = "meta",
    path = "/healthcheck",
    responses((status = OK)),
)]
pub async fn healthcheck() -> StatusCode {
    StatusCode::OK
}
