use crate::modules::{
    auth::middleware::AdminSession,
    common::{error_codes::NO_DEALERSHIP_SELECTED, responses::SimpleError},
};
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query},
    Json,
};
use http::{request::Parts, Request, StatusCode};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Wrapper struct that extracts the request body as json exactly as `axum::Json<T>`
/// but also requires T to impl `Validate`, if validation fails a bad request code
/// and simple error is returned
#[derive(Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for ValidatedJson<T>
where
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
    T: Validate,
    B: Send + 'static,
    S: Send + Sync,
{
    type Rejection = (http::StatusCode, SimpleError);

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(payload) => match payload.validate() {
                Ok(_) => Ok(ValidatedJson(payload.0)),
                Err(e) => Err((StatusCode::BAD_REQUEST, SimpleError::from(e))),
            },
            Err(rejection) => Err((rejection.status(), SimpleError::from(rejection.to_string()))),
        }
    }
}

/// Wrapper struct that extracts from the request query exactly `axum::Query<T>`
/// but also requires T to impl `Validate`, if validation fails a bad request code
/// and simple error is returned
#[derive(Clone, Copy)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = (http::StatusCode, SimpleError);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(payload) => match payload.validate() {
                Ok(_) => Ok(ValidatedQuery(payload.0)),
                Err(e) => Err((StatusCode::BAD_REQUEST, SimpleError::from(e))),
            },
            Err(rejection) => Err((rejection.status(), SimpleError::from(rejection.to_string()))),
        }
    }
}

/// Extracts the dealership id selected on the request session, failing with
/// `403 NO_DEALERSHIP_SELECTED` when the session has no dealership, mutations
/// and admin listings always take their tenant from this extractor and never
/// from the request body or query string.
///
/// this requires the `AdminSession` extension to be available.
#[derive(Clone, Copy)]
pub struct SelectedDealership(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for SelectedDealership
where
    S: Send + Sync,
{
    type Rejection = (http::StatusCode, SimpleError);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forbidden = || {
            (
                StatusCode::FORBIDDEN,
                SimpleError::from(NO_DEALERSHIP_SELECTED),
            )
        };

        let session = parts
            .extensions
            .get::<AdminSession>()
            .ok_or_else(forbidden)?;

        let dealership_id = session.selected_dealership_id.ok_or_else(forbidden)?;

        Ok(SelectedDealership(dealership_id))
    }
}
