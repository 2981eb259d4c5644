//! Request extractors producing the envelope on rejection.

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request, rejection::JsonRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use super::response::ApiError;
use crate::domain::shared::UserId;
use crate::error::SettlementError;

/// Header carrying the acting user's ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller named by the `x-user-id` header, not yet resolved.
#[derive(Debug, Clone)]
pub struct CallerId(pub UserId);

impl<S: Send + Sync> FromRequestParts<S> for CallerId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                SettlementError::Unauthenticated(format!("missing {USER_ID_HEADER} header"))
            })?;
        Ok(Self(UserId::new(value)))
    }
}

/// JSON body whose parse failures become validation errors.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(&rejection).into()),
        }
    }
}

fn json_rejection(rejection: &JsonRejection) -> SettlementError {
    SettlementError::validation("body", rejection.body_text())
}

/// Query string whose parse failures become validation errors.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(SettlementError::validation("query", rejection.body_text()).into()),
        }
    }
}
