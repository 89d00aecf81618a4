use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use mandi_common::identity::UserId;

use crate::error::AppError;

/// Header naming the acting user.
pub const USER_HEADER: &str = "x-user-id";

/// The user a request acts for, taken from `X-User-Id`.
///
/// Presence of the header is all this checks; whether the user has a live
/// session is decided by the marketplace operation itself.
#[derive(Debug, Clone)]
pub struct Actor(pub UserId);

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(AppError::MissingActor)?;
        Ok(Actor(UserId(id.to_string())))
    }
}

/// `Json` whose rejections answer with the standard error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Body<T>(pub T);

/// Query string, rejected like [`Body`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Params<T>(pub T);

/// Path segments, rejected like [`Body`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);
