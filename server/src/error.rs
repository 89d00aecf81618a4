use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mandi_common::MarketError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Market(#[from] MarketError),

    #[error("missing X-User-Id header")]
    MissingActor,

    #[error("{0}")]
    BadRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Market(err) => market_status(err),
            AppError::MissingActor => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Io(_) | AppError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn market_status(err: &MarketError) -> StatusCode {
    match err {
        MarketError::NotLoggedIn(_) => StatusCode::UNAUTHORIZED,
        MarketError::WrongRole { .. } | MarketError::NotOwner { .. } => StatusCode::FORBIDDEN,
        MarketError::ProductNotFound(_)
        | MarketError::OrderNotFound(_)
        | MarketError::MessageNotFound(_)
        | MarketError::NotificationNotFound(_)
        | MarketError::NotInCart(_) => StatusCode::NOT_FOUND,
        MarketError::EmptyCart
        | MarketError::ZeroQuantity
        | MarketError::BelowMinimumOrder { .. }
        | MarketError::InvalidDiscount(_)
        | MarketError::InvalidRating(_)
        | MarketError::Validation(_)
        | MarketError::TooLarge(_) => StatusCode::BAD_REQUEST,
        MarketError::InvalidTransition { .. }
        | MarketError::OrderNotRateable { .. }
        | MarketError::AlreadyRated(_) => StatusCode::CONFLICT,
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::warn!(status = status.as_u16(), "rejected: {self}");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
