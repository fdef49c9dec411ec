//! Error taxonomy to HTTP status wire mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use clinrag_core::Error;

/// Wraps the core error taxonomy so handlers can return it directly and
/// get the wire mapping for free.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidInput(_) | Error::InvalidMedia(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Busy(_) | Error::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Error::ProviderUnavailable(_) | Error::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Cancelled(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(kind = self.0.kind(), "{}", self.0);
        } else {
            tracing::warn!(kind = self.0.kind(), "{}", self.0);
        }

        (status, Json(ErrorBody { error: self.0.kind(), message: self.0.to_string() })).into_response()
    }
}
