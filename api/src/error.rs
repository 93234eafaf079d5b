//! API error type and response mapping.
//!
//! Error responses mirror the underlying error's Display text verbatim in
//! the body; no structured error codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed to decode, or a store operation rejected it.
    #[error("{0}")]
    BadRequest(String),

    /// A configured chain client failed its reachability probe.
    #[error("{0}")]
    Unhealthy(String),

    /// Response construction failed (metrics encoding).
    #[error("{0}")]
    Internal(String),
}

impl From<chainwatch_store::StoreError> for ApiError {
    fn from(e: chainwatch_store::StoreError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unhealthy(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_bad_request_with_display_text() {
        let err: ApiError = chainwatch_store::StoreError::NotFound("0x1".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(err.to_string(), "key not found: 0x1");
    }

    #[test]
    fn statuses_match_the_taxonomy() {
        let resp = ApiError::BadRequest("nope".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError::Unhealthy("down".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
