use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use zrank::{Error, StoreError};

/// A leaderboard failure on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub error: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            Error::EncodingOverflow { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "value_overflow"),
            Error::Store(StoreError::Timeout) => (StatusCode::GATEWAY_TIMEOUT, "store_timeout"),
            Error::Store(err) if err.is_transient() => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
            Error::MalformedScore { .. } | Error::MalformedMember { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_entry")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        #[cfg(feature = "tracing")]
        if status.is_server_error() {
            tracing::error!(error = %self.0, code, "request failed");
        }

        (
            status,
            Json(ErrorResponse {
                code,
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
