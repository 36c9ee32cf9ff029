use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

/// Maps library failures onto structured JSON error responses.
#[derive(Debug)]
pub struct ApiError(pub market::Error);

impl From<market::Error> for ApiError {
    fn from(err: market::Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use market::Error::*;

        match &self.0 {
            NoData { .. } | InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Status { status, .. } if status.is_client_error() && status.as_u16() != 429 => {
                StatusCode::BAD_REQUEST
            }
            Timeout => StatusCode::GATEWAY_TIMEOUT,
            Request(_) | Status { .. } | Decode(_) | InvalidBar { .. } => {
                StatusCode::BAD_GATEWAY
            }
            MissingEnvVar(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            market::Error::NoData { .. } => "No candle data returned".to_string(),
            other => other.to_string(),
        };

        warn!(error = %self.0, %status, "request failed");

        let body = json!({
            "error": message,
            "retryable": self.0.is_retryable(),
        });
        (status, Json(body)).into_response()
    }
}
