//! HTTP error responses for web adapter.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::error::QuantsimError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &QuantsimError) -> StatusCode {
    match err {
        QuantsimError::TickerNotFound { .. } => StatusCode::NOT_FOUND,
        QuantsimError::InvalidParameter { .. } | QuantsimError::UnknownStrategy { .. } => {
            StatusCode::BAD_REQUEST
        }
        QuantsimError::Overflow { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        QuantsimError::InvalidSeries { .. }
        | QuantsimError::DataLoad { .. }
        | QuantsimError::ConfigParse { .. }
        | QuantsimError::ConfigMissing { .. }
        | QuantsimError::ConfigInvalid { .. }
        | QuantsimError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<QuantsimError> for WebError {
    fn from(err: QuantsimError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "request failed");
        }
        (
            self.status,
            Json(ErrorBody {
                message: &self.message,
            }),
        )
            .into_response()
    }
}
