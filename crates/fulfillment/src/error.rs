//! Fulfillment errors

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = anyhow::Result<T, Error>;

/// Error returned to the conversational platform when a webhook call cannot be
/// fulfilled at all.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Error {
    /// The request payload is invalid or missing required fields.
    #[error("code: 400, description: {0}")]
    BadRequest(String),
}

impl Error {
    /// Returns the HTTP status associated with the variant.
    #[must_use]
    pub const fn code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("invalid payload: {err}"))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::warn!(monotonic_counter.request_errors = 1, status = %self.code(), error = %self);
        (self.code(), self.to_string()).into_response()
    }
}

/// Construct an `Error::BadRequest` from a format string.
#[macro_export]
macro_rules! bad_request {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::BadRequest(format!($fmt, $($arg)*))
    };
     ($err:expr $(,)?) => {
        $crate::Error::BadRequest(format!($err))
    };
}
