//! # API
//!
//! The handler seam between the HTTP host and domain crates. A request type
//! implements [`Handler`] for any provider satisfying its bounds and returns a
//! [`Reply`] the host renders as JSON.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::Result;

/// Reply returned by a [`Handler`].
#[derive(Clone, Debug)]
pub struct Reply<T> {
    /// HTTP status to return.
    pub status: StatusCode,

    /// Additional response headers.
    pub headers: HeaderMap,

    /// Response body.
    pub body: T,
}

impl<T> From<T> for Reply<T> {
    fn from(body: T) -> Self {
        Self { status: StatusCode::OK, headers: HeaderMap::new(), body }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, self.headers, Json(self.body)).into_response()
    }
}

/// Request handler implemented by request types.
pub trait Handler<P>: Sized + Send {
    /// The body of a successful reply.
    type Output: Serialize;

    /// Handle the request using the provider.
    fn handle(self, provider: &P) -> impl Future<Output = Result<Reply<Self::Output>>> + Send;
}
