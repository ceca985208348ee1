//! # Fulfillment Core
//!
//! Core modules shared by fulfillment webhooks: the error type returned to the
//! conversational platform, the handler seam, and the provider traits a host
//! implements to give domain crates access to the outside world.

mod api;
mod error;
mod provider;

pub use crate::api::*;
pub use crate::error::*;
pub use crate::provider::*;
