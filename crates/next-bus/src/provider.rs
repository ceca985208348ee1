//! # Provider
//!
//! Provider defines external data interfaces for the crate.

pub use fulfillment::{Config, HttpRequest, Time};

/// Provider entry point implemented by the host application.
pub trait Provider: Config + HttpRequest + Time {}

impl<T> Provider for T where T: Config + HttpRequest + Time {}
