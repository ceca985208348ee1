//! # Next Bus
//!
//! Finds the bus stop nearest a caller and reads out its upcoming departures
//! for the Galway bus voice assistant.

mod error;
mod provider;
mod webhook;

pub mod departures;
pub mod geo;
pub mod lookup;
pub mod stops;
pub mod transit;

pub use fulfillment::{Error, Result};

pub use self::departures::{Departure, Summary};
pub use self::error::{LookupError, Stage};
pub use self::geo::Coordinate;
pub use self::lookup::{LookupRequest, Outcome, Reply, handle_lookup};
pub use self::provider::Provider;
pub use self::stops::{Stop, nearest};
pub use self::webhook::*;
