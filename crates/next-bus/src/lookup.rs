//! # Lookup
//!
//! Find the stop nearest the caller and read out its departures.
//!
//! A lookup runs start to finish as one sequential pipeline:
//!
//! ```text
//! AwaitingLocation -> FetchingStops -> SelectingStop -> FetchingDepartures -> Responding
//!                          |                                  |
//!                          +------------> Failed <------------+
//! ```
//!
//! Every outcome, including fetch failures, is resolved here into a [`Reply`];
//! nothing is retried.

use tracing::{info, warn};

use crate::departures::{self, Summary};
use crate::error::{LookupError, Stage};
use crate::geo::Coordinate;
use crate::provider::Provider;
use crate::stops::{self, Stop};
use crate::transit;

/// Follow-up question that keeps the conversation open.
pub const ANOTHER_BUS: &str = "Would you like to lookup another bus?";

/// Reason given to the user when asking for their location.
pub const LOCATION_REASON: &str = "To find the closest bus stop";

pub(crate) const FETCH_FAILED: &str =
    "Sorry, I couldn't get the bus times right now. Please try again later.";
pub(crate) const NO_STOP: &str = "Sorry, I couldn't find a bus stop near you.";

/// A single lookup request.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    /// The caller's device location, when the platform supplied one.
    pub coordinate: Option<Coordinate>,

    /// The bus the caller asked about.
    pub bus_number: String,
}

/// What the conversational platform should say next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Speak and keep the conversation open.
    Ask(String),

    /// Speak and close the conversation.
    Tell(String),

    /// Ask the permission collaborator for the device location.
    AskLocation { reason: String },
}

impl Reply {
    /// Text to speak, if any.
    #[must_use]
    pub fn speech(&self) -> &str {
        match self {
            Self::Ask(text) | Self::Tell(text) => text,
            Self::AskLocation { reason } => reason,
        }
    }

    /// Whether the platform should wait for the user to respond.
    #[must_use]
    pub const fn expects_response(&self) -> bool {
        !matches!(self, Self::Tell(_))
    }
}

/// Typed result of a lookup.
#[derive(Debug)]
pub enum Outcome {
    /// No coordinate was supplied or previously captured.
    MissingLocation,

    /// The stop list came back empty.
    NoStop,

    /// The nearest stop has nothing scheduled.
    NoDepartures { stop: Stop, notice: String },

    /// The nearest stop's upcoming departures.
    Departures { stop: Stop, headline: String, body: String },

    /// A remote fetch failed.
    Failed(LookupError),
}

impl From<Outcome> for Reply {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::MissingLocation => Self::AskLocation { reason: LOCATION_REASON.to_string() },
            Outcome::NoStop => Self::Tell(NO_STOP.to_string()),
            Outcome::NoDepartures { notice, .. } => Self::Ask(format!("{notice} {ANOTHER_BUS}")),
            Outcome::Departures { headline, body, .. } => {
                Self::Ask(format!("{headline}\n{body}\n{ANOTHER_BUS}"))
            }
            Outcome::Failed(_) => Self::Tell(FETCH_FAILED.to_string()),
        }
    }
}

/// Look up departures from the stop nearest the caller.
///
/// The device coordinate in `request` is preferred; `known` is the location
/// captured earlier in the same conversation and is used when the request
/// carries none.
pub async fn handle_lookup<P: Provider>(
    provider: &P, request: &LookupRequest, known: Option<Coordinate>,
) -> Reply {
    let Some(origin) = request.coordinate.or(known) else {
        info!(monotonic_counter.location_requested = 1, bus = %request.bus_number);
        return Outcome::MissingLocation.into();
    };

    info!(bus = %request.bus_number, "looking up next bus");
    lookup(provider, origin).await.into()
}

/// Run the fetch-select-fetch-format pipeline for `origin`.
pub async fn lookup<P: Provider>(provider: &P, origin: Coordinate) -> Outcome {
    let stops = match transit::stops(provider).await {
        Ok(stops) => stops,
        Err(source) => return failed(Stage::FetchingStops, source),
    };

    let Some(stop) = stops::nearest(origin, &stops) else {
        warn!(monotonic_counter.no_stop_found = 1);
        return Outcome::NoStop;
    };
    let stop = stop.clone();
    info!(stop_id = %stop.id, stop = %stop.name, candidates = stops.len(), "selected nearest stop");

    let departures = match transit::departures(provider, &stop.id).await {
        Ok(departures) => departures,
        Err(source) => return failed(Stage::FetchingDepartures, source),
    };

    match departures::format(&stop, &departures, provider.now()) {
        Summary::NoDepartures(notice) => {
            info!(monotonic_counter.no_departures = 1, stop_id = %stop.id);
            Outcome::NoDepartures { stop, notice }
        }
        Summary::Upcoming { headline, body } => {
            info!(monotonic_counter.departures_found = 1, count = departures.len());
            Outcome::Departures { stop, headline, body }
        }
    }
}

fn failed(stage: Stage, source: anyhow::Error) -> Outcome {
    let err = LookupError::Transport { stage, source };
    tracing::error!(monotonic_counter.lookup_errors = 1, code = err.code(), error = %err);
    Outcome::Failed(err)
}
