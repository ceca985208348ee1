//! # Lookup Errors

use std::fmt;

use thiserror::Error;

/// Remote fetch performed by a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchingStops,
    FetchingDepartures,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchingStops => write!(f, "fetching stops"),
            Self::FetchingDepartures => write!(f, "fetching departures"),
        }
    }
}

/// Failure of a lookup. Always resolved into an apology for the user.
#[derive(Error, Debug)]
pub enum LookupError {
    /// A call to the Galway bus API failed.
    #[error("transport error while {stage}: {source:#}")]
    Transport {
        stage: Stage,
        #[source]
        source: anyhow::Error,
    },
}

impl LookupError {
    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> &str {
        match self {
            Self::Transport { .. } => "transport_error",
        }
    }

    /// Returns the lookup stage that failed.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Transport { stage, .. } => *stage,
        }
    }
}
