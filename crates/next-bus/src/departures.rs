//! Departure schedule and the text read back to the user.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::stops::Stop;

/// Wall-clock times are read out in Galway local time.
const TIMEZONE: Tz = chrono_tz::Europe::Dublin;

/// One scheduled departure from a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    /// Route (timetable) identifier, e.g. "404".
    pub timetable_id: String,

    /// Destination shown on the bus.
    pub display_name: String,

    #[serde(rename = "depart_timestamp")]
    pub depart_at: DateTime<Utc>,
}

/// Text summarising a stop's departures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// The stop has nothing scheduled for the rest of the day.
    NoDepartures(String),

    /// The soonest departure and a line per scheduled departure.
    Upcoming { headline: String, body: String },
}

/// Summarise `departures` for `stop`.
///
/// Departures are assumed to be in chronological order: the first is treated as
/// the soonest and the listing keeps the input order. Relative times are
/// computed against `now`, so callers should pass the current instant.
#[must_use]
pub fn format(stop: &Stop, departures: &[Departure], now: DateTime<Utc>) -> Summary {
    let Some(next) = departures.first() else {
        return Summary::NoDepartures(format!("No departures from {} today.", stop.name));
    };

    let headline = format!(
        "The next bus from {} is the {} to {}, due {}.",
        stop.name,
        next.timetable_id,
        next.display_name,
        relative(now, next.depart_at)
    );

    let body = departures
        .iter()
        .map(|departure| {
            let local = departure.depart_at.with_timezone(&TIMEZONE);
            format!(
                "{} to {} {} ({})",
                departure.timetable_id,
                departure.display_name,
                relative(now, departure.depart_at),
                local.format("%H:%M")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Summary::Upcoming { headline, body }
}

/// Describe `to` relative to `from`, e.g. "in 5 minutes" or "2 hours ago".
#[must_use]
pub fn relative(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let millis = (to - from).num_milliseconds();
    let span = span(millis.unsigned_abs());

    if millis < 0 { format!("{span} ago") } else { format!("in {span}") }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn span(millis: u64) -> String {
    let seconds = (millis as f64 / 1000.0).round();
    let minutes = (seconds / 60.0).round();
    let hours = (minutes / 60.0).round();
    let days = (hours / 24.0).round();

    if seconds < 45.0 {
        "a few seconds".to_string()
    } else if seconds < 90.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{} minutes", minutes as u64)
    } else if minutes < 90.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{} hours", hours as u64)
    } else if hours < 36.0 {
        "a day".to_string()
    } else {
        format!("{} days", days as u64)
    }
}
