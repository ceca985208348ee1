//! Bus stops and nearest-stop selection.

use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::Coordinate;

/// A bus stop as returned by the Galway bus API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Stop reference used to request the stop's schedule.
    #[serde(rename = "stop_ref", deserialize_with = "string_or_number")]
    pub id: String,

    /// Name read out to the user.
    #[serde(rename = "long_name")]
    pub name: String,

    #[serde(flatten)]
    pub coordinate: Coordinate,
}

/// Find the stop closest to `origin`.
///
/// Stops are scanned once, in order. The running minimum is only replaced by a
/// strictly smaller distance, so when two stops are equidistant the first one
/// in `stops` wins. Returns `None` when `stops` is empty.
#[must_use]
pub fn nearest(origin: Coordinate, stops: &[Stop]) -> Option<&Stop> {
    let mut closest: Option<(f64, &Stop)> = None;

    for stop in stops {
        let distance = origin.distance_to(stop.coordinate);
        if closest.is_none_or(|(shortest, _)| distance < shortest) {
            closest = Some((distance, stop));
        }
    }

    closest.map(|(_, stop)| stop)
}

// The API has served stop references both as strings and as numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Reference {
        Text(String),
        Number(i64),
    }

    Ok(match Reference::deserialize(deserializer)? {
        Reference::Text(text) => text,
        Reference::Number(number) => number.to_string(),
    })
}
