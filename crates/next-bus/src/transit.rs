//! Galway bus API client.

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use fulfillment::{Config, HttpRequest};
use http::Method;
use http::header::ACCEPT;
use http_body_util::Empty;
use serde::Deserialize;

use crate::departures::Departure;
use crate::stops::Stop;

const API_URL_KEY: &str = "GALWAY_BUS_URL";

/// Retrieves every known stop.
///
/// # Errors
///
/// Returns an error when the request fails, the API responds with a
/// non-success status, or the response cannot be deserialized.
pub async fn stops<P>(provider: &P) -> Result<Vec<Stop>>
where
    P: Config + HttpRequest,
{
    let url = Config::get(provider, API_URL_KEY).await.context("getting `GALWAY_BUS_URL`")?;
    let body = get(provider, format!("{}/stops.json", url.trim_end_matches('/')))
        .await
        .context("fetching stops")?;

    serde_json::from_slice(&body).context("deserializing stops response")
}

/// Retrieves the departure schedule for one stop, soonest first.
///
/// An empty list is a valid schedule.
///
/// # Errors
///
/// Returns an error when the request fails, the API responds with a
/// non-success status, or the response cannot be deserialized.
pub async fn departures<P>(provider: &P, stop_id: &str) -> Result<Vec<Departure>>
where
    P: Config + HttpRequest,
{
    let url = Config::get(provider, API_URL_KEY).await.context("getting `GALWAY_BUS_URL`")?;
    let endpoint =
        format!("{}/stops/{}.json", url.trim_end_matches('/'), urlencoding::encode(stop_id));

    let body = get(provider, endpoint)
        .await
        .with_context(|| format!("fetching departures for stop {stop_id}"))?;

    let schedule: StopSchedule =
        serde_json::from_slice(&body).context("deserializing departures response")?;
    Ok(schedule.times)
}

async fn get<P: HttpRequest>(provider: &P, uri: String) -> Result<Bytes> {
    tracing::debug!(uri = %uri, "requesting Galway bus API");

    let request = http::Request::builder()
        .method(Method::GET)
        .uri(&uri)
        .header(ACCEPT, "application/json")
        .body(Empty::<Bytes>::new())
        .context("building Galway bus request")?;

    let response = HttpRequest::fetch(provider, request).await?;
    if !response.status().is_success() {
        bail!("{uri} returned {}", response.status());
    }

    Ok(response.into_body())
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct StopSchedule {
    times: Vec<Departure>,
}
