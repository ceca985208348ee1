#![allow(missing_docs)]

use std::any::Any;
use std::error::Error;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use fulfillment::{Config, HttpRequest, Time};
use http::{Request, Response, StatusCode};
use http_body::Body;
use next_bus::{Departure, Stop};
use serde_json::json;

#[derive(Clone)]
pub enum Schedule {
    Departures(Vec<Departure>),
    Unavailable,
}

#[derive(Clone)]
pub struct MockProvider {
    stops: Option<Vec<Stop>>,
    schedule: Schedule,
    now: DateTime<Utc>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    #[must_use]
    pub fn new(stops: Vec<Stop>, departures: Vec<Departure>) -> Self {
        Self {
            stops: Some(stops),
            schedule: Schedule::Departures(departures),
            now: Utc::now(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The stops request fails.
    #[allow(dead_code)]
    #[must_use]
    pub fn stops_unavailable() -> Self {
        Self { stops: None, ..Self::new(vec![], vec![]) }
    }

    /// The departures request fails.
    #[allow(dead_code)]
    #[must_use]
    pub fn departures_unavailable(stops: Vec<Stop>) -> Self {
        Self { schedule: Schedule::Unavailable, ..Self::new(stops, vec![]) }
    }

    #[allow(dead_code)]
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Paths requested so far, in order.
    #[allow(clippy::missing_panics_doc, dead_code)]
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("should lock").clone()
    }
}

impl Config for MockProvider {
    async fn get(&self, key: &str) -> Result<String> {
        match key {
            "GALWAY_BUS_URL" => Ok("http://localhost:8080".to_string()),
            _ => Err(anyhow!("unknown config key: {key}")),
        }
    }
}

impl Time for MockProvider {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

impl HttpRequest for MockProvider {
    async fn fetch<T>(&self, request: Request<T>) -> Result<Response<Bytes>>
    where
        T: Body + Any + Send,
        T::Data: Send,
        T::Error: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        let path = request.uri().path().to_string();
        self.requests.lock().map_err(|e| anyhow!("{e}"))?.push(path.clone());

        let (status, data) = match path.as_str() {
            "/stops.json" => match &self.stops {
                Some(stops) => (StatusCode::OK, serde_json::to_vec(stops)?),
                None => return Err(anyhow!("connection refused")),
            },
            path if path.starts_with("/stops/") => match &self.schedule {
                Schedule::Departures(times) => {
                    let body = json!({ "stop": {}, "times": times });
                    (StatusCode::OK, serde_json::to_vec(&body)?)
                }
                Schedule::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, b"down".to_vec()),
            },
            _ => return Err(anyhow!("unknown path: {path}")),
        };

        Response::builder()
            .status(status)
            .body(Bytes::from(data))
            .context("failed to build response")
    }
}
