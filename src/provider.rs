use std::any::Any;
use std::env;
use std::error::Error;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use fulfillment::{Config, HttpRequest, Time};
use http::{Request, Response};
use http_body::Body;
use http_body_util::BodyExt;

use crate::config::Settings;

/// Host implementation of the lookup's provider traits.
#[derive(Debug, Clone)]
pub struct Provider {
    client: reqwest::Client,
    settings: Arc<Settings>,
}

impl Provider {
    pub fn new(settings: Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.http_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building http client")?;

        Ok(Self { client, settings: Arc::new(settings) })
    }
}

impl HttpRequest for Provider {
    async fn fetch<T>(&self, request: Request<T>) -> Result<Response<Bytes>>
    where
        T: Body + Any + Send,
        T::Data: Send,
        T::Error: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        let (parts, body) = request.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                let source: Box<dyn Error + Send + Sync + 'static> = e.into();
                return Err(anyhow!(source).context("reading request body"));
            }
        };

        tracing::debug!(method = %parts.method, uri = %parts.uri, "sending request");

        let mut builder =
            self.client.request(parts.method, parts.uri.to_string()).headers(parts.headers);
        if !body.is_empty() {
            builder = builder.body(body);
        }

        let response = builder.send().await.context("sending request")?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.context("reading response body")?;

        let mut reply = Response::new(body);
        *reply.status_mut() = status;
        *reply.headers_mut() = headers;
        Ok(reply)
    }
}

impl Config for Provider {
    async fn get(&self, key: &str) -> Result<String> {
        match key {
            "GALWAY_BUS_URL" => Ok(self.settings.galway_bus_url.clone()),
            _ => env::var(key).with_context(|| format!("{key} not set")),
        }
    }
}

impl Time for Provider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
