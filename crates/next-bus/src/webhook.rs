//! # Webhook
//!
//! Fulfillment for the conversational platform's webhook. Only the parts of
//! the envelope the lookup needs are modelled: the action, its parameters and
//! contexts, and the device location and permission grant supplied by the
//! platform.

use std::fmt;
use std::str::FromStr;

use fulfillment::{Error, Handler, Reply as HttpReply, Result, bad_request};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::info;

use crate::geo::Coordinate;
use crate::lookup::{self, LookupRequest, Reply};
use crate::provider::Provider;

const BUS_NUMBER_PARAM: &str = "busnumber";
const REQUEST_PERMISSION: &str = "request_permission";
const SESSION_LOCATION: &str = "session_location";
const PERMISSION_INTENT: &str = "actions.intent.PERMISSION";
const PERMISSION_SPEC: &str = "type.googleapis.com/google.actions.v2.PermissionValueSpec";
const PRECISE_LOCATION: &str = "DEVICE_PRECISE_LOCATION";
const NO_LOCATION: &str = "I cannot find when the next bus is coming without your location.";

/// Actions the webhook fulfils.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The user asked about a bus; location may still be needed.
    BusRequested,

    /// The platform is returning from the location permission prompt.
    FindBus,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BusRequested => "bus-requested",
            Self::FindBus => "find-bus",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bus-requested" => Ok(Self::BusRequested),
            "find-bus" => Ok(Self::FindBus),
            other => Err(bad_request!("unsupported action: {}", other)),
        }
    }
}

/// Webhook request from the conversational platform.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookRequest {
    pub result: QueryResult,
    pub original_request: Option<OriginalRequest>,
}

/// The matched intent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueryResult {
    pub action: String,
    pub parameters: Map<String, Value>,
    pub contexts: Vec<Context>,
}

/// A conversation context, used to carry values between turns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,

    #[serde(default)]
    pub parameters: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifespan: Option<u32>,
}

impl Context {
    fn request_permission(bus_number: &str) -> Self {
        let mut parameters = Map::new();
        parameters.insert(BUS_NUMBER_PARAM.to_string(), json!(bus_number));
        Self { name: REQUEST_PERMISSION.to_string(), parameters, lifespan: Some(5) }
    }

    fn session_location(coordinate: Coordinate) -> Self {
        let mut parameters = Map::new();
        parameters.insert("latitude".to_string(), json!(coordinate.latitude));
        parameters.insert("longitude".to_string(), json!(coordinate.longitude));
        Self { name: SESSION_LOCATION.to_string(), parameters, lifespan: Some(10) }
    }
}

/// Platform-specific part of the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OriginalRequest {
    pub data: RequestData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestData {
    pub device: Option<Device>,
    pub inputs: Vec<Input>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Device {
    pub location: Option<DeviceLocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeviceLocation {
    pub coordinates: Option<Coordinate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Input {
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Argument {
    pub name: String,
    pub text_value: Option<String>,
}

impl WebhookRequest {
    fn context(&self, name: &str) -> Option<&Context> {
        self.result.contexts.iter().find(|context| context.name == name)
    }

    /// The requested bus.
    ///
    /// A new request names its bus in the intent parameters. On return from the
    /// permission prompt the bus comes from the `request_permission` context,
    /// which can outlive the turn that wrote it.
    fn bus_number(&self, action: Action) -> Option<String> {
        let from_params = || self.result.parameters.get(BUS_NUMBER_PARAM).and_then(bus_value);
        let from_context = || {
            self.context(REQUEST_PERMISSION)
                .and_then(|context| context.parameters.get(BUS_NUMBER_PARAM))
                .and_then(bus_value)
        };

        match action {
            Action::BusRequested => from_params(),
            Action::FindBus => from_context().or_else(from_params),
        }
    }

    /// Location captured earlier in this conversation.
    fn session_location(&self) -> Option<Coordinate> {
        let context = self.context(SESSION_LOCATION)?;
        serde_json::from_value(Value::Object(context.parameters.clone())).ok()
    }

    fn device_coordinate(&self) -> Option<Coordinate> {
        self.original_request.as_ref()?.data.device.as_ref()?.location.as_ref()?.coordinates
    }

    fn permission_granted(&self) -> bool {
        self.original_request.as_ref().is_some_and(|original| {
            original.data.inputs.iter().flat_map(|input| &input.arguments).any(|argument| {
                argument.name == "PERMISSION" && argument.text_value.as_deref() == Some("true")
            })
        })
    }
}

fn bus_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

impl TryFrom<&[u8]> for WebhookRequest {
    type Error = serde_json::Error;

    fn try_from(value: &[u8]) -> anyhow::Result<Self, Self::Error> {
        serde_json::from_slice(value)
    }
}

/// Webhook response returned to the conversational platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub speech: String,
    pub display_text: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context_out: Vec<Context>,

    pub data: ResponseData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseData {
    pub google: GoogleData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleData {
    pub expect_user_response: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_intent: Option<SystemIntent>,
}

/// Request for the platform to run one of its built-in intents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemIntent {
    pub intent: String,
    pub data: PermissionSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSpec {
    #[serde(rename = "@type")]
    pub type_: String,
    pub opt_context: String,
    pub permissions: Vec<String>,
}

impl SystemIntent {
    fn precise_location(reason: &str) -> Self {
        Self {
            intent: PERMISSION_INTENT.to_string(),
            data: PermissionSpec {
                type_: PERMISSION_SPEC.to_string(),
                opt_context: reason.to_string(),
                permissions: vec![PRECISE_LOCATION.to_string()],
            },
        }
    }
}

impl WebhookResponse {
    /// Render a lookup reply, attaching the contexts the next turn needs.
    fn render(reply: &Reply, bus_number: &str, origin: Option<Coordinate>) -> Self {
        let mut context_out = vec![];
        let mut system_intent = None;

        match reply {
            Reply::AskLocation { reason } => {
                context_out.push(Context::request_permission(bus_number));
                system_intent = Some(SystemIntent::precise_location(reason));
            }
            Reply::Ask(_) => {
                if let Some(origin) = origin {
                    context_out.push(Context::session_location(origin));
                }
            }
            Reply::Tell(_) => {}
        }

        Self {
            speech: reply.speech().to_string(),
            display_text: reply.speech().to_string(),
            context_out,
            data: ResponseData {
                google: GoogleData { expect_user_response: reply.expects_response(), system_intent },
            },
        }
    }
}

async fn handle<P: Provider>(
    request: WebhookRequest, provider: &P,
) -> Result<HttpReply<WebhookResponse>> {
    let action: Action = request.result.action.parse()?;
    info!(monotonic_counter.webhook_requests = 1, action = %action);

    let coordinate = match action {
        Action::BusRequested => None,
        Action::FindBus => {
            let granted = request.permission_granted();
            let Some(coordinate) = request.device_coordinate().filter(|_| granted) else {
                info!(monotonic_counter.location_refused = 1);
                let reply = Reply::Tell(NO_LOCATION.to_string());
                return Ok(WebhookResponse::render(&reply, "", None).into());
            };
            Some(coordinate)
        }
    };

    let Some(bus_number) = request.bus_number(action) else {
        return Err(bad_request!("missing `{}` parameter", BUS_NUMBER_PARAM));
    };
    let known = request.session_location();

    let lookup_request = LookupRequest { coordinate, bus_number };
    let reply = lookup::handle_lookup(provider, &lookup_request, known).await;

    let origin = lookup_request.coordinate.or(known);
    Ok(WebhookResponse::render(&reply, &lookup_request.bus_number, origin).into())
}

impl<P: Provider> Handler<P> for WebhookRequest {
    type Output = WebhookResponse;

    async fn handle(self, provider: &P) -> Result<HttpReply<WebhookResponse>> {
        handle(self, provider).await
    }
}
