use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use bytes::Bytes;
use fulfillment::{Handler, Reply, Result};
use http::HeaderMap;
use next_bus::{WebhookRequest, WebhookResponse};

use crate::provider::Provider;

pub fn router(provider: Provider) -> Router {
    Router::new()
        .route("/galway-bus", post(galway_bus))
        .route("/health", get(health))
        .with_state(provider)
}

#[axum::debug_handler]
async fn galway_bus(
    State(provider): State<Provider>, headers: HeaderMap, body: Bytes,
) -> Result<Reply<WebhookResponse>> {
    tracing::debug!(?headers, "webhook request headers");
    tracing::debug!(body = %String::from_utf8_lossy(&body), "webhook request body");

    WebhookRequest::try_from(body.as_ref())?.handle(&provider).await
}

async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Settings;

    fn app() -> Router {
        router(Provider::new(Settings::default()).expect("should build provider"))
    }

    async fn text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.expect("should read body").to_bytes();
        String::from_utf8(bytes.to_vec()).expect("should be utf-8")
    }

    #[tokio::test]
    async fn health_check() {
        let request = Request::get("/health").body(Body::empty()).expect("should build");
        let response = app().oneshot(request).await.expect("should respond");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text(response).await, "OK");
    }

    #[tokio::test]
    async fn malformed_payload() {
        let request =
            Request::post("/galway-bus").body(Body::from("{not json")).expect("should build");
        let response = app().oneshot(request).await.expect("should respond");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_action() {
        let body = serde_json::json!({"result": {"action": "order-pizza"}}).to_string();
        let request = Request::post("/galway-bus").body(Body::from(body)).expect("should build");
        let response = app().oneshot(request).await.expect("should respond");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(text(response).await.contains("unsupported action: order-pizza"));
    }

    #[tokio::test]
    async fn permission_prompt() {
        let body = serde_json::json!({
            "result": {"action": "bus-requested", "parameters": {"busnumber": "404"}}
        })
        .to_string();
        let request = Request::post("/galway-bus").body(Body::from(body)).expect("should build");
        let response = app().oneshot(request).await.expect("should respond");

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value =
            serde_json::from_str(&text(response).await).expect("should be json");
        assert_eq!(json["data"]["google"]["systemIntent"]["intent"], "actions.intent.PERMISSION");
        assert_eq!(json["contextOut"][0]["parameters"]["busnumber"], "404");
    }
}
