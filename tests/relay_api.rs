//! Router-level tests: build the app, call it with `oneshot`, check the reply.

use std::sync::{ Arc, Mutex };

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{ Request, StatusCode };
use serde_json::{ json, Value };
use terezka_relay::config::widget::WidgetConfig;
use terezka_relay::error::RelayError;
use terezka_relay::llm::chat::gemini::GeminiChatClient;
use terezka_relay::llm::chat::ChatClient;
use terezka_relay::models::chat::{ Role, Turn };
use terezka_relay::server::api::{ router, AppState };
use tower::ServiceExt;

const FALLBACK: &str = "Omlouvám se, došlo k chybě.";

#[derive(Default)]
struct RecordingClient {
    reply: Option<String>,
    seen: Mutex<Vec<Vec<Turn>>>,
}

#[async_trait]
impl ChatClient for RecordingClient {
    async fn generate(&self, turns: &[Turn]) -> Result<String, RelayError> {
        self.seen.lock().unwrap().push(turns.to_vec());
        self.reply.clone().ok_or(RelayError::MissingReply)
    }

    fn get_model(&self) -> String {
        "recording".into()
    }
}

fn app_with(client: Arc<dyn ChatClient>) -> axum::Router {
    let state = AppState::new(client, WidgetConfig::default()).expect("app state");
    router(state, None)
}

fn unreachable_gemini() -> Arc<dyn ChatClient> {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    Arc::new(
        GeminiChatClient::new(
            "test-key".into(),
            None,
            Some(format!("http://127.0.0.1:{}/v1beta", port))
        )
    )
}

async fn post_chat(app: axum::Router, content_type: &str, body: String) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap();

    let resp = app.oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.expect("read body");
    let json: Value = serde_json::from_slice(&bytes).expect("parse JSON");
    (status, json)
}

#[tokio::test]
async fn unreachable_upstream_yields_fallback_with_200() {
    let body = json!({
        "messages": [
            { "role": "system", "content": [{ "text": "Jsi Terezka." }] },
            { "role": "user", "parts": [{ "text": "Ahoj" }] }
        ]
    });

    let (status, json) = post_chat(app_with(unreachable_gemini()), "application/json", body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "reply": FALLBACK }));
}

#[tokio::test]
async fn missing_api_key_yields_fallback_with_200() {
    let client: Arc<dyn ChatClient> = Arc::new(GeminiChatClient::new(String::new(), None, None));
    let body = json!({ "messages": [{ "role": "user", "parts": [{ "text": "Ahoj" }] }] });

    let (status, json) = post_chat(app_with(client), "application/json", body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], FALLBACK);
}

#[tokio::test]
async fn upstream_reply_is_passed_through_in_order() {
    let client = Arc::new(RecordingClient {
        reply: Some("EDC je energetické datové centrum.".into()),
        ..RecordingClient::default()
    });
    let body = json!({
        "messages": [
            { "role": "system", "content": [{ "text": "Jsi Terezka." }] },
            { "role": "model", "parts": [{ "text": "Vítejte!" }] },
            { "role": "user", "parts": [{ "text": "Co je EDC?" }] }
        ]
    });

    let (status, json) = post_chat(app_with(client.clone()), "application/json", body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], "EDC je energetické datové centrum.");

    let seen = client.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let roles: Vec<Role> = seen[0].iter().map(|t| t.role).collect();
    assert_eq!(roles, vec![Role::System, Role::Model, Role::User]);
    assert_eq!(seen[0][2].text, "Co je EDC?");
}

#[tokio::test]
async fn missing_reply_path_yields_fallback() {
    let client = Arc::new(RecordingClient::default());
    let body = json!({ "messages": [{ "role": "user", "parts": [{ "text": "Ahoj" }] }] });

    let (status, json) = post_chat(app_with(client), "application/json", body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], FALLBACK);
}

#[tokio::test]
async fn malformed_requests_yield_fallback_without_upstream_call() {
    let cases = [
        ("application/json", "{not json".to_string()),
        ("application/json", json!({ "msgs": [] }).to_string()),
        ("application/json", json!({ "messages": [{ "role": "robot", "parts": [] }] }).to_string()),
        ("text/plain", json!({ "messages": [] }).to_string()),
    ];

    for (content_type, body) in cases {
        let client = Arc::new(RecordingClient {
            reply: Some("nemělo by se stát".into()),
            ..RecordingClient::default()
        });
        let (status, json) = post_chat(app_with(client.clone()), content_type, body.clone()).await;

        assert_eq!(status, StatusCode::OK, "body: {}", body);
        assert_eq!(json["reply"], FALLBACK, "body: {}", body);
        assert!(client.seen.lock().unwrap().is_empty());
    }
}
