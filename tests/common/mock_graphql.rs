//! Mock GraphQL server for exercising the client against real HTTP.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A captured GraphQL request for assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub operation_name: String,
    pub variables: Value,
    pub authorization: Option<String>,
}

/// A mock response to return.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Value,
    pub delay_ms: u64,
}

impl MockResponse {
    /// `{"data": {<field>: <value>}}`
    pub fn data(field: &str, value: Value) -> Self {
        let mut data = serde_json::Map::new();
        data.insert(field.to_string(), value);
        Self {
            status: 200,
            body: json!({ "data": data }),
            delay_ms: 0,
        }
    }

    /// `{"data": null, "errors": [{"message": ...}]}`
    pub fn errors(messages: &[&str]) -> Self {
        let errors: Vec<Value> = messages.iter().map(|m| json!({ "message": m })).collect();
        Self {
            status: 200,
            body: json!({ "data": null, "errors": errors }),
            delay_ms: 0,
        }
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    responses: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
}

/// Mock GraphQL endpoint. Responses are queued per operation name; an
/// operation with an empty queue answers with `{"data": null}`.
pub struct MockGraphql {
    pub addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockGraphql {
    pub async fn start() -> Self {
        let state = MockState::default();
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/graphql", post(handle_request))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    /// Queue a response for the next request naming `operation`.
    pub async fn enqueue(&self, operation: &str, response: MockResponse) {
        self.state
            .responses
            .lock()
            .await
            .entry(operation.to_string())
            .or_default()
            .push_back(response);
    }

    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().await.clone()
    }

    pub async fn requests_for(&self, operation: &str) -> Vec<CapturedRequest> {
        self.captured_requests()
            .await
            .into_iter()
            .filter(|r| r.operation_name == operation)
            .collect()
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/graphql", self.addr)
    }
}

impl Drop for MockGraphql {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn handle_request(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let operation_name = body
        .get("operationName")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    state.requests.lock().await.push(CapturedRequest {
        operation_name: operation_name.clone(),
        variables: body.get("variables").cloned().unwrap_or(Value::Null),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let mock = state
        .responses
        .lock()
        .await
        .get_mut(&operation_name)
        .and_then(VecDeque::pop_front)
        .unwrap_or_else(|| MockResponse::status(200, json!({ "data": null })));

    if mock.delay_ms > 0 {
        tokio::time::sleep(tokio::time::Duration::from_millis(mock.delay_ms)).await;
    }

    let status = StatusCode::from_u16(mock.status).unwrap();
    (status, Json(mock.body)).into_response()
}
