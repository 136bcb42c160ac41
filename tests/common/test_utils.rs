use super::mocks::MockCompletionClient;
use axum::{Router, body::Body, http::Request, response::Response};
use bytes::Bytes;
use chatgate::{
    config::StreamFormat,
    llm::PromptTemplate,
    server::{self, AppState},
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};

pub const TEST_SYSTEM_PROMPT: &str = "you are an email composing expert.";

pub fn create_test_state(
    client: Arc<MockCompletionClient>,
    format: StreamFormat,
) -> AppState {
    AppState {
        llm: client,
        prompt: Arc::new(PromptTemplate::new(TEST_SYSTEM_PROMPT.to_string(), None)),
        stream_format: format,
        stall_timeout: None,
    }
}

pub fn create_test_app(client: Arc<MockCompletionClient>, format: StreamFormat) -> Router {
    server::app(create_test_state(client, format))
}

pub fn create_test_app_with_stall_timeout(
    client: Arc<MockCompletionClient>,
    format: StreamFormat,
    stall_timeout: Duration,
) -> Router {
    let mut state = create_test_state(client, format);
    state.stall_timeout = Some(stall_timeout);
    server::app(state)
}

pub fn chat_request(message: &str) -> Request<Body> {
    let body = serde_json::json!({ "message": message });

    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_body(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn read_json_body(response: Response) -> Value {
    let bytes = read_body(response).await;
    serde_json::from_slice(&bytes).unwrap()
}
