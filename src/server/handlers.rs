use super::types::{ChatRequest, ErrorResponse, GreetingResponse};
use crate::{
    config::StreamFormat,
    llm::{CompletionClient, PromptTemplate},
    relay,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{Json, Response},
};
use futures_util::StreamExt;
use std::{convert::Infallible, sync::Arc, time::Duration};
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn CompletionClient>,
    pub prompt: Arc<PromptTemplate>,
    pub stream_format: StreamFormat,
    pub stall_timeout: Option<Duration>,
}

pub async fn chat_stream(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    info!(
        "Received chat request ({} chars)",
        request.message.chars().count()
    );

    let messages = state.prompt.messages(&request.message);

    // Failures after the stream is open arrive as stream items and become
    // in-band error frames; only failures before that point may still be
    // promoted to an HTTP error status.
    let upstream = match state.llm.stream_chat(messages).await {
        Ok(upstream) => upstream,
        Err(e) => {
            error!("Failed to initiate upstream completion: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Internal Server Error: {}", e),
                }),
            ));
        }
    };

    let encoder = relay::encoder_for(state.stream_format);
    let frames =
        relay::frame_stream(upstream, encoder, state.stall_timeout).map(Ok::<_, Infallible>);

    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static(encoder.content_type()),
        )
        .header(header::CONTENT_ENCODING, HeaderValue::from_static("identity"))
        .header(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"))
        .header(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        )
        .body(Body::from_stream(frames))
        .map_err(|e| {
            error!("Failed to build streaming response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Internal Server Error: {}", e),
                }),
            )
        })
}

pub async fn root() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Hello World".to_string(),
    })
}

pub async fn say_hello(Path(name): Path<String>) -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: format!("Hello {}", name),
    })
}
