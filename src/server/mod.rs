pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::Config,
    llm::{OpenAiClient, PromptTemplate},
};
use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use handlers::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat_stream))
        .route("/", get(handlers::root))
        .route("/hello/:name", get(handlers::say_hello))
        .layer(middleware::from_fn(disable_gzip))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // Initialize the upstream client once; the verbose flag is read-only
    // from here on.
    let client = OpenAiClient::new(config.llm.clone())?;

    let state = AppState {
        llm: Arc::new(client),
        prompt: Arc::new(PromptTemplate::new(
            config.llm.system_prompt.clone(),
            config.llm.user_suffix.clone(),
        )),
        stream_format: config.server.stream_format,
        stall_timeout: config.server.stall_timeout_secs.map(Duration::from_secs),
    };

    let app = app(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Strips any gzip encoding an intermediary layer applied to a /chat
/// response and keeps the connection alive for the duration of the stream.
async fn disable_gzip(request: Request, next: Next) -> Response {
    let streaming = request.uri().path().starts_with("/chat");

    let mut response = next.run(request).await;

    if streaming {
        let headers = response.headers_mut();
        if headers
            .get(header::CONTENT_ENCODING)
            .is_some_and(|encoding| encoding == "gzip")
        {
            headers.remove(header::CONTENT_ENCODING);
        }
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    }

    response
}
