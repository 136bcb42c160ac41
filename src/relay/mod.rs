mod encoder;

pub use encoder::{EventStreamEncoder, FrameEncoder, JsonLinesEncoder, encoder_for};

use crate::llm::ChunkStream;
use bytes::Bytes;
use futures_util::{Stream, StreamExt, stream};
use std::time::Duration;

/// One unit of relay output. End-of-stream is the end of the sequence
/// itself; after an `Error` no further events are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Content(String),
    Error(String),
}

struct RelayState {
    upstream: ChunkStream,
    done: bool,
}

/// Maps the upstream chunk stream to relay events, one pass, in arrival
/// order. Non-empty deltas become `Content`, empty deltas are skipped, and
/// the first upstream failure (or stall-timeout expiry, when configured)
/// becomes a single terminal `Error`.
pub fn relay_events(
    upstream: ChunkStream,
    stall_timeout: Option<Duration>,
) -> impl Stream<Item = RelayEvent> + Send {
    let state = RelayState {
        upstream,
        done: false,
    };

    stream::unfold(state, move |mut state| async move {
        if state.done {
            return None;
        }

        loop {
            let next = match stall_timeout {
                Some(limit) => match tokio::time::timeout(limit, state.upstream.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        state.done = true;
                        return Some((
                            RelayEvent::Error(format!("upstream stalled after {:?}", limit)),
                            state,
                        ));
                    }
                },
                None => state.upstream.next().await,
            };

            match next {
                Some(Ok(chunk)) => match chunk.text() {
                    Some(text) => return Some((RelayEvent::Content(text), state)),
                    None => continue,
                },
                Some(Err(e)) => {
                    state.done = true;
                    return Some((RelayEvent::Error(e.to_string()), state));
                }
                None => return None,
            }
        }
    })
}

/// Encodes relay events into wire frames for the response body.
pub fn frame_stream(
    upstream: ChunkStream,
    encoder: &'static dyn FrameEncoder,
    stall_timeout: Option<Duration>,
) -> impl Stream<Item = Bytes> + Send {
    relay_events(upstream, stall_timeout).map(move |event| encoder.encode(&event))
}
