use super::RelayEvent;
use crate::config::StreamFormat;
use bytes::Bytes;

/// Wire framing capability for the streaming response body.
pub trait FrameEncoder: Send + Sync {
    /// Content type advertised on the streaming response.
    fn content_type(&self) -> &'static str;

    fn encode(&self, event: &RelayEvent) -> Bytes;
}

/// Server-Sent-Events style framing.
pub struct EventStreamEncoder;

impl FrameEncoder for EventStreamEncoder {
    fn content_type(&self) -> &'static str {
        "text/event-stream"
    }

    fn encode(&self, event: &RelayEvent) -> Bytes {
        match event {
            // The space before the blank line is part of the wire format.
            RelayEvent::Content(text) => Bytes::from(format!("data: {} \n\n", text)),
            RelayEvent::Error(message) => Bytes::from(format!("Error: {}", message)),
        }
    }
}

/// One complete JSON object per line.
pub struct JsonLinesEncoder;

impl FrameEncoder for JsonLinesEncoder {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode(&self, event: &RelayEvent) -> Bytes {
        let value = match event {
            RelayEvent::Content(text) => serde_json::json!({ "data": text }),
            RelayEvent::Error(message) => serde_json::json!({ "error": message }),
        };
        Bytes::from(format!("{}\n", value))
    }
}

pub fn encoder_for(format: StreamFormat) -> &'static dyn FrameEncoder {
    match format {
        StreamFormat::EventStream => &EventStreamEncoder,
        StreamFormat::JsonLines => &JsonLinesEncoder,
    }
}
