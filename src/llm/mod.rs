mod client;
mod types;

pub use client::{ChunkStream, CompletionClient, OpenAiClient};
pub use types::{ChatMessage, PromptTemplate, StreamChunk};
