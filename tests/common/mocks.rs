use async_trait::async_trait;
use chatgate::{
    Error, Result,
    llm::{ChatMessage, ChunkStream, CompletionClient, StreamChunk},
};
use futures_util::{StreamExt, stream};
use std::sync::{Arc, Mutex};

/// One scripted upstream stream item.
#[derive(Debug, Clone)]
pub enum MockItem {
    Content(String),
    Empty,
    Error(String),
}

impl MockItem {
    pub fn content(text: &str) -> Self {
        Self::Content(text.to_string())
    }

    pub fn error(message: &str) -> Self {
        Self::Error(message.to_string())
    }
}

/// Mock completion client replaying a scripted chunk sequence.
pub struct MockCompletionClient {
    pub script: Vec<MockItem>,
    pub requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    pub initiation_error: Option<String>,
    pub hang_after_script: bool,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            script: Vec::new(),
            requests: Arc::new(Mutex::new(Vec::new())),
            initiation_error: None,
            hang_after_script: false,
        }
    }

    pub fn with_script(mut self, script: Vec<MockItem>) -> Self {
        self.script = script;
        self
    }

    pub fn with_initiation_error(mut self, error: &str) -> Self {
        self.initiation_error = Some(error.to_string());
        self
    }

    pub fn hanging_after_script(mut self) -> Self {
        self.hang_after_script = true;
        self
    }

    pub fn get_requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> Result<ChunkStream> {
        self.requests.lock().unwrap().push(messages);

        if let Some(ref error) = self.initiation_error {
            return Err(Error::llm(error.clone()));
        }

        let items: Vec<Result<StreamChunk>> = self
            .script
            .iter()
            .map(|item| match item {
                MockItem::Content(text) => Ok(StreamChunk {
                    content: Some(text.clone()),
                }),
                MockItem::Empty => Ok(StreamChunk { content: None }),
                MockItem::Error(message) => Err(Error::llm(message.clone())),
            })
            .collect();

        if self.hang_after_script {
            Ok(Box::pin(stream::iter(items).chain(stream::pending())))
        } else {
            Ok(Box::pin(stream::iter(items)))
        }
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}
