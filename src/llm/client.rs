use super::types::{ChatMessage, StreamChunk};
use crate::{Result, config::LlmConfig};
use async_openai::{Client, config::OpenAIConfig, types as openai_types};
use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> Result<ChunkStream>;
}

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
    generation_name: String,
    verbose: bool,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key);

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url);
        }

        // The timeout governs call initiation only; an established stream
        // has no deadline here (see the relay's stall timeout).
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let client = Client::with_config(openai_config).with_http_client(http_client);

        Ok(Self {
            client,
            model: config.model,
            max_tokens: config.max_tokens,
            generation_name: config.generation_name,
            verbose: config.verbose,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> Result<ChunkStream> {
        debug!(
            "Opening streaming chat completion with {} messages",
            messages.len()
        );

        let mut openai_messages = Vec::new();
        for msg in messages {
            openai_messages.push(msg.to_openai_message()?);
        }

        let request = openai_types::CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(openai_messages)
            .max_tokens(self.max_tokens)
            .stream(true)
            .metadata(serde_json::json!({
                "generation_name": self.generation_name,
            }))
            .build()?;

        if self.verbose {
            debug!(
                model = %self.model,
                max_tokens = self.max_tokens,
                "Sending upstream completion request"
            );
        }

        let stream = self.client.chat().create_stream(request).await?;

        let verbose = self.verbose;
        let chunks = stream.map(move |item| match item {
            Ok(response) => {
                let chunk = StreamChunk::from(response);
                if verbose {
                    debug!(content = ?chunk.content, "Received upstream delta");
                }
                Ok(chunk)
            }
            Err(e) => Err(e.into()),
        });

        Ok(Box::pin(chunks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> LlmConfig {
        LlmConfig {
            provider: "openai".to_string(),
            base_url: "http://192.168.1.74:9198/v1".to_string(),
            api_key: "empty".to_string(),
            model: "openai/Meta-Llama-3-70B-Instruct".to_string(),
            system_prompt: "you are an email composing expert.".to_string(),
            user_suffix: None,
            max_tokens: 1024,
            timeout_secs: 60,
            generation_name: "test-vana".to_string(),
            verbose: false,
        }
    }

    #[test]
    fn test_openai_client_creation() {
        let config = create_test_config();
        let client = OpenAiClient::new(config).unwrap();

        assert_eq!(client.model, "openai/Meta-Llama-3-70B-Instruct");
        assert_eq!(client.max_tokens, 1024);
    }

    #[test]
    fn test_openai_client_with_empty_base_url() {
        let mut config = create_test_config();
        config.base_url = String::new();

        let client = OpenAiClient::new(config).unwrap();
        assert_eq!(client.generation_name, "test-vana");
    }
}
