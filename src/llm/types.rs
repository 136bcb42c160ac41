use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessageArgs,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionStreamResponse,
};

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn to_openai_message(&self) -> Result<ChatCompletionRequestMessage, crate::Error> {
        match self.role.as_str() {
            "system" => {
                let msg = ChatCompletionRequestSystemMessageArgs::default()
                    .content(ChatCompletionRequestSystemMessageContent::Text(
                        self.content.clone(),
                    ))
                    .build()
                    .map_err(|e| {
                        crate::Error::llm(format!("Failed to build system message: {}", e))
                    })?;
                Ok(msg.into())
            }
            "user" => {
                let msg = ChatCompletionRequestUserMessageArgs::default()
                    .content(ChatCompletionRequestUserMessageContent::Text(
                        self.content.clone(),
                    ))
                    .build()
                    .map_err(|e| {
                        crate::Error::llm(format!("Failed to build user message: {}", e))
                    })?;
                Ok(msg.into())
            }
            _ => Err(crate::Error::llm(format!(
                "Unknown message role: {}",
                self.role
            ))),
        }
    }
}

/// One incremental unit of model output.
#[derive(Debug, Clone)]
pub struct StreamChunk {
    pub content: Option<String>,
}

impl StreamChunk {
    /// Returns the delta text. Role-only and empty deltas yield None.
    pub fn text(self) -> Option<String> {
        self.content.filter(|content| !content.is_empty())
    }
}

impl From<CreateChatCompletionStreamResponse> for StreamChunk {
    fn from(response: CreateChatCompletionStreamResponse) -> Self {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content);

        Self { content }
    }
}

/// Builds the fixed two-role prompt sent on every chat request.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    system_prompt: String,
    user_suffix: Option<String>,
}

impl PromptTemplate {
    pub fn new(system_prompt: String, user_suffix: Option<String>) -> Self {
        Self {
            system_prompt,
            user_suffix,
        }
    }

    pub fn messages(&self, user_message: &str) -> Vec<ChatMessage> {
        let suffix = self.user_suffix.as_deref().unwrap_or("");
        vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(format!("QUERY:\n{}{}", user_message, suffix)),
        ]
    }
}
