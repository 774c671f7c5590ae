use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CompletionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of a chat-style completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Sampling options for one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    /// Overrides the provider's configured model when set.
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Generative text completion provider. Used only by the few-shot tier.
#[async_trait]
pub trait ICompletionProvider: Send + Sync {
    /// Return the assistant's reply text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, CompletionError>;

    fn name(&self) -> &str;

    fn is_available(&self) -> bool;
}
