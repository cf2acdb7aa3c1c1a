use async_trait::async_trait;

use crate::errors::CompleterError;
use crate::messages::ChatMessage;

/// A bounded, ordered context window plus a caller identifier,
/// ready to send to a completion API.
#[derive(Clone, Debug)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    /// Per-caller identifier forwarded to the API (the channel name).
    pub user: String,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>, user: impl Into<String>) -> Self {
        Self {
            messages,
            user: user.into(),
        }
    }
}

/// Trait implemented by each completion backend.
/// Given an ordered list of role-tagged messages, return a text reply
/// or an error. No retry happens behind this boundary.
#[async_trait]
pub trait Completer: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompleterError>;
}
