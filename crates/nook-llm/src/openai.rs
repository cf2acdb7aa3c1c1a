use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use nook_core::completer::{Completer, CompletionRequest};
use nook_core::errors::CompleterError;
use nook_core::messages::ChatMessage;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_TOKENS: u32 = 4096;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Completer backed by an OpenAI-compatible chat completions endpoint.
/// One request per prompt, no streaming, no retry: a failure is
/// surfaced to the caller as-is.
pub struct OpenAiCompleter {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenAiCompleter {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build a completer from the conventional environment variable.
    /// A missing or empty key is a `MissingCredential` error, which the
    /// chat layer turns into a visible reply.
    pub fn from_env() -> Result<Self, CompleterError> {
        let key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(CompleterError::MissingCredential)?;
        Ok(Self::new(SecretString::from(key)))
    }

    /// Point at a different endpoint (local proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    user: &'a str,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[async_trait]
impl Completer for OpenAiCompleter {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompleterError> {
        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            user: &request.user,
            max_tokens: MAX_TOKENS,
        };

        debug!(
            user = %request.user,
            messages = request.messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| CompleterError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompleterError::from_status(status.as_u16(), body));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompleterError::NetworkError(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(CompleterError::EmptyResponse)
    }
}
