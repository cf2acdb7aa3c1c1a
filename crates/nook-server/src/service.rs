use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use nook_core::completer::{Completer, CompletionRequest};
use nook_core::errors::CompleterError;
use nook_llm::window::{build_window, DEFAULT_WINDOW_BUDGET};
use nook_store::ChannelRegistry;

/// Channel used when a prompt names no channel or an unknown one.
pub const DEFAULT_CHANNEL: &str = "general";

/// Channels seeded at startup.
pub const DEFAULT_CHANNELS: &[&str] = &["general", "crypto", "islam", "news", "test"];

const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

/// Reply produced for an inbound prompt.
#[derive(Clone, Debug)]
pub struct PromptReply {
    pub answer: String,
    pub rendered_html: String,
}

/// Orchestrates the prompt flow: record the prompt in the channel,
/// build a bounded context window, ask the completer, record the
/// reply. The registry lock is never held while the completer runs.
pub struct ChatService {
    registry: Arc<ChannelRegistry>,
    completer: Arc<dyn Completer>,
    window_budget: usize,
    completion_timeout: Duration,
}

impl ChatService {
    pub fn new(registry: Arc<ChannelRegistry>, completer: Arc<dyn Completer>) -> Self {
        Self {
            registry,
            completer,
            window_budget: DEFAULT_WINDOW_BUDGET,
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }

    pub fn with_window_budget(mut self, budget: usize) -> Self {
        self.window_budget = budget;
        self
    }

    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    /// Create the standing channels if this is a fresh registry.
    pub fn seed_default_channels(&self) {
        for name in DEFAULT_CHANNELS {
            let _ = self.registry.get_or_create(name);
        }
    }

    /// Handle an inbound prompt for a session.
    ///
    /// An empty or unknown channel name falls back to the default
    /// channel. Completer failures and timeouts degrade to the error
    /// text as the visible reply rather than dropping the exchange.
    pub async fn prompt(
        &self,
        session_id: &str,
        channel: &str,
        text: &str,
        render_markdown: bool,
    ) -> PromptReply {
        let channel = self.resolve_channel(channel);

        // History before this prompt feeds the window; the prompt
        // itself is recorded next and appended to the window last.
        let history = self.registry.messages(&channel).unwrap_or_default();

        if self.registry.append_message(&channel, text).is_err() {
            // Restored registry without the default channel.
            let _ = self.registry.get_or_create(&channel);
            let _ = self.registry.append_message(&channel, text);
        }

        let window = build_window(&history, text, self.window_budget);
        let request = CompletionRequest::new(window, &channel);

        info!(
            session = %session_id,
            channel = %channel,
            window = request.messages.len(),
            "prompt accepted"
        );

        let answer = match tokio::time::timeout(
            self.completion_timeout,
            self.completer.complete(&request),
        )
        .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(kind = e.error_kind(), error = %e, "completer failed");
                e.to_string()
            }
            Err(_) => {
                let e = CompleterError::Timeout(self.completion_timeout);
                warn!(kind = e.error_kind(), "completer timed out");
                e.to_string()
            }
        };

        let rendered_html = crate::template::render_markdown(&answer);
        let stored = if render_markdown {
            rendered_html.clone()
        } else {
            answer.clone()
        };

        if let Err(e) = self.registry.append_message(&channel, stored) {
            warn!(error = %e, "failed to record reply");
        }

        PromptReply {
            answer,
            rendered_html,
        }
    }

    fn resolve_channel(&self, name: &str) -> String {
        if name.is_empty() {
            return DEFAULT_CHANNEL.to_string();
        }
        if self.registry.contains(name) {
            name.to_string()
        } else {
            DEFAULT_CHANNEL.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nook_llm::mock::{MockCompleter, MockReply};
    use nook_store::FlushSignal;

    fn service(replies: Vec<MockReply>) -> (ChatService, Arc<MockCompleter>) {
        let (flush, _rx) = FlushSignal::new();
        let registry = Arc::new(ChannelRegistry::new(flush));
        let completer = Arc::new(MockCompleter::new(replies));
        let svc = ChatService::new(registry, Arc::clone(&completer) as Arc<dyn Completer>);
        svc.seed_default_channels();
        (svc, completer)
    }

    #[tokio::test]
    async fn prompt_and_reply_are_recorded_in_order() {
        let (svc, _mock) = service(vec![MockReply::text("the answer")]);

        let reply = svc.prompt("sess-1", "general", "the question", false).await;
        assert_eq!(reply.answer, "the answer");

        let messages = svc.registry().messages("general").unwrap();
        assert_eq!(messages, vec!["the question".to_string(), "the answer".into()]);
    }

    #[tokio::test]
    async fn window_holds_prior_history_then_prompt() {
        let (svc, mock) = service(vec![MockReply::text("a"), MockReply::text("b")]);

        svc.prompt("s", "general", "first", false).await;
        svc.prompt("s", "general", "second", false).await;

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);

        // First call: no history yet, just the prompt.
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].messages[0].content, "first");

        // Second call: prior exchange, then the new prompt, once.
        let contents: Vec<&str> = requests[1].messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "a", "second"]);
        assert_eq!(requests[1].user, "general");
    }

    #[tokio::test]
    async fn unknown_channel_falls_back_to_general() {
        let (svc, mock) = service(vec![MockReply::text("ok")]);

        svc.prompt("s", "doesnotexist", "hello", false).await;

        assert!(!svc.registry().contains("doesnotexist"));
        let messages = svc.registry().messages(DEFAULT_CHANNEL).unwrap();
        assert_eq!(messages[0], "hello");
        assert_eq!(mock.requests()[0].user, "general");
    }

    #[tokio::test]
    async fn empty_channel_name_uses_default() {
        let (svc, _mock) = service(vec![MockReply::text("ok")]);
        svc.prompt("s", "", "hello", false).await;
        assert_eq!(svc.registry().messages(DEFAULT_CHANNEL).unwrap()[0], "hello");
    }

    #[tokio::test]
    async fn completer_error_text_becomes_the_reply() {
        let (svc, _mock) = service(vec![MockReply::Error(CompleterError::MissingCredential)]);

        let reply = svc.prompt("s", "general", "hello", false).await;
        assert_eq!(reply.answer, "no completion credential configured");

        // The failure reply is recorded like any other.
        let messages = svc.registry().messages("general").unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], "no completion credential configured");
    }

    #[tokio::test]
    async fn slow_completer_times_out_into_a_visible_reply() {
        let (svc, _mock) = service(vec![MockReply::delayed(
            Duration::from_secs(5),
            MockReply::text("too late"),
        )]);
        let svc = svc.with_completion_timeout(Duration::from_millis(50));

        let reply = svc.prompt("s", "general", "hello", false).await;
        assert!(reply.answer.starts_with("timeout after"));
    }

    #[tokio::test]
    async fn markdown_reply_is_stored_rendered() {
        let (svc, _mock) = service(vec![MockReply::text("**bold**")]);

        let reply = svc.prompt("s", "general", "hello", true).await;
        assert_eq!(reply.answer, "**bold**");
        assert!(reply.rendered_html.contains("<strong>bold</strong>"));

        let messages = svc.registry().messages("general").unwrap();
        assert!(messages[1].contains("<strong>bold</strong>"));
    }

    #[tokio::test]
    async fn seeded_channels_are_present_and_sorted() {
        let (svc, _mock) = service(vec![]);
        assert_eq!(
            svc.registry().list(),
            vec!["crypto", "general", "islam", "news", "test"]
        );
    }
}
