use serde::{Deserialize, Serialize};

/// A named conversation thread with an ordered message history.
///
/// `messages` is append-only in storage: insertion order is the
/// conversation order and survives persistence round-trips exactly.
/// Truncation only ever happens in the transient context window built
/// for a completion call, never here.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Channel {
    pub name: String,
    pub topic: String,
    pub messages: Vec<String>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            topic: String::new(),
            messages: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_channel_is_empty() {
        let ch = Channel::new("general");
        assert_eq!(ch.name, "general");
        assert!(ch.topic.is_empty());
        assert!(ch.messages.is_empty());
    }

    #[test]
    fn serde_preserves_message_order() {
        let mut ch = Channel::new("crypto");
        ch.topic = "markets".into();
        ch.messages = vec!["one".into(), "two".into(), "three".into()];

        let json = serde_json::to_string(&ch).unwrap();
        let parsed: Channel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ch);
    }
}
