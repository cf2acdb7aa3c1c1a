use std::collections::HashMap;

use parking_lot::RwLock;

use crate::channel::Channel;
use crate::error::StoreError;
use crate::flush::FlushSignal;

/// Shared registry of chat channels.
///
/// One reader/writer lock guards the whole mapping and every channel's
/// message sequence; correctness, not throughput, is the binding
/// constraint here. The lock is never held across an await point or
/// any file I/O. Every successful mutation raises the flush signal
/// before the lock is released, and the flush itself happens out of
/// band in the persistence loop.
pub struct ChannelRegistry {
    channels: RwLock<HashMap<String, Channel>>,
    flush: FlushSignal,
}

impl ChannelRegistry {
    pub fn new(flush: FlushSignal) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            flush,
        }
    }

    /// Look up a channel, creating it if absent. Idempotent: repeated
    /// calls with the same name refer to the same underlying state.
    /// Returns a copy of the channel at this moment.
    pub fn get_or_create(&self, name: &str) -> Channel {
        let mut channels = self.channels.write();
        if let Some(existing) = channels.get(name) {
            return existing.clone();
        }
        let channel = Channel::new(name);
        channels.insert(name.to_string(), channel.clone());
        self.flush.raise();
        channel
    }

    /// Append a message to an existing channel's history.
    ///
    /// Unknown names are reported, not created; lazy creation is
    /// reserved for explicit `get_or_create`.
    pub fn append_message(&self, name: &str, text: impl Into<String>) -> Result<(), StoreError> {
        let mut channels = self.channels.write();
        let channel = channels
            .get_mut(name)
            .ok_or_else(|| StoreError::ChannelNotFound(name.to_string()))?;
        channel.messages.push(text.into());
        self.flush.raise();
        Ok(())
    }

    /// Replace a channel's topic label.
    pub fn set_topic(&self, name: &str, topic: impl Into<String>) -> Result<(), StoreError> {
        let mut channels = self.channels.write();
        let channel = channels
            .get_mut(name)
            .ok_or_else(|| StoreError::ChannelNotFound(name.to_string()))?;
        channel.topic = topic.into();
        self.flush.raise();
        Ok(())
    }

    /// Sorted channel names.
    pub fn list(&self) -> Vec<String> {
        let channels = self.channels.read();
        let mut names: Vec<String> = channels.keys().cloned().collect();
        names.sort();
        names
    }

    /// A channel's message history, oldest first.
    pub fn messages(&self, name: &str) -> Option<Vec<String>> {
        let channels = self.channels.read();
        channels.get(name).map(|ch| ch.messages.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.channels.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.read().is_empty()
    }

    /// Consistent copy of the full registry for persistence.
    pub fn snapshot(&self) -> HashMap<String, Channel> {
        self.channels.read().clone()
    }

    /// Replace the registry wholesale from a loaded snapshot.
    /// Startup only, before any request is served.
    pub fn restore(&self, channels: HashMap<String, Channel>) {
        *self.channels.write() = channels;
    }
}
