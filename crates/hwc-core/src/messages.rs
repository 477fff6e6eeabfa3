//! Message log: append/drain string messages keyed by a logical channel name.
//!
//! The engine never formats or persists logs. It appends plain strings here
//! and callers drain them when they want to show diagnostics. A log given a
//! capacity drops the oldest messages of a channel once it is full.

use crate::types::FxHashMap;

/// Outbound logging collaborator.
pub trait MessageSink {
    /// Append one message to `channel`.
    fn append(&mut self, channel: &str, message: String);

    /// Remove and return every message of `channel`, oldest first.
    fn drain(&mut self, channel: &str) -> Vec<String>;

    /// Remove and return every message of every channel, channels sorted by name.
    fn drain_all(&mut self) -> Vec<(String, Vec<String>)>;
}

/// In-memory [`MessageSink`]. Optionally mirrors appended messages as
/// `tracing` debug events.
///
/// Unbounded unless built with [`MessageLog::with_capacity`].
#[derive(Debug, Default)]
pub struct MessageLog {
    channels: FxHashMap<String, Vec<String>>,
    mirror_to_tracing: bool,
    capacity: Option<usize>,
    dropped: usize,
}

impl MessageLog {
    /// Create an empty log that does not mirror to tracing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty log that mirrors every appended message to tracing.
    pub fn mirrored() -> Self {
        Self {
            mirror_to_tracing: true,
            ..Self::default()
        }
    }

    /// Keep at most `capacity` undrained messages per channel.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity.max(1));
        self
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Messages discarded for lack of room since the log was created.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Messages currently held for `channel`, without draining them.
    pub fn peek(&self, channel: &str) -> &[String] {
        self.channels.get(channel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of pending messages across all channels.
    pub fn len(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every pending message.
    pub fn clear(&mut self) {
        self.channels.clear();
    }
}

impl MessageSink for MessageLog {
    fn append(&mut self, channel: &str, message: String) {
        if self.mirror_to_tracing {
            ::tracing::debug!(channel, "{message}");
        }
        let pending = self.channels.entry(channel.to_string()).or_default();
        pending.push(message);
        if let Some(capacity) = self.capacity {
            if pending.len() > capacity {
                let excess = pending.len() - capacity;
                pending.drain(..excess);
                self.dropped += excess;
                ::tracing::warn!(channel, capacity, "message log full, dropped oldest message");
            }
        }
    }

    fn drain(&mut self, channel: &str) -> Vec<String> {
        self.channels.remove(channel).unwrap_or_default()
    }

    fn drain_all(&mut self) -> Vec<(String, Vec<String>)> {
        let mut all: Vec<(String, Vec<String>)> = self.channels.drain().collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_then_drain_preserves_order() {
        let mut log = MessageLog::new();
        log.append("hwc", "first".into());
        log.append("hwc", "second".into());
        assert_eq!(log.drain("hwc"), vec!["first", "second"]);
        assert!(log.drain("hwc").is_empty());
    }

    #[test]
    fn test_channels_are_independent() {
        let mut log = MessageLog::new();
        log.append("a", "x".into());
        log.append("b", "y".into());
        assert_eq!(log.drain("a"), vec!["x"]);
        assert_eq!(log.peek("b"), &["y".to_string()]);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_full_channel_drops_oldest() {
        let mut log = MessageLog::new().with_capacity(2);
        for m in ["one", "two", "three"] {
            log.append("hwc", m.into());
        }
        log.append("other", "kept".into());
        assert_eq!(log.peek("hwc"), &["two".to_string(), "three".to_string()]);
        assert_eq!(log.peek("other"), &["kept".to_string()]);
        assert_eq!(log.dropped(), 1);

        log.drain("hwc");
        log.append("hwc", "four".into());
        assert_eq!(log.peek("hwc"), &["four".to_string()]);
        assert_eq!(log.dropped(), 1);
    }

    #[test]
    fn test_default_log_is_unbounded() {
        let mut log = MessageLog::new();
        for i in 0..2000 {
            log.append("hwc", i.to_string());
        }
        assert_eq!(log.capacity(), None);
        assert_eq!(log.len(), 2000);
        assert_eq!(log.dropped(), 0);
    }

    #[test]
    fn test_drain_all_sorted_and_empties() {
        let mut log = MessageLog::mirrored();
        log.append("zeta", "z".into());
        log.append("alpha", "a".into());
        let all = log.drain_all();
        assert_eq!(all[0].0, "alpha");
        assert_eq!(all[1].0, "zeta");
        assert!(log.is_empty());
    }
}
