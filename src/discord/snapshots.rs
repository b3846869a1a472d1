//! Recent message contents, kept so deletions can be logged.
//!
//! Discord's delete event only carries ids, so the content has to be captured
//! when the message is first seen. Oldest entries are evicted first.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::audit::Actor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSnapshot {
    pub author: Actor,
    pub content: String,
}

pub struct MessageSnapshots {
    messages: DashMap<u64, MessageSnapshot>,
    order: Mutex<VecDeque<u64>>,
    capacity: usize,
}

impl MessageSnapshots {
    pub fn new(capacity: usize) -> Self {
        MessageSnapshots {
            messages: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    pub fn record(&self, message_id: u64, author: Actor, content: String) {
        if self.capacity == 0 {
            return;
        }

        let previous = self
            .messages
            .insert(message_id, MessageSnapshot { author, content });
        if previous.is_some() {
            return;
        }

        let mut order = self.order.lock().unwrap_or_else(|e| e.into_inner());
        order.push_back(message_id);
        while order.len() > self.capacity {
            if let Some(oldest) = order.pop_front() {
                self.messages.remove(&oldest);
            }
        }
    }

    /// Replaces the stored content and returns the snapshot as it was before.
    pub fn replace_content(&self, message_id: u64, content: String) -> Option<MessageSnapshot> {
        let mut entry = self.messages.get_mut(&message_id)?;
        let before = entry.clone();
        entry.content = content;
        Some(before)
    }

    /// Removes and returns the snapshot. The id stays in the eviction queue
    /// until it ages out, which only costs a no-op removal later.
    pub fn take(&self, message_id: u64) -> Option<MessageSnapshot> {
        self.messages.remove(&message_id).map(|(_, snapshot)| snapshot)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gonzo() -> Actor {
        Actor::new(2, "gonzo")
    }

    #[test]
    fn test_record_and_take() {
        let snapshots = MessageSnapshots::new(10);
        snapshots.record(1, gonzo(), "hello".to_string());

        let snapshot = snapshots.take(1).unwrap();
        assert_eq!(snapshot.content, "hello");
        assert_eq!(snapshot.author, gonzo());
        assert!(snapshots.take(1).is_none());
    }

    #[test]
    fn test_replace_content_returns_previous() {
        let snapshots = MessageSnapshots::new(10);
        snapshots.record(1, gonzo(), "helo".to_string());

        let before = snapshots.replace_content(1, "hello".to_string()).unwrap();
        assert_eq!(before.content, "helo");
        assert_eq!(snapshots.take(1).unwrap().content, "hello");
        assert!(snapshots.replace_content(99, "x".to_string()).is_none());
    }

    #[test]
    fn test_oldest_entries_are_evicted() {
        let snapshots = MessageSnapshots::new(2);
        snapshots.record(1, gonzo(), "one".to_string());
        snapshots.record(2, gonzo(), "two".to_string());
        snapshots.record(3, gonzo(), "three".to_string());

        assert_eq!(snapshots.len(), 2);
        assert!(snapshots.take(1).is_none());
        assert!(snapshots.take(3).is_some());
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let snapshots = MessageSnapshots::new(0);
        snapshots.record(1, gonzo(), "one".to_string());
        assert!(snapshots.is_empty());
    }
}
