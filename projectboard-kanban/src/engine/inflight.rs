//! Per-entity tracking of in-flight persistence calls
//!
//! Calls for the same entity run one after another in gesture order. Each
//! entity remembers the generation of its newest gesture and the last value
//! the server is known to hold. Only the newest gesture may roll back; an
//! older failure is superseded by whatever came after it.

use std::collections::HashMap;
use std::hash::Hash;
use tokio::sync::oneshot;

/// A claim on the persistence queue of one entity
#[derive(Debug)]
pub(crate) struct Ticket {
    pub generation: u64,
    wait_for: Option<oneshot::Receiver<()>>,
    // Dropped when the call settles, which lets the next ticket run
    _done: oneshot::Sender<()>,
}

impl Ticket {
    /// Wait until every earlier call for the same entity has settled.
    /// Cancel safe.
    pub async fn wait_turn(&mut self) {
        if let Some(previous) = self.wait_for.as_mut() {
            let _ = previous.await;
            self.wait_for = None;
        }
    }
}

/// How a failed call should be handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FailureVerdict<V> {
    /// Newest gesture for the entity: restore this value
    RollBack(V),
    /// A newer gesture owns the entity's state now
    Superseded,
}

#[derive(Debug)]
struct Entry<V> {
    latest: u64,
    fallback: V,
    tail: Option<oneshot::Receiver<()>>,
}

#[derive(Debug)]
pub(crate) struct Tracker<K, V> {
    entries: HashMap<K, Entry<V>>,
    next_generation: u64,
}

impl<K, V> Tracker<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Register a gesture on `key`. `current` is the value before the
    /// optimistic change; it becomes the fallback unless a call for `key` is
    /// already in flight.
    pub fn begin(&mut self, key: K, current: V) -> Ticket {
        self.next_generation += 1;
        let generation = self.next_generation;
        let (done, next) = oneshot::channel();

        let entry = self.entries.entry(key).or_insert_with(|| Entry {
            latest: generation,
            fallback: current,
            tail: None,
        });
        entry.latest = generation;
        let wait_for = entry.tail.replace(next);

        Ticket {
            generation,
            wait_for,
            _done: done,
        }
    }

    /// The server accepted `confirmed` for `key`
    pub fn settle_success(&mut self, key: &K, generation: u64, confirmed: V) {
        if let Some(entry) = self.entries.get_mut(key) {
            if entry.latest == generation {
                self.entries.remove(key);
            } else {
                entry.fallback = confirmed;
            }
        }
    }

    /// The server rejected the call with `generation`
    pub fn settle_failure(&mut self, key: &K, generation: u64) -> FailureVerdict<V> {
        let is_latest = self.entries.get(key).is_some_and(|e| e.latest == generation);
        if is_latest {
            if let Some(entry) = self.entries.remove(key) {
                return FailureVerdict::RollBack(entry.fallback);
            }
        }
        FailureVerdict::Superseded
    }

    /// Fresh server data arrived for `key`
    pub fn rebase(&mut self, key: &K, value: V) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.fallback = value;
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Forget every entity. Tickets already handed out keep their queue order.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_single_failure_rolls_back_to_value_before_gesture() {
        let mut tracker = Tracker::new();
        let ticket = tracker.begin(1, "todo");
        assert!(tracker.is_pending(&1));
        assert_eq!(tracker.settle_failure(&1, ticket.generation), FailureVerdict::RollBack("todo"));
        assert!(!tracker.is_pending(&1));
    }

    #[test]
    fn test_stale_failure_is_superseded() {
        let mut tracker = Tracker::new();
        let first = tracker.begin(1, "todo");
        let second = tracker.begin(1, "doing");

        assert_eq!(tracker.settle_failure(&1, first.generation), FailureVerdict::Superseded);
        // The fallback is still what the server held before both gestures
        assert_eq!(tracker.settle_failure(&1, second.generation), FailureVerdict::RollBack("todo"));
    }

    #[test]
    fn test_stale_success_advances_fallback() {
        let mut tracker = Tracker::new();
        let first = tracker.begin(1, "todo");
        let second = tracker.begin(1, "doing");

        tracker.settle_success(&1, first.generation, "doing");
        assert_eq!(tracker.settle_failure(&1, second.generation), FailureVerdict::RollBack("doing"));
    }

    #[test]
    fn test_latest_success_clears_entry() {
        let mut tracker = Tracker::new();
        let ticket = tracker.begin(7, 0);
        tracker.settle_success(&7, ticket.generation, 1);
        assert_eq!(tracker.len(), 0);
    }

    #[test]
    fn test_rebase() {
        let mut tracker = Tracker::new();
        let ticket = tracker.begin(1, "todo");
        tracker.rebase(&1, "done");
        tracker.rebase(&2, "ignored");
        assert_eq!(tracker.keys().count(), 1);
        assert_eq!(tracker.settle_failure(&1, ticket.generation), FailureVerdict::RollBack("done"));
    }

    #[test]
    fn test_clear_forgets_entries() {
        let mut tracker = Tracker::new();
        let ticket = tracker.begin(1, "todo");
        tracker.begin(2, "doing");
        tracker.clear();

        assert_eq!(tracker.len(), 0);
        assert_eq!(tracker.settle_failure(&1, ticket.generation), FailureVerdict::Superseded);
    }

    #[tokio::test]
    async fn test_tickets_for_same_key_run_in_order() {
        let mut tracker = Tracker::new();
        let first = tracker.begin(1, ());
        let mut second = tracker.begin(1, ());
        let mut other = tracker.begin(2, ());

        // Different key never waits
        tokio::time::timeout(Duration::from_millis(50), other.wait_turn())
            .await
            .unwrap();

        // Same key waits for the first ticket
        let waiting = tokio::time::timeout(Duration::from_millis(50), second.wait_turn()).await;
        assert!(waiting.is_err());

        drop(first);
        tokio::time::timeout(Duration::from_millis(50), second.wait_turn())
            .await
            .unwrap();
    }
}
