//! Trailing-edge debounce keyed by line.
//!
//! Each key holds at most one pending value and one deadline. Scheduling a
//! key again replaces its value and pushes the deadline out to
//! `now + window`, so a burst of inputs yields a single fire carrying the last
//! value once input has been quiet for the whole window. Keys are independent.
//!
//! Time is passed in by the caller; nothing here sleeps or spawns.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;
use std::time::{Duration, Instant};

pub const DEFAULT_WINDOW_MS: u64 = 500;

pub struct CoalescingQueue<K, V> {
    /// Pending entries: key -> (fire time, latest value).
    pending: HashMap<K, (Instant, V)>,

    /// Min-heap of (fire_at, key) for the next deadline.
    ///
    /// Rescheduling pushes a fresh entry; superseded ones are discarded by
    /// comparing against `pending`.
    heap: BinaryHeap<Reverse<(Instant, K)>>,

    window: Duration,
}

impl<K: Clone + Eq + Hash + Ord, V> Default for CoalescingQueue<K, V> {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_WINDOW_MS))
    }
}

impl<K: Clone + Eq + Hash + Ord, V> CoalescingQueue<K, V> {
    pub fn new(window: Duration) -> Self {
        Self {
            pending: HashMap::new(),
            heap: BinaryHeap::new(),
            window,
        }
    }

    /// (Re)arm the timer for `key` and make `value` its pending payload.
    /// Returns true when an earlier pending value was superseded.
    pub fn schedule_at(&mut self, key: K, value: V, now: Instant) -> bool {
        let fire_at = now + self.window;
        let superseded = self.pending.insert(key.clone(), (fire_at, value)).is_some();
        self.heap.push(Reverse((fire_at, key)));
        superseded
    }

    /// Earliest deadline across all keys.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.pop_stale();
        self.heap.peek().map(|Reverse((t, _))| *t)
    }

    /// Remove and return every entry whose deadline is at or before `now`,
    /// in deadline order.
    pub fn drain_due(&mut self, now: Instant) -> Vec<(K, V)> {
        let mut due = Vec::new();
        loop {
            self.pop_stale();
            let Some(Reverse((fire_at, _))) = self.heap.peek() else {
                break;
            };
            if *fire_at > now {
                break;
            }
            let Some(Reverse((fire_at, key))) = self.heap.pop() else {
                break;
            };
            if let Some((current, _)) = self.pending.get(&key) {
                if *current == fire_at {
                    if let Some((_, value)) = self.pending.remove(&key) {
                        due.push((key, value));
                    }
                }
            }
        }
        due
    }

    /// Remove and return everything regardless of deadline.
    pub fn drain_all(&mut self) -> Vec<(K, V)> {
        let mut entries: Vec<(K, Instant, V)> = self
            .pending
            .drain()
            .map(|(key, (fire_at, value))| (key, fire_at, value))
            .collect();
        self.heap.clear();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        entries.into_iter().map(|(key, _, value)| (key, value)).collect()
    }

    pub fn cancel(&mut self, key: &K) -> Option<V> {
        self.pending.remove(key).map(|(_, value)| value)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_value(&self, key: &K) -> Option<&V> {
        self.pending.get(key).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn pop_stale(&mut self) {
        while let Some(Reverse((fire_at, key))) = self.heap.peek() {
            match self.pending.get(key) {
                Some((current, _)) if current == fire_at => break,
                _ => {
                    let _ = self.heap.pop();
                }
            }
        }
    }
}
