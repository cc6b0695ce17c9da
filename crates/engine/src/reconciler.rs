//! Client-side write path for quantities.
//!
//! Every tap updates the local quantity immediately and re-arms that line's
//! debounce timer; only the value standing when the line goes quiet is sent
//! to the [`QuantitySink`]. A failed write is logged and the local value is
//! left as it is until the next [`InventoryReconciler::refresh`].
//!
//! Taps are relative, so they need a known base: a line must come in through
//! [`InventoryReconciler::track`], [`InventoryReconciler::refresh`] or a typed
//! absolute value before it can be incremented or decremented.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use beadstash_core::{coalesce::CoalescingQueue, color::ColorKey, ids::UserId};
use beadstash_storage::InventoryRecord;

use crate::{EngineConfig, EngineError};

/// Durable side of the reconciler.
pub trait QuantitySink {
    fn commit_quantity(
        &mut self,
        user_id: UserId,
        key: &ColorKey,
        quantity: u32,
    ) -> Result<InventoryRecord, EngineError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Idle,
    PendingWrite,
    Failed,
}

#[derive(Debug, Default)]
pub struct FlushReport {
    pub committed: Vec<InventoryRecord>,
    pub failed: Vec<(ColorKey, EngineError)>,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty() && self.failed.is_empty()
    }
}

pub struct InventoryReconciler {
    user_id: UserId,
    local: HashMap<ColorKey, u32>,
    queue: CoalescingQueue<ColorKey, u32>,
    failed: HashSet<ColorKey>,
}

impl InventoryReconciler {
    pub fn new(user_id: UserId, window: Duration) -> Self {
        Self {
            user_id,
            local: HashMap::new(),
            queue: CoalescingQueue::new(window),
            failed: HashSet::new(),
        }
    }

    pub fn from_config(user_id: UserId, config: &EngineConfig) -> Self {
        Self::new(user_id, config.debounce_window())
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Value the UI shows; `None` for a line this reconciler has never loaded.
    pub fn local_quantity(&self, key: &ColorKey) -> Option<u32> {
        self.local.get(key).copied()
    }

    /// Seeds one line with the value the client was shown, e.g. zero for a
    /// virtual line from a listing. A line with a pending write is left alone.
    pub fn track(&mut self, key: &ColorKey, quantity: u32) {
        if !self.queue.is_pending(key) {
            self.local.insert(key.clone(), quantity);
        }
    }

    fn base(&self, key: &ColorKey) -> Result<u32, EngineError> {
        self.local_quantity(key)
            .ok_or_else(|| EngineError::LineNotLoaded(key.to_string()))
    }

    pub fn state(&self, key: &ColorKey) -> LineState {
        if self.queue.is_pending(key) {
            LineState::PendingWrite
        } else if self.failed.contains(key) {
            LineState::Failed
        } else {
            LineState::Idle
        }
    }

    pub fn increment(&mut self, key: &ColorKey, now: Instant) -> Result<u32, EngineError> {
        let next = self.base(key)?.saturating_add(1);
        self.stage(key, next, now);
        Ok(next)
    }

    /// Refused at zero: returns `Ok(None)` and schedules nothing.
    pub fn decrement(&mut self, key: &ColorKey, now: Instant) -> Result<Option<u32>, EngineError> {
        let Some(next) = self.base(key)?.checked_sub(1) else {
            return Ok(None);
        };
        self.stage(key, next, now);
        Ok(Some(next))
    }

    /// A typed absolute value. Needs no base, so it also loads the line.
    pub fn set_quantity(&mut self, key: &ColorKey, value: i64, now: Instant) -> Result<u32, EngineError> {
        let quantity = u32::try_from(value)
            .map_err(|_| EngineError::InvalidQuantity(format!("{value} is not a valid quantity")))?;
        self.stage(key, quantity, now);
        Ok(quantity)
    }

    fn stage(&mut self, key: &ColorKey, quantity: u32, now: Instant) {
        self.local.insert(key.clone(), quantity);
        self.failed.remove(key);
        if self.queue.schedule_at(key.clone(), quantity, now) {
            tracing::trace!(line = %key, quantity, "superseded pending write");
        }
    }

    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.queue.next_deadline()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Sends every line whose quiet period has elapsed by `now`.
    pub fn poll(&mut self, now: Instant, sink: &mut impl QuantitySink) -> FlushReport {
        let due = self.queue.drain_due(now);
        self.flush(due, sink)
    }

    /// Sends everything pending without waiting, e.g. on shutdown.
    pub fn flush_all(&mut self, sink: &mut impl QuantitySink) -> FlushReport {
        let due = self.queue.drain_all();
        self.flush(due, sink)
    }

    fn flush(&mut self, due: Vec<(ColorKey, u32)>, sink: &mut impl QuantitySink) -> FlushReport {
        let mut report = FlushReport::default();
        for (key, quantity) in due {
            match sink.commit_quantity(self.user_id, &key, quantity) {
                Ok(record) => {
                    tracing::debug!(line = %key, quantity, "quantity committed");
                    self.failed.remove(&key);
                    report.committed.push(record);
                }
                Err(err) => {
                    tracing::warn!(line = %key, quantity, "quantity write failed: {err}");
                    self.failed.insert(key.clone());
                    report.failed.push((key, err));
                }
            }
        }
        report
    }

    /// Adopts server values after a full re-fetch. Lines with a write still
    /// pending keep their local value; every other known line takes the
    /// server value, or zero when the server holds no record for it.
    pub fn refresh<'a>(&mut self, records: impl IntoIterator<Item = &'a InventoryRecord>) {
        let queue = &self.queue;
        for (key, quantity) in self.local.iter_mut() {
            if !queue.is_pending(key) {
                *quantity = 0;
            }
        }
        for record in records {
            if record.user_id != self.user_id || self.queue.is_pending(&record.key) {
                continue;
            }
            self.local.insert(record.key.clone(), record.quantity);
        }
        self.failed.clear();
    }
}
