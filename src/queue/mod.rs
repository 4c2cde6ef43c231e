//! Durable at-least-once outbound queue.
//!
//! # INVARIANTS
//! - Every mutation rewrites the whole queue to durable storage (last writer wins).
//! - Removal is keyed by [`EntryId`], never by position. Concurrent sends and
//!   enqueues cannot make a flush skip, double-remove or resurrect an entry.
//! - The envelope inside an entry is never modified, so every attempt sends the
//!   same bytes.
//! - If storage is unavailable the queue keeps working in memory only.

pub mod entry;

pub use entry::{EntryId, QueueEntry};

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::capability::{Clock, KeyValueStore};
use crate::config::PipelineConfig;
use crate::envelope::EventEnvelope;
use crate::error::{StoreError, TransportError};
use crate::transport::Transport;

/// What happened to one entry on one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Acknowledged and removed from the queue.
    Delivered,
    /// Failed, still queued for a later retry.
    Failed,
    /// Removed without delivery (retry bound hit, or unencodable payload).
    Evicted,
    /// Another attempt for this entry is already in flight.
    Skipped,
    /// Entry no longer in the queue.
    Gone,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
    pub evicted: usize,
}

#[derive(Default)]
struct QueueState {
    entries: VecDeque<QueueEntry>,
    in_flight: HashSet<EntryId>,
    degraded: bool,
}

struct Inner {
    state: Mutex<QueueState>,
    store: Arc<dyn KeyValueStore>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    key: String,
    max_attempts: u32,
    max_len: usize,
    tracker: TaskTracker,
}

/// Cheap to clone; all clones share one queue.
#[derive(Clone)]
pub struct DeliveryQueue {
    inner: Arc<Inner>,
}

impl DeliveryQueue {
    pub fn new(
        config: &PipelineConfig,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(QueueState::default()),
                store,
                transport,
                clock,
                key: config.queue_key.clone(),
                max_attempts: config.max_attempts,
                max_len: config.max_queue_len,
                tracker: TaskTracker::new(),
            }),
        }
    }

    /// Loads entries left over from a previous page lifetime and merges them
    /// ahead of anything enqueued since. Returns how many were recovered.
    pub fn restore(&self) -> usize {
        let loaded = match self.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Durable queue unavailable, continuing in memory");
                self.inner.state.lock().degraded = true;
                return 0;
            }
        };

        let mut state = self.inner.state.lock();
        let known: HashSet<EntryId> = state.entries.iter().map(|e| e.id).collect();
        let mut recovered = 0;
        for entry in loaded.into_iter().rev() {
            if known.contains(&entry.id) {
                continue;
            }
            state.entries.push_front(entry);
            recovered += 1;
        }
        self.evict_overflow(&mut state);
        self.persist(&mut state);

        if recovered > 0 {
            info!(recovered, "Restored undelivered events");
        }
        recovered
    }

    fn load(&self) -> Result<Vec<QueueEntry>, StoreError> {
        let raw = match self.inner.store.get(&self.inner.key)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Vec::new()),
        };
        let values: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                // Unreadable as a whole; start over rather than wedge every future write.
                warn!(error = %e, "Discarding corrupt durable queue");
                return Ok(Vec::new());
            }
        };

        let mut entries = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<QueueEntry>(value) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(error = %e, "Dropping unreadable queued event"),
            }
        }
        Ok(entries)
    }

    /// Appends the envelope, persists, and starts an immediate delivery attempt.
    ///
    /// Must be called from within a tokio runtime; the attempt runs as a
    /// tracked background task.
    pub fn enqueue(&self, envelope: EventEnvelope) -> EntryId {
        let entry = QueueEntry::new(envelope, self.inner.clock.now_ms());
        let id = entry.id;
        {
            let mut state = self.inner.state.lock();
            state.entries.push_back(entry);
            self.evict_overflow(&mut state);
            self.persist(&mut state);
        }

        let queue = self.clone();
        self.inner.tracker.spawn(async move {
            queue.deliver(id).await;
        });
        id
    }

    /// One delivery attempt for one entry.
    pub async fn deliver(&self, id: EntryId) -> Attempt {
        let envelope = {
            let mut state = self.inner.state.lock();
            if state.in_flight.contains(&id) {
                return Attempt::Skipped;
            }
            let Some(entry) = state.entries.iter_mut().find(|e| e.id == id) else {
                return Attempt::Gone;
            };
            entry.attempt_count += 1;
            let envelope = entry.envelope.clone();
            state.in_flight.insert(id);
            envelope
        };

        let result = self.inner.transport.send(&envelope).await;
        self.on_delivery_result(id, result)
    }

    /// Applies the outcome of an attempt: remove on success, keep on a
    /// retryable failure until the attempt bound is reached.
    pub fn on_delivery_result(&self, id: EntryId, result: Result<(), TransportError>) -> Attempt {
        let mut state = self.inner.state.lock();
        state.in_flight.remove(&id);

        let position = state.entries.iter().position(|e| e.id == id);
        let outcome = match (result, position) {
            (Ok(()), Some(index)) => {
                state.entries.remove(index);
                debug!(entry = %id, "Delivered");
                Attempt::Delivered
            }
            (Ok(()), None) => Attempt::Delivered,
            (Err(_), None) => return Attempt::Gone,
            (Err(e), Some(index)) if !e.is_retryable() => {
                state.entries.remove(index);
                error!(entry = %id, error = %e, "Dropping event that cannot be encoded");
                Attempt::Evicted
            }
            (Err(e), Some(index)) => {
                let attempts = state.entries[index].attempt_count;
                if attempts >= self.inner.max_attempts {
                    state.entries.remove(index);
                    warn!(entry = %id, attempts, error = %e, "Retry limit reached, dropping event");
                    Attempt::Evicted
                } else {
                    warn!(
                        entry = %id,
                        attempts,
                        transport = self.inner.transport.name(),
                        error = %e,
                        "Delivery failed, keeping event queued"
                    );
                    Attempt::Failed
                }
            }
        };

        self.persist(&mut state);
        outcome
    }

    /// Re-attempts every entry that is not already in flight, concurrently.
    ///
    /// The set of entries is fixed when the flush starts. Entries enqueued
    /// while it runs are left to their own immediate attempt.
    pub async fn flush_all(&self) -> FlushReport {
        let ids: Vec<EntryId> = {
            let state = self.inner.state.lock();
            state
                .entries
                .iter()
                .filter(|e| !state.in_flight.contains(&e.id))
                .map(|e| e.id)
                .collect()
        };

        let mut report = FlushReport::default();
        if ids.is_empty() {
            return report;
        }

        let mut attempts = JoinSet::new();
        for id in ids {
            let queue = self.clone();
            attempts.spawn(async move { queue.deliver(id).await });
        }

        while let Some(joined) = attempts.join_next().await {
            match joined {
                Ok(Attempt::Delivered) => {
                    report.attempted += 1;
                    report.delivered += 1;
                }
                Ok(Attempt::Failed) => {
                    report.attempted += 1;
                    report.failed += 1;
                }
                Ok(Attempt::Evicted) => {
                    report.attempted += 1;
                    report.evicted += 1;
                }
                Ok(Attempt::Skipped) | Ok(Attempt::Gone) => {}
                Err(e) => error!(error = %e, "Flush attempt task failed"),
            }
        }

        info!(
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            evicted = report.evicted,
            "Flushed queue"
        );
        report
    }

    /// Starts a flush in the background.
    pub fn spawn_flush(&self) {
        let queue = self.clone();
        self.inner.tracker.spawn(async move {
            queue.flush_all().await;
        });
    }

    /// Waits until every background attempt started so far has finished.
    /// Not meant to be called from two places at once.
    pub async fn settle(&self) {
        self.inner.tracker.close();
        self.inner.tracker.wait().await;
        self.inner.tracker.reopen();
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().entries.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.inner.state.lock().in_flight.len()
    }

    /// True while durable storage is failing and the queue is memory-only.
    pub fn is_degraded(&self) -> bool {
        self.inner.state.lock().degraded
    }

    pub fn snapshot(&self) -> Vec<QueueEntry> {
        self.inner.state.lock().entries.iter().cloned().collect()
    }

    // Oldest entries go first; an entry with an attempt in flight is never evicted.
    fn evict_overflow(&self, state: &mut QueueState) {
        while state.entries.len() > self.inner.max_len {
            let victim = state
                .entries
                .iter()
                .position(|e| !state.in_flight.contains(&e.id));
            match victim {
                Some(index) => {
                    if let Some(entry) = state.entries.remove(index) {
                        warn!(entry = %entry.id, event_type = %entry.envelope.event_type(), "Queue full, evicting oldest event");
                    }
                }
                None => break,
            }
        }
    }

    fn persist(&self, state: &mut QueueState) {
        let json = match serde_json::to_string(&state.entries) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize queue");
                return;
            }
        };

        match self.inner.store.set(&self.inner.key, &json) {
            Ok(()) => {
                if state.degraded {
                    info!("Durable queue storage recovered");
                    state.degraded = false;
                }
            }
            Err(e) => {
                if !state.degraded {
                    warn!(error = %e, "Durable queue storage unavailable, continuing in memory");
                    state.degraded = true;
                }
            }
        }
    }
}
