use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::envelope::EventEnvelope;

/// Locally generated identity of a queue entry. Two entries with identical
/// envelopes are still distinct entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted form: the envelope fields flattened, plus retry bookkeeping.
///
/// Entries written without `id` / `attempt_count` (older trackers stored just
/// the envelope and a timestamp) load with a fresh id and zero attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    #[serde(flatten)]
    pub envelope: EventEnvelope,
    /// Ms epoch of the first enqueue. Never rewritten by retries.
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub attempt_count: u32,
    #[serde(default)]
    pub id: EntryId,
}

impl QueueEntry {
    pub fn new(envelope: EventEnvelope, timestamp: u64) -> Self {
        Self {
            envelope,
            timestamp,
            attempt_count: 0,
            id: EntryId::new(),
        }
    }
}
