// src/core/storage/stream.rs

use bytes::Bytes;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// --- Stream ID ---
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Default)]
pub struct StreamId {
    pub ms: u64,
    pub sequence: u64,
}

impl StreamId {
    pub fn new(ms: u64, sequence: u64) -> Self {
        Self { ms, sequence }
    }

    /// Resolves a delta-encoded ID against the master ID of its listpack.
    pub fn offset_by(&self, ms_delta: u64, seq_delta: u64) -> Self {
        Self {
            ms: self.ms.wrapping_add(ms_delta),
            sequence: self.sequence.wrapping_add(seq_delta),
        }
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ms, self.sequence)
    }
}

// --- Stream Entry ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEntry {
    pub id: StreamId,
    /// Entries flagged deleted are preserved in the map but excluded from the
    /// stream's live length.
    pub deleted: bool,
    pub fields: IndexMap<Bytes, Bytes>,
}

// --- Consumer & Group State ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    pub delivery_time_ms: u64,
    pub delivery_count: u64,
    /// Name of the consumer this delivery is bound to, filled in while the
    /// per-consumer PELs are decoded.
    pub consumer: Option<Bytes>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consumer {
    pub name: Bytes,
    pub seen_time_ms: u64,
    /// IDs owned by this consumer; every one of them also keys an entry in
    /// the group's `pending_entries`.
    pub pending_ids: BTreeSet<StreamId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerGroup {
    pub name: Bytes,
    pub last_id: StreamId,
    pub pending_entries: BTreeMap<StreamId, PendingEntry>,
    pub consumers: Vec<Consumer>,
}

// --- Main Stream Value ---
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamValue {
    /// Largest ID ever assigned in the stream.
    pub last_id: StreamId,
    /// Live entry count, not counting deleted entries.
    pub length: u64,
    /// Entries in encounter order.
    pub entries: IndexMap<StreamId, StreamEntry>,
    pub groups: Vec<ConsumerGroup>,
}
