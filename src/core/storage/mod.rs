// src/core/storage/mod.rs

//! The decoded data model: flat, typed records produced by the RDB decoder.

pub mod record;
pub mod stream;

pub use record::{HashField, KeyMeta, RedisValue, Record, ScoredMember};
pub use stream::{Consumer, ConsumerGroup, PendingEntry, StreamEntry, StreamId, StreamValue};
