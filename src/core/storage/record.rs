// src/core/storage/record.rs

//! `Record` is the unit handed to emitters: database selections, auxiliary
//! metadata, and keys with their decoded values. Each record knows how to
//! render itself for the dump writers and how to measure itself for the
//! keyspace summary.

use crate::core::storage::stream::StreamValue;
use bytes::Bytes;
use serde_json::{Map, Value, json};

/// One member of a sorted set.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMember {
    pub member: Bytes,
    pub score: f64,
}

/// One field of a hash. Kept as a flat pair list so that the decoded element
/// count always matches the count read from the aggregate header, even for
/// pathological inputs with duplicate fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashField {
    pub field: Bytes,
    pub value: Bytes,
}

/// Key name plus the expire hint bound to it by the preceding
/// EXPIRETIME(_MS) opcode, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMeta {
    pub key: Bytes,
    /// Absolute Unix time in milliseconds.
    pub expire_ms: Option<u64>,
}

/// A decoded Redis value. Every on-disk encoding of an aggregate type
/// (plain, ziplist, zipmap, listpack, intset, quicklist) collapses into one
/// of these logical shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum RedisValue {
    String(Bytes),
    List(Vec<Bytes>),
    Set(Vec<Bytes>),
    SortedSet(Vec<ScoredMember>),
    Hash(Vec<HashField>),
    Stream(StreamValue),
}

/// The unit emitted to sinks, in file order.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    AuxField { name: Bytes, value: Bytes },
    SelectDb { index: u64 },
    ResizeDb { db_size: u64, expires_size: u64 },
    Key { meta: KeyMeta, value: RedisValue },
}

fn lossy(bytes: &Bytes) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Shortest round-trip rendering of a score, including the non-finite
/// values the legacy float encoding can produce.
pub fn score_string(score: f64) -> String {
    let mut buffer = ryu::Buffer::new();
    buffer.format(score).to_string()
}

impl RedisValue {
    pub fn data_type(&self) -> &'static str {
        match self {
            RedisValue::String(_) => "String",
            RedisValue::List(_) => "List",
            RedisValue::Set(_) => "Set",
            RedisValue::SortedSet(_) => "SortedSet",
            RedisValue::Hash(_) => "Hash",
            RedisValue::Stream(_) => "Stream",
        }
    }

    /// Unit used when reporting element counts for this type.
    pub fn unit(&self) -> &'static str {
        match self {
            RedisValue::String(_) => "bytes",
            RedisValue::List(_) => "items",
            RedisValue::Set(_) | RedisValue::SortedSet(_) => "members",
            RedisValue::Hash(_) => "fields",
            RedisValue::Stream(_) => "entries",
        }
    }

    /// Element count (byte length for strings, live entries for streams).
    pub fn value_len(&self) -> u64 {
        match self {
            RedisValue::String(value) => value.len() as u64,
            RedisValue::List(items) => items.len() as u64,
            RedisValue::Set(members) => members.len() as u64,
            RedisValue::SortedSet(members) => members.len() as u64,
            RedisValue::Hash(fields) => fields.len() as u64,
            RedisValue::Stream(stream) => stream.length,
        }
    }

    /// Payload bytes held by the value, excluding per-element metadata.
    pub fn concrete_size(&self) -> u64 {
        match self {
            RedisValue::String(value) => value.len() as u64,
            RedisValue::List(items) => items.iter().map(|item| item.len() as u64).sum(),
            RedisValue::Set(members) => members.iter().map(|member| member.len() as u64).sum(),
            RedisValue::SortedSet(members) => {
                members.iter().map(|entry| entry.member.len() as u64).sum()
            }
            RedisValue::Hash(fields) => fields
                .iter()
                .map(|entry| (entry.field.len() + entry.value.len()) as u64)
                .sum(),
            RedisValue::Stream(stream) => stream
                .entries
                .values()
                .flat_map(|entry| entry.fields.iter())
                .map(|(field, value)| (field.len() + value.len()) as u64)
                .sum(),
        }
    }

    /// Structured rendering, used by the JSON dump and (stringified) for the
    /// aggregate columns of the CSV dump.
    pub fn to_json(&self) -> Value {
        match self {
            RedisValue::String(value) => Value::String(lossy(value)),
            RedisValue::List(items) => {
                Value::Array(items.iter().map(|item| Value::String(lossy(item))).collect())
            }
            RedisValue::Set(members) => Value::Array(
                members
                    .iter()
                    .map(|member| Value::String(lossy(member)))
                    .collect(),
            ),
            RedisValue::SortedSet(members) => Value::Array(
                members
                    .iter()
                    .map(|entry| {
                        json!({
                            "member": lossy(&entry.member),
                            "score": score_string(entry.score),
                        })
                    })
                    .collect(),
            ),
            RedisValue::Hash(fields) => Value::Array(
                fields
                    .iter()
                    .map(|entry| {
                        json!({
                            "field": lossy(&entry.field),
                            "value": lossy(&entry.value),
                        })
                    })
                    .collect(),
            ),
            RedisValue::Stream(stream) => stream_json(stream),
        }
    }

    /// Flat string form for a CSV cell.
    pub fn render(&self) -> String {
        match self {
            RedisValue::String(value) => lossy(value),
            RedisValue::List(items) => items
                .iter()
                .map(|item| String::from_utf8_lossy(item))
                .collect::<Vec<_>>()
                .join(","),
            RedisValue::Set(members) => members
                .iter()
                .map(|member| String::from_utf8_lossy(member))
                .collect::<Vec<_>>()
                .join(","),
            _ => self.to_json().to_string(),
        }
    }
}

fn stream_json(stream: &StreamValue) -> Value {
    let mut entries = Map::new();
    for (id, entry) in &stream.entries {
        let mut fields = Map::new();
        for (field, value) in &entry.fields {
            fields.insert(
                String::from_utf8_lossy(field).into_owned(),
                Value::String(String::from_utf8_lossy(value).into_owned()),
            );
        }
        entries.insert(
            id.to_string(),
            json!({ "deleted": entry.deleted, "fields": fields }),
        );
    }

    let groups: Vec<Value> = stream
        .groups
        .iter()
        .map(|group| {
            let mut pending = Map::new();
            for (id, entry) in &group.pending_entries {
                let mut item = Map::new();
                item.insert("delivery_time".into(), json!(entry.delivery_time_ms));
                item.insert("delivery_count".into(), json!(entry.delivery_count));
                if let Some(consumer) = &entry.consumer {
                    item.insert("consumer".into(), Value::String(lossy(consumer)));
                }
                pending.insert(id.to_string(), Value::Object(item));
            }
            let consumers: Vec<Value> = group
                .consumers
                .iter()
                .map(|consumer| {
                    let mut owned = Map::new();
                    for id in &consumer.pending_ids {
                        if let Some(entry) = group.pending_entries.get(id) {
                            owned.insert(
                                id.to_string(),
                                json!({
                                    "delivery_time": entry.delivery_time_ms,
                                    "delivery_count": entry.delivery_count,
                                }),
                            );
                        }
                    }
                    json!({
                        "consumer_name": lossy(&consumer.name),
                        "seen_time": consumer.seen_time_ms,
                        "pending": owned,
                    })
                })
                .collect();
            json!({
                "group_name": lossy(&group.name),
                "last_id": group.last_id.to_string(),
                "pending": pending,
                "consumers": consumers,
            })
        })
        .collect();

    json!({
        "last_id": stream.last_id.to_string(),
        "length": stream.length,
        "entries": entries,
        "groups": groups,
    })
}

impl Record {
    pub fn data_type(&self) -> &'static str {
        match self {
            Record::AuxField { .. } => "AuxField",
            Record::SelectDb { .. } => "SelectDB",
            Record::ResizeDb { .. } => "ResizeDB",
            Record::Key { value, .. } => value.data_type(),
        }
    }

    /// Key column value; meta records carry synthetic keys.
    pub fn key_string(&self) -> String {
        match self {
            Record::AuxField { name, .. } => lossy(name),
            Record::SelectDb { .. } => "select".to_string(),
            Record::ResizeDb { .. } => "resize db".to_string(),
            Record::Key { meta, .. } => lossy(&meta.key),
        }
    }

    pub fn value_string(&self) -> String {
        match self {
            Record::AuxField { value, .. } => lossy(value),
            Record::SelectDb { index } => index.to_string(),
            Record::ResizeDb {
                db_size,
                expires_size,
            } => format!("{{DBSize: {db_size}, ExpireSize: {expires_size}}}"),
            Record::Key { value, .. } => value.render(),
        }
    }

    pub fn value_json(&self) -> Value {
        match self {
            Record::AuxField { value, .. } => Value::String(lossy(value)),
            Record::SelectDb { index } => json!(index),
            Record::ResizeDb {
                db_size,
                expires_size,
            } => json!({ "db_size": db_size, "expires_size": expires_size }),
            Record::Key { value, .. } => value.to_json(),
        }
    }

    pub fn value_len(&self) -> u64 {
        match self {
            Record::Key { value, .. } => value.value_len(),
            _ => 0,
        }
    }

    pub fn concrete_size(&self) -> u64 {
        match self {
            Record::Key { value, .. } => value.concrete_size(),
            _ => 0,
        }
    }
}
