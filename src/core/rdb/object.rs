// src/core/rdb/object.rs

//! Value-type tag dispatch: decodes one key's value into a [`RedisValue`].

use crate::core::errors::RdbError;
use crate::core::rdb::reader::Reader;
use crate::core::rdb::{codec, intset, prealloc, stream, ziplist, zipmap};
use crate::core::storage::record::{HashField, RedisValue, ScoredMember};
use std::io::Read;

// Value-type tags as they appear in the file.
pub const TYPE_STRING: u8 = 0;
pub const TYPE_LIST: u8 = 1;
pub const TYPE_SET: u8 = 2;
pub const TYPE_ZSET: u8 = 3;
pub const TYPE_HASH: u8 = 4;
pub const TYPE_ZSET_2: u8 = 5; /* ZSET version 2 with doubles stored in binary. */
pub const TYPE_MODULE: u8 = 6;
pub const TYPE_MODULE_2: u8 = 7;
pub const TYPE_HASH_ZIPMAP: u8 = 9;
pub const TYPE_LIST_ZIPLIST: u8 = 10;
pub const TYPE_SET_INTSET: u8 = 11;
pub const TYPE_ZSET_ZIPLIST: u8 = 12;
pub const TYPE_HASH_ZIPLIST: u8 = 13;
pub const TYPE_LIST_QUICKLIST: u8 = 14;
pub const TYPE_STREAM_LISTPACKS: u8 = 15;

pub fn read_value<R: Read>(
    reader: &mut Reader<R>,
    value_type: u8,
) -> Result<RedisValue, RdbError> {
    match value_type {
        TYPE_STRING => Ok(RedisValue::String(codec::read_string(reader)?)),
        TYPE_LIST => {
            let len = codec::read_plain_length(reader)? as usize;
            let mut items = Vec::with_capacity(prealloc(len));
            for _ in 0..len {
                items.push(codec::read_string(reader)?);
            }
            Ok(RedisValue::List(items))
        }
        TYPE_SET => {
            let len = codec::read_plain_length(reader)? as usize;
            let mut members = Vec::with_capacity(prealloc(len));
            for _ in 0..len {
                members.push(codec::read_string(reader)?);
            }
            Ok(RedisValue::Set(members))
        }
        TYPE_ZSET | TYPE_ZSET_2 => {
            let len = codec::read_plain_length(reader)? as usize;
            let mut members = Vec::with_capacity(prealloc(len));
            for _ in 0..len {
                let member = codec::read_string(reader)?;
                let score = if value_type == TYPE_ZSET_2 {
                    codec::read_float_binary(reader)?
                } else {
                    codec::read_float_legacy(reader)?
                };
                members.push(ScoredMember { member, score });
            }
            Ok(RedisValue::SortedSet(members))
        }
        TYPE_HASH => {
            let len = codec::read_plain_length(reader)? as usize;
            let mut fields = Vec::with_capacity(prealloc(len));
            for _ in 0..len {
                let field = codec::read_string(reader)?;
                let value = codec::read_string(reader)?;
                fields.push(HashField { field, value });
            }
            Ok(RedisValue::Hash(fields))
        }
        TYPE_MODULE | TYPE_MODULE_2 => Err(RdbError::Unsupported(
            "module values cannot be decoded without the generating module".to_string(),
        )),
        TYPE_HASH_ZIPMAP => {
            let payload = codec::read_string(reader)?;
            let pairs = zipmap::decode(payload)?;
            Ok(RedisValue::Hash(
                pairs
                    .into_iter()
                    .map(|(field, value)| HashField { field, value })
                    .collect(),
            ))
        }
        TYPE_LIST_ZIPLIST => {
            let payload = codec::read_string(reader)?;
            Ok(RedisValue::List(ziplist::decode(payload)?))
        }
        TYPE_SET_INTSET => {
            let payload = codec::read_string(reader)?;
            Ok(RedisValue::Set(intset::decode(payload)?))
        }
        TYPE_ZSET_ZIPLIST => {
            // 2n ziplist entries fold into n (member, score) pairs.
            let payload = codec::read_string(reader)?;
            let entries = ziplist::decode(payload)?;
            let mut members = Vec::with_capacity(entries.len() / 2);
            for pair in entries.chunks_exact(2) {
                let score = parse_score(&pair[1])?;
                members.push(ScoredMember {
                    member: pair[0].clone(),
                    score,
                });
            }
            Ok(RedisValue::SortedSet(members))
        }
        TYPE_HASH_ZIPLIST => {
            let payload = codec::read_string(reader)?;
            let entries = ziplist::decode(payload)?;
            let mut fields = Vec::with_capacity(entries.len() / 2);
            for pair in entries.chunks_exact(2) {
                fields.push(HashField {
                    field: pair[0].clone(),
                    value: pair[1].clone(),
                });
            }
            Ok(RedisValue::Hash(fields))
        }
        TYPE_LIST_QUICKLIST => {
            // A linked sequence of inner ziplists, flattened in order.
            let nodes = codec::read_plain_length(reader)? as usize;
            let mut items = Vec::new();
            for _ in 0..nodes {
                let payload = codec::read_string(reader)?;
                items.extend(ziplist::decode(payload)?);
            }
            Ok(RedisValue::List(items))
        }
        TYPE_STREAM_LISTPACKS => Ok(RedisValue::Stream(stream::read_stream_value(reader)?)),
        other => Err(RdbError::Unsupported(format!(
            "unknown value type tag {other}"
        ))),
    }
}

fn parse_score(ascii: &[u8]) -> Result<f64, RdbError> {
    let text = std::str::from_utf8(ascii)
        .map_err(|_| RdbError::Format("score is not valid ASCII".to_string()))?;
    text.parse::<f64>()
        .map_err(|_| RdbError::Format(format!("unparsable score {text:?}")))
}
