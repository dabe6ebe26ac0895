// src/core/rdb/stream.rs

//! Decoder for type-15 streams: listpack-packed entry blocks followed by the
//! stream trailer and the consumer-group metadata with its pending-entry
//! lists.

use crate::core::errors::RdbError;
use crate::core::rdb::codec::{read_plain_length, read_string};
use crate::core::rdb::cursor::ByteCursor;
use crate::core::rdb::reader::Reader;
use crate::core::rdb::{listpack, prealloc};
use crate::core::storage::stream::{
    Consumer, ConsumerGroup, PendingEntry, StreamEntry, StreamId, StreamValue,
};
use bytes::Bytes;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::io::Read;

/* Entry was deleted. Kept in the map, excluded from the live length. */
const FLAG_DELETED: u64 = 1 << 0;
/* Same fields as the master entry. */
const FLAG_SAMEFIELDS: u64 = 1 << 1;

pub fn read_stream_value<R: Read>(reader: &mut Reader<R>) -> Result<StreamValue, RdbError> {
    let mut stream = StreamValue::default();

    // One string pair per listpack: a 16-byte big-endian master ID, then the
    // packed entry block.
    let listpack_count = read_plain_length(reader)?;
    for _ in 0..listpack_count {
        let id_bytes = read_string(reader)?;
        let mut id_cursor = ByteCursor::new(id_bytes);
        let mut word = [0u8; 8];
        id_cursor.read(&mut word)?;
        let master_ms = u64::from_be_bytes(word);
        id_cursor.read(&mut word)?;
        let master_id = StreamId::new(master_ms, u64::from_be_bytes(word));

        let payload = read_string(reader)?;
        let mut cursor = ByteCursor::new(payload);
        cursor.seek_to(listpack::HEADER_LEN)?;
        read_entry_block(&mut cursor, master_id, &mut stream.entries)?;
    }

    stream.length = read_plain_length(reader)?;
    let last_ms = read_plain_length(reader)?;
    let last_seq = read_plain_length(reader)?;
    stream.last_id = StreamId::new(last_ms, last_seq);

    let group_count = read_plain_length(reader)?;
    for _ in 0..group_count {
        stream.groups.push(read_group(reader)?);
    }

    Ok(stream)
}

/// Parses one listpack entry block:
/// `| count | deleted | num-fields | field_1 .. field_N | 0 | entries... |`
fn read_entry_block(
    cursor: &mut ByteCursor,
    master_id: StreamId,
    entries: &mut IndexMap<StreamId, StreamEntry>,
) -> Result<(), RdbError> {
    let count = ascii_u64(&listpack::read_entry(cursor)?)?;
    let deleted = ascii_u64(&listpack::read_entry(cursor)?)?;
    let master_field_count = ascii_u64(&listpack::read_entry(cursor)?)? as usize;

    let mut master_fields = Vec::with_capacity(prealloc(master_field_count));
    for _ in 0..master_field_count {
        master_fields.push(listpack::read_entry(cursor)?);
    }
    // Master record terminator.
    listpack::read_entry(cursor)?;

    for _ in 0..count.saturating_add(deleted) {
        let flags = ascii_u64(&listpack::read_entry(cursor)?)?;
        let ms_delta = ascii_u64(&listpack::read_entry(cursor)?)?;
        let seq_delta = ascii_u64(&listpack::read_entry(cursor)?)?;
        let id = master_id.offset_by(ms_delta, seq_delta);

        let same_fields = flags & FLAG_SAMEFIELDS != 0;
        let field_count = if same_fields {
            master_fields.len()
        } else {
            ascii_u64(&listpack::read_entry(cursor)?)? as usize
        };

        let mut fields = IndexMap::with_capacity(prealloc(field_count));
        for i in 0..field_count {
            let field = if same_fields {
                master_fields[i].clone()
            } else {
                listpack::read_entry(cursor)?
            };
            let value = listpack::read_entry(cursor)?;
            fields.insert(field, value);
        }
        entries.insert(
            id,
            StreamEntry {
                id,
                deleted: flags & FLAG_DELETED != 0,
                fields,
            },
        );
        // Per-entry back-pointer terminator.
        listpack::read_entry(cursor)?;
    }

    match cursor.read_byte() {
        Ok(listpack::END) => Ok(()),
        Ok(_) | Err(RdbError::Truncated) => Err(RdbError::Format(
            "listpack missing its 0xFF terminator".to_string(),
        )),
        Err(err) => Err(err),
    }
}

fn read_group<R: Read>(reader: &mut Reader<R>) -> Result<ConsumerGroup, RdbError> {
    let name = read_string(reader)?;
    let last_ms = read_plain_length(reader)?;
    let last_seq = read_plain_length(reader)?;
    let mut group = ConsumerGroup {
        name,
        last_id: StreamId::new(last_ms, last_seq),
        ..ConsumerGroup::default()
    };

    // Global PEL: raw big-endian IDs with delivery metadata.
    let pel_count = read_plain_length(reader)?;
    for _ in 0..pel_count {
        let id = StreamId::new(reader.u64_be()?, reader.u64_be()?);
        let delivery_time_ms = reader.u64_le()?;
        let delivery_count = read_plain_length(reader)?;
        group.pending_entries.insert(
            id,
            PendingEntry {
                delivery_time_ms,
                delivery_count,
                consumer: None,
            },
        );
    }

    let consumer_count = read_plain_length(reader)?;
    for _ in 0..consumer_count {
        let consumer_name = read_string(reader)?;
        let seen_time_ms = reader.u64_le()?;

        let mut pending_ids = BTreeSet::new();
        let consumer_pel_count = read_plain_length(reader)?;
        for _ in 0..consumer_pel_count {
            let id = StreamId::new(reader.u64_be()?, reader.u64_be()?);
            // Every consumer-owned ID has to resolve into the group PEL; on
            // resolution the group entry is bound to this consumer.
            let entry = group.pending_entries.get_mut(&id).ok_or_else(|| {
                RdbError::Format("NoACK pending message type unknown".to_string())
            })?;
            entry.consumer = Some(consumer_name.clone());
            pending_ids.insert(id);
        }

        group.consumers.push(Consumer {
            name: consumer_name,
            seen_time_ms,
            pending_ids,
        });
    }

    Ok(group)
}

fn ascii_u64(ascii: &[u8]) -> Result<u64, RdbError> {
    let text = std::str::from_utf8(ascii)
        .map_err(|_| RdbError::Format("listpack integer is not ASCII".to_string()))?;
    text.parse::<u64>()
        .map_err(|_| RdbError::Format(format!("listpack integer {text:?} out of range")))
}
