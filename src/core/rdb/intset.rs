// src/core/rdb/intset.rs

//! Decoder for the intset encoding: a sorted array of same-width
//! little-endian signed integers, rendered to decimal ASCII.

use crate::core::errors::RdbError;
use crate::core::rdb::codec::decimal;
use crate::core::rdb::cursor::ByteCursor;
use crate::core::rdb::prealloc;
use bytes::Bytes;

pub fn decode(payload: Bytes) -> Result<Vec<Bytes>, RdbError> {
    let mut cursor = ByteCursor::new(payload);

    let mut word = [0u8; 4];
    cursor.read(&mut word)?;
    let int_size = u32::from_le_bytes(word);
    if int_size != 2 && int_size != 4 && int_size != 8 {
        return Err(RdbError::Format(format!(
            "unknown intset encoding: {int_size}"
        )));
    }
    cursor.read(&mut word)?;
    let cardinality = u32::from_le_bytes(word);

    let mut members = Vec::with_capacity(prealloc(cardinality as usize));
    for _ in 0..cardinality {
        let value = match int_size {
            2 => {
                let mut raw = [0u8; 2];
                cursor.read(&mut raw)?;
                i64::from(i16::from_le_bytes(raw))
            }
            4 => {
                let mut raw = [0u8; 4];
                cursor.read(&mut raw)?;
                i64::from(i32::from_le_bytes(raw))
            }
            _ => {
                let mut raw = [0u8; 8];
                cursor.read(&mut raw)?;
                i64::from_le_bytes(raw)
            }
        };
        members.push(decimal(value));
    }
    Ok(members)
}
