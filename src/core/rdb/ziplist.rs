// src/core/rdb/ziplist.rs

//! Decoder for the ziplist packed-container format. Entries come back as
//! raw bytes; integer encodings are rendered to decimal ASCII so that every
//! caller sees one uniform element shape.

use crate::core::errors::RdbError;
use crate::core::rdb::codec::decimal;
use crate::core::rdb::cursor::ByteCursor;
use bytes::Bytes;

// Entry headers with the top two bits set carry a packed integer.
const ZIP_INT_8B: u8 = 0xFE;
const ZIP_INT_16B: u8 = 0xC0;
const ZIP_INT_24B: u8 = 0xF0;
const ZIP_INT_32B: u8 = 0xD0;
const ZIP_INT_64B: u8 = 0xE0;
// A prevlen byte of 0xFE means a 4-byte extension follows.
const ZIP_BIG_PREVLEN: u8 = 0xFE;

// zlbytes (4) + zltail (4) are ignored; zllen sits at offset 8 and the first
// entry at offset 10.
const LEN_OFFSET: usize = 8;
const FIRST_ENTRY_OFFSET: usize = 10;

/// Decodes a whole ziplist payload into its entries, in order.
pub fn decode(payload: Bytes) -> Result<Vec<Bytes>, RdbError> {
    let mut cursor = ByteCursor::new(payload);
    let count = read_entry_count(&mut cursor)?;
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        entries.push(read_entry(&mut cursor)?);
    }
    Ok(entries)
}

/// Reads `zllen` and positions the cursor on the first entry.
pub fn read_entry_count(cursor: &mut ByteCursor) -> Result<u16, RdbError> {
    cursor.seek_to(LEN_OFFSET)?;
    let mut len_bytes = [0u8; 2];
    cursor.read(&mut len_bytes)?;
    cursor.seek_to(FIRST_ENTRY_OFFSET)?;
    Ok(u16::from_le_bytes(len_bytes))
}

pub fn read_entry(cursor: &mut ByteCursor) -> Result<Bytes, RdbError> {
    let prevlen = cursor.read_byte()?;
    if prevlen == ZIP_BIG_PREVLEN {
        cursor.skip(4)?;
    }

    let header = cursor.read_byte()?;
    match header >> 6 {
        0b00 => cursor.slice(usize::from(header & 0x3F)),
        0b01 => {
            let next = cursor.read_byte()?;
            cursor.slice((usize::from(header & 0x3F) << 8) | usize::from(next))
        }
        0b10 => {
            let mut len_bytes = [0u8; 4];
            cursor.read(&mut len_bytes)?;
            cursor.slice(u32::from_be_bytes(len_bytes) as usize)
        }
        _ => read_int_entry(cursor, header),
    }
}

fn read_int_entry(cursor: &mut ByteCursor, header: u8) -> Result<Bytes, RdbError> {
    match header {
        ZIP_INT_8B => {
            let value = cursor.read_byte()? as i8;
            Ok(decimal(i64::from(value)))
        }
        ZIP_INT_16B => {
            let mut raw = [0u8; 2];
            cursor.read(&mut raw)?;
            Ok(decimal(i64::from(i16::from_le_bytes(raw))))
        }
        ZIP_INT_24B => {
            // Three LE bytes land in the high 24 bits; the arithmetic shift
            // back down carries the sign.
            let mut raw = [0u8; 4];
            cursor.read(&mut raw[1..])?;
            Ok(decimal(i64::from(i32::from_le_bytes(raw) >> 8)))
        }
        ZIP_INT_32B => {
            let mut raw = [0u8; 4];
            cursor.read(&mut raw)?;
            Ok(decimal(i64::from(i32::from_le_bytes(raw))))
        }
        ZIP_INT_64B => {
            let mut raw = [0u8; 8];
            cursor.read(&mut raw)?;
            Ok(decimal(i64::from_le_bytes(raw)))
        }
        _ if header >> 4 == 0x0F => Ok(decimal(i64::from(header & 0x0F) - 1)),
        other => Err(RdbError::Format(format!(
            "unknown ziplist header byte: {other}"
        ))),
    }
}
