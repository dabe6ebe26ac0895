// src/core/rdb/zipmap.rs

//! Decoder for the legacy zipmap hash encoding.

use crate::core::errors::RdbError;
use crate::core::rdb::cursor::ByteCursor;
use bytes::Bytes;

// Item-length specials.
const ZM_LONG_LEN: u8 = 253;
const ZM_INVALID: u8 = 254;
const ZM_END: u8 = 255;

enum ItemLength {
    /// `(length, free padding after the item)`
    Item(usize, usize),
    End,
}

/// Decodes a whole zipmap payload into field/value pairs, in order.
pub fn decode(payload: Bytes) -> Result<Vec<(Bytes, Bytes)>, RdbError> {
    let mut cursor = ByteCursor::new(payload);
    let stored_len = cursor.read_byte()?;

    // A stored length above 254 means the count no longer fits the byte and
    // the payload has to be walked instead.
    let pairs = if stored_len <= 254 {
        usize::from(stored_len)
    } else {
        count_items(&mut cursor)? / 2
    };

    let mut fields = Vec::with_capacity(pairs);
    for _ in 0..pairs {
        let field = read_item(&mut cursor, false)?;
        let value = read_item(&mut cursor, true)?;
        fields.push((field, value));
    }
    Ok(fields)
}

fn read_item(cursor: &mut ByteCursor, read_free: bool) -> Result<Bytes, RdbError> {
    match item_length(cursor, read_free)? {
        ItemLength::End => Err(RdbError::Format(
            "zipmap ended before its declared item count".to_string(),
        )),
        ItemLength::Item(length, free) => {
            let value = cursor.slice(length)?;
            cursor.skip(free)?;
            Ok(value)
        }
    }
}

/// Walks all items from the current position to the end sentinel, then
/// rewinds to where the walk started.
fn count_items(cursor: &mut ByteCursor) -> Result<usize, RdbError> {
    let start = cursor.position();
    let mut n = 0usize;
    loop {
        match item_length(cursor, n % 2 != 0)? {
            ItemLength::End => break,
            ItemLength::Item(length, free) => {
                cursor.skip(length + free)?;
                n += 1;
            }
        }
    }
    cursor.seek_to(start)?;
    Ok(n)
}

fn item_length(cursor: &mut ByteCursor, read_free: bool) -> Result<ItemLength, RdbError> {
    let byte = cursor.read_byte()?;
    match byte {
        ZM_LONG_LEN => {
            let mut raw = [0u8; 5];
            cursor.read(&mut raw)?;
            let length = u32::from_be_bytes(raw[..4].try_into().expect("4-byte slice")) as usize;
            Ok(ItemLength::Item(length, usize::from(raw[4])))
        }
        ZM_INVALID => Err(RdbError::Format("invalid zipmap item length".to_string())),
        ZM_END => Ok(ItemLength::End),
        short => {
            let free = if read_free {
                usize::from(cursor.read_byte()?)
            } else {
                0
            };
            Ok(ItemLength::Item(usize::from(short), free))
        }
    }
}
