// src/core/rdb/codec.rs

//! The Redis length and string encodings, plus the two float-score formats.
//!
//! The write-side mirrors of the length and string codecs live here too, next
//! to their readers; the decoder itself never writes, but the test suite
//! builds its fixtures with them.

use crate::core::errors::RdbError;
use crate::core::rdb::lzf;
use crate::core::rdb::reader::Reader;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Read;

// Top-two-bit groups of the length byte.
const LEN_6BIT: u8 = 0;
const LEN_14BIT: u8 = 1;
const LEN_ENCVAL: u8 = 3;
// Full-byte markers inside the 0b10 group.
const LEN_32BIT: u8 = 0x80;
const LEN_64BIT: u8 = 0x81;

// Encoded-string kinds carried in the low six bits when the top bits are 0b11.
pub const ENC_INT8: u64 = 0;
pub const ENC_INT16: u64 = 1;
pub const ENC_INT32: u64 = 2;
pub const ENC_LZF: u64 = 3;

/// Reads one length-encoded value: `(length_or_encoding, is_encoded)`.
///
/// When `is_encoded` is true the first component is not a length but one of
/// the `ENC_*` kinds, to be resolved by [`read_string`].
pub fn read_length<R: Read>(reader: &mut Reader<R>) -> Result<(u64, bool), RdbError> {
    let byte = reader.read_byte()?;
    match (byte & 0xC0) >> 6 {
        LEN_6BIT => Ok((u64::from(byte & 0x3F), false)),
        LEN_14BIT => {
            let next = reader.read_byte()?;
            Ok(((u64::from(byte & 0x3F) << 8) | u64::from(next), false))
        }
        LEN_ENCVAL => Ok((u64::from(byte & 0x3F), true)),
        _ => match byte {
            LEN_32BIT => Ok((u64::from(reader.u32_be()?), false)),
            LEN_64BIT => Ok((reader.u64_be()?, false)),
            other => Err(RdbError::Format(format!(
                "unknown length encoding byte {other:#04x}"
            ))),
        },
    }
}

/// Reads a plain (never specially-encoded) length.
pub fn read_plain_length<R: Read>(reader: &mut Reader<R>) -> Result<u64, RdbError> {
    let (length, _) = read_length(reader)?;
    Ok(length)
}

/// Reads one string-encoded value. Integer-packed strings come back as
/// decimal ASCII; LZF payloads are decompressed. The result may contain any
/// binary content.
pub fn read_string<R: Read>(reader: &mut Reader<R>) -> Result<Bytes, RdbError> {
    let (length, is_encoded) = read_length(reader)?;
    if !is_encoded {
        return reader.read_full(length as usize);
    }
    match length {
        ENC_INT8 => {
            let value = reader.read_byte()? as i8;
            Ok(decimal(i64::from(value)))
        }
        ENC_INT16 => {
            let value = reader.u16_le()? as i16;
            Ok(decimal(i64::from(value)))
        }
        ENC_INT32 => {
            let value = reader.u32_le()? as i32;
            Ok(decimal(i64::from(value)))
        }
        ENC_LZF => {
            let compressed_len = read_plain_length(reader)?;
            let uncompressed_len = read_plain_length(reader)?;
            let compressed = reader.read_full(compressed_len as usize)?;
            let out = lzf::decompress(&compressed, uncompressed_len as usize)?;
            Ok(Bytes::from(out))
        }
        other => Err(RdbError::Format(format!(
            "unknown string encoding {other}"
        ))),
    }
}

/// Legacy "readable" sorted-set score: a length byte (with sentinel values
/// for the non-finite scores) followed by that many ASCII bytes.
pub fn read_float_legacy<R: Read>(reader: &mut Reader<R>) -> Result<f64, RdbError> {
    let len = reader.read_byte()?;
    match len {
        0xFF => Ok(f64::NEG_INFINITY),
        0xFE => Ok(f64::INFINITY),
        0xFD => Ok(f64::NAN),
        _ => {
            let ascii = reader.read_full(len as usize)?;
            let text = std::str::from_utf8(&ascii)
                .map_err(|_| RdbError::Format("score is not valid ASCII".to_string()))?;
            text.parse::<f64>()
                .map_err(|_| RdbError::Format(format!("unparsable score {text:?}")))
        }
    }
}

/// Binary score: 8 little-endian bytes reinterpreted as IEEE-754.
pub fn read_float_binary<R: Read>(reader: &mut Reader<R>) -> Result<f64, RdbError> {
    Ok(f64::from_bits(reader.u64_le()?))
}

pub(crate) fn decimal(value: i64) -> Bytes {
    Bytes::from(value.to_string().into_bytes())
}

// --- Write-side mirrors ---

pub fn write_length(buf: &mut BytesMut, len: u64) {
    if len < (1 << 6) {
        buf.put_u8(len as u8);
    } else if len < (1 << 14) {
        buf.put_u16((len | (1 << 14)) as u16);
    } else if len < (1 << 32) {
        buf.put_u8(LEN_32BIT);
        buf.put_u32(len as u32);
    } else {
        buf.put_u8(LEN_64BIT);
        buf.put_u64(len);
    }
}

pub fn write_string(buf: &mut BytesMut, s: &[u8]) {
    write_length(buf, s.len() as u64);
    buf.put_slice(s);
}
