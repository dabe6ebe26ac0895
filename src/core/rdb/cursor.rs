// src/core/rdb/cursor.rs

//! Seekable random-access view over one owned byte block. Container payloads
//! (ziplist, zipmap, listpack, intset) are decoded through a `ByteCursor`
//! that owns the payload for the lifetime of one aggregate value decode.

use crate::core::errors::RdbError;
use bytes::Bytes;

pub struct ByteCursor {
    data: Bytes,
    pos: usize,
}

impl ByteCursor {
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Takes the next `n` bytes and advances.
    pub fn slice(&mut self, n: usize) -> Result<Bytes, RdbError> {
        let end = self.pos.checked_add(n).ok_or(RdbError::Truncated)?;
        if end > self.data.len() {
            return Err(RdbError::Truncated);
        }
        let out = self.data.slice(self.pos..end);
        self.pos = end;
        Ok(out)
    }

    pub fn read_byte(&mut self) -> Result<u8, RdbError> {
        if self.pos >= self.data.len() {
            return Err(RdbError::Truncated);
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Fills `buf` exactly, advancing past the copied bytes.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<(), RdbError> {
        let bytes = self.slice(buf.len())?;
        buf.copy_from_slice(&bytes);
        Ok(())
    }

    /// Absolute seek; the target may be one past the last byte.
    pub fn seek_to(&mut self, pos: usize) -> Result<(), RdbError> {
        if pos > self.data.len() {
            return Err(RdbError::Truncated);
        }
        self.pos = pos;
        Ok(())
    }

    /// Relative forward seek.
    pub fn skip(&mut self, n: usize) -> Result<(), RdbError> {
        let target = self.pos.checked_add(n).ok_or(RdbError::Truncated)?;
        self.seek_to(target)
    }
}
