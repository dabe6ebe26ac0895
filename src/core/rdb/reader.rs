// src/core/rdb/reader.rs

//! Buffered sequential reader over the RDB byte stream.
//!
//! Fixed-width integer accessors read through a small on-stack scratch
//! buffer, and every consumed byte is folded into a running CRC-64/REDIS
//! digest so the trailer can be compared opportunistically at EOF. An
//! unexpected end of stream always surfaces as [`RdbError::Truncated`].

use crate::core::errors::RdbError;
use bytes::Bytes;
use crc::{CRC_64_REDIS, Crc, Digest};
use std::io::{ErrorKind, Read};

static CHECKSUM_ALGO: Crc<u64> = Crc::<u64>::new(&CRC_64_REDIS);

pub struct Reader<R> {
    inner: R,
    position: u64,
    digest: Digest<'static, u64>,
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            position: 0,
            digest: CHECKSUM_ALGO.digest(),
        }
    }

    /// Number of bytes consumed so far, reported alongside decode errors.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// CRC-64/REDIS over everything consumed so far.
    pub fn checksum(&self) -> u64 {
        self.digest.clone().finalize()
    }

    pub fn read_byte(&mut self) -> Result<u8, RdbError> {
        let mut scratch = [0u8; 1];
        self.fill(&mut scratch)?;
        Ok(scratch[0])
    }

    pub fn read_full(&mut self, n: usize) -> Result<Bytes, RdbError> {
        let mut buf = vec![0u8; n];
        self.fill(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    pub fn u16_le(&mut self) -> Result<u16, RdbError> {
        let mut scratch = [0u8; 2];
        self.fill(&mut scratch)?;
        Ok(u16::from_le_bytes(scratch))
    }

    pub fn u32_le(&mut self) -> Result<u32, RdbError> {
        let mut scratch = [0u8; 4];
        self.fill(&mut scratch)?;
        Ok(u32::from_le_bytes(scratch))
    }

    pub fn u64_le(&mut self) -> Result<u64, RdbError> {
        let mut scratch = [0u8; 8];
        self.fill(&mut scratch)?;
        Ok(u64::from_le_bytes(scratch))
    }

    pub fn u32_be(&mut self) -> Result<u32, RdbError> {
        let mut scratch = [0u8; 4];
        self.fill(&mut scratch)?;
        Ok(u32::from_be_bytes(scratch))
    }

    pub fn u64_be(&mut self) -> Result<u64, RdbError> {
        let mut scratch = [0u8; 8];
        self.fill(&mut scratch)?;
        Ok(u64::from_be_bytes(scratch))
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), RdbError> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.position += buf.len() as u64;
                self.digest.update(buf);
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => Err(RdbError::Truncated),
            Err(err) => Err(RdbError::Io(err)),
        }
    }
}
