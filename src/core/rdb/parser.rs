// src/core/rdb/parser.rs

//! The top-level decoder: header validation and the opcode loop that turns
//! file bytes into [`Record`]s, handed to an [`Emitter`] in file order.

use crate::core::errors::RdbError;
use crate::core::rdb::reader::Reader;
use crate::core::rdb::{Emitter, codec, object};
use crate::core::storage::record::{KeyMeta, Record};
use std::io::Read;
use tracing::debug;

const RDB_MAGIC: &[u8] = b"REDIS";
const VERSION_MIN: u32 = 1;
const VERSION_MAX: u32 = 9;
/// The trailing CRC-64 checksum exists from this format version on.
const VERSION_WITH_CHECKSUM: u32 = 5;

const OPCODE_IDLE: u8 = 0xF8; /* LRU idle time. */
const OPCODE_FREQ: u8 = 0xF9; /* LFU frequency. */
const OPCODE_AUX: u8 = 0xFA; /* RDB aux field. */
const OPCODE_RESIZEDB: u8 = 0xFB; /* Hash table resize hint. */
const OPCODE_EXPIRETIME_MS: u8 = 0xFC; /* Expire time in milliseconds. */
const OPCODE_EXPIRETIME: u8 = 0xFD; /* Old expire time in seconds. */
const OPCODE_SELECTDB: u8 = 0xFE; /* DB number of the following keys. */
const OPCODE_EOF: u8 = 0xFF;

/// Hints carried between opcodes and bound to the next key record, then
/// cleared. Only the expire becomes part of the record itself.
#[derive(Debug, Default)]
struct PendingAttrs {
    expire_ms: Option<u64>,
    idle: Option<u64>,
    freq: Option<u8>,
}

pub struct RdbParser<R> {
    reader: Reader<R>,
    version: u32,
    pending: PendingAttrs,
}

impl<R: Read> RdbParser<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::new(source),
            version: 0,
            pending: PendingAttrs::default(),
        }
    }

    /// RDB format version, known once the header has been read.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Byte offset consumed so far; points at the failure site after an
    /// error return.
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    /// Runs the whole decode, emitting every record plus a final
    /// `on_end` with the outcome. The first decode error aborts and is
    /// returned; an emitter error from `on_end` is returned only when the
    /// decode itself succeeded.
    pub fn parse(&mut self, emitter: &mut dyn Emitter) -> Result<(), RdbError> {
        let outcome = self.run(emitter);
        let end = match &outcome {
            Ok(()) => emitter.on_end(Ok(())),
            Err(err) => emitter.on_end(Err(err)),
        };
        outcome.and(end)
    }

    fn run(&mut self, emitter: &mut dyn Emitter) -> Result<(), RdbError> {
        self.read_header()?;
        emitter.on_header(self.version)?;

        loop {
            let tag = self.reader.read_byte()?;
            match tag {
                OPCODE_IDLE => {
                    let idle = codec::read_plain_length(&mut self.reader)?;
                    self.pending.idle = Some(idle);
                }
                OPCODE_FREQ => {
                    self.pending.freq = Some(self.reader.read_byte()?);
                }
                OPCODE_AUX => {
                    let name = codec::read_string(&mut self.reader)?;
                    let value = codec::read_string(&mut self.reader)?;
                    emitter.on_record(&Record::AuxField { name, value })?;
                }
                OPCODE_RESIZEDB => {
                    let db_size = codec::read_plain_length(&mut self.reader)?;
                    let expires_size = codec::read_plain_length(&mut self.reader)?;
                    emitter.on_record(&Record::ResizeDb {
                        db_size,
                        expires_size,
                    })?;
                }
                OPCODE_EXPIRETIME_MS => {
                    self.pending.expire_ms = Some(self.reader.u64_le()?);
                }
                OPCODE_EXPIRETIME => {
                    let seconds = self.reader.u64_le()?;
                    self.pending.expire_ms = Some(seconds.saturating_mul(1000));
                }
                OPCODE_SELECTDB => {
                    // Emitted for every occurrence; the upstream parser had a
                    // skip-after-first latch that was never armed.
                    let index = codec::read_plain_length(&mut self.reader)?;
                    emitter.on_record(&Record::SelectDb { index })?;
                }
                OPCODE_EOF => {
                    self.read_trailer()?;
                    debug!("EOF opcode reached, decode complete");
                    return Ok(());
                }
                value_type => {
                    let key = codec::read_string(&mut self.reader)?;
                    let value = object::read_value(&mut self.reader, value_type)?;
                    let meta = KeyMeta {
                        key,
                        expire_ms: self.pending.expire_ms.take(),
                    };
                    if let Some(idle) = self.pending.idle.take() {
                        debug!(idle, "dropping LRU idle hint");
                    }
                    if let Some(freq) = self.pending.freq.take() {
                        debug!(freq, "dropping LFU frequency hint");
                    }
                    emitter.on_record(&Record::Key { meta, value })?;
                }
            }
        }
    }

    /// Validates the fixed 9-byte header: `"REDIS"` plus four ASCII digits.
    fn read_header(&mut self) -> Result<(), RdbError> {
        let header = match self.reader.read_full(9) {
            Ok(header) => header,
            Err(RdbError::Truncated) => return Err(RdbError::BadHeader),
            Err(err) => return Err(err),
        };
        if &header[..5] != RDB_MAGIC {
            return Err(RdbError::BadHeader);
        }
        let version = std::str::from_utf8(&header[5..])
            .ok()
            .and_then(|digits| digits.parse::<u32>().ok())
            .ok_or(RdbError::BadHeader)?;
        if !(VERSION_MIN..=VERSION_MAX).contains(&version) {
            return Err(RdbError::BadVersion(version));
        }
        self.version = version;
        Ok(())
    }

    /// Consumes the 8-byte CRC-64 trailer on formats that carry one. The
    /// checksum is compared against the running digest and logged, never
    /// enforced.
    fn read_trailer(&mut self) -> Result<(), RdbError> {
        if self.version < VERSION_WITH_CHECKSUM {
            return Ok(());
        }
        let computed = self.reader.checksum();
        let stored = self.reader.u64_le()?;
        if stored != 0 && stored != computed {
            debug!(stored, computed, "RDB checksum trailer does not match");
        }
        Ok(())
    }
}
