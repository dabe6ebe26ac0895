// tests/support/helpers.rs

//! Shared fixture builders and a collecting emitter for the decoder tests.

#![allow(dead_code)]

use bytes::{BufMut, BytesMut};
use rdbscan::RdbError;
use rdbscan::core::rdb::codec::{write_length, write_string};
use rdbscan::core::rdb::{Emitter, RdbParser};
use rdbscan::core::storage::record::Record;

/// Emitter that keeps everything it sees.
#[derive(Debug, Default)]
pub struct Collect {
    pub version: Option<u32>,
    pub records: Vec<Record>,
    pub end_ok: Option<bool>,
}

impl Emitter for Collect {
    fn on_header(&mut self, version: u32) -> Result<(), RdbError> {
        self.version = Some(version);
        Ok(())
    }

    fn on_record(&mut self, record: &Record) -> Result<(), RdbError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn on_end(&mut self, outcome: Result<(), &RdbError>) -> Result<(), RdbError> {
        self.end_ok = Some(outcome.is_ok());
        Ok(())
    }
}

/// Runs a full decode over `bytes`, returning the collected records.
pub fn decode(bytes: &[u8]) -> Result<Collect, RdbError> {
    let mut collect = Collect::default();
    let mut parser = RdbParser::new(bytes);
    parser.parse(&mut collect)?;
    Ok(collect)
}

/// Starts a file with the 9-byte header.
pub fn header(version: &str) -> BytesMut {
    let mut buf = BytesMut::new();
    buf.put_slice(b"REDIS");
    buf.put_slice(version.as_bytes());
    buf
}

/// Closes a version-9 file: EOF opcode plus a zeroed checksum trailer.
pub fn finish(mut buf: BytesMut) -> Vec<u8> {
    buf.put_u8(0xFF);
    buf.put_u64_le(0);
    buf.to_vec()
}

pub fn put_aux(buf: &mut BytesMut, name: &[u8], value: &[u8]) {
    buf.put_u8(0xFA);
    write_string(buf, name);
    write_string(buf, value);
}

pub fn put_select_db(buf: &mut BytesMut, index: u64) {
    buf.put_u8(0xFE);
    write_length(buf, index);
}

pub fn put_string_key(buf: &mut BytesMut, key: &[u8], value: &[u8]) {
    buf.put_u8(0);
    write_string(buf, key);
    write_string(buf, value);
}

// --- Listpack fixture builders (1-byte back-pointers throughout) ---

/// Small string entry: 6-bit length form.
pub fn lp_str(buf: &mut BytesMut, s: &[u8]) {
    assert!(s.len() < 64 && 1 + s.len() <= 127);
    buf.put_u8(0x80 | s.len() as u8);
    buf.put_slice(s);
    buf.put_u8(0); // element-total-len, skipped by the decoder
}

/// Small integer entry: 7-bit immediate form.
pub fn lp_small_int(buf: &mut BytesMut, v: u8) {
    assert!(v <= 0x7F);
    buf.put_u8(v);
    buf.put_u8(0);
}

/// Encodes the 16-byte big-endian master ID string for a stream listpack.
pub fn stream_master_id(ms: u64, seq: u64) -> Vec<u8> {
    let mut id = BytesMut::new();
    id.put_u64(ms);
    id.put_u64(seq);
    id.to_vec()
}

/// Prefixes a listpack body with the 6 header bytes the decoder skips.
pub fn listpack_with_header(body: &[u8]) -> Vec<u8> {
    let mut lp = BytesMut::new();
    lp.put_u32_le(6 + body.len() as u32 + 1);
    lp.put_u16_le(0);
    lp.put_slice(body);
    lp.to_vec()
}
