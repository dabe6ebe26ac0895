// src/core/output/mod.rs

//! Sinks behind the [`Emitter`] interface: the CSV/JSON dump writers and the
//! keyspace summary, plus a fanout combinator so one decode pass can feed
//! all of them.

pub mod csv;
pub mod json;
pub mod summary;

pub use csv::CsvEmitter;
pub use json::JsonEmitter;
pub use summary::KeyspaceSummary;

use crate::core::errors::RdbError;
use crate::core::rdb::Emitter;
use crate::core::storage::record::Record;

/// Forwards every event to each sink in order. The first sink error aborts
/// the record delivery; `on_end` always reaches every sink.
pub struct Fanout<'a> {
    sinks: Vec<&'a mut dyn Emitter>,
}

impl<'a> Fanout<'a> {
    pub fn new(sinks: Vec<&'a mut dyn Emitter>) -> Self {
        Self { sinks }
    }
}

impl Emitter for Fanout<'_> {
    fn on_header(&mut self, version: u32) -> Result<(), RdbError> {
        for sink in &mut self.sinks {
            sink.on_header(version)?;
        }
        Ok(())
    }

    fn on_record(&mut self, record: &Record) -> Result<(), RdbError> {
        for sink in &mut self.sinks {
            sink.on_record(record)?;
        }
        Ok(())
    }

    fn on_end(&mut self, outcome: Result<(), &RdbError>) -> Result<(), RdbError> {
        let mut first_err = None;
        for sink in &mut self.sinks {
            if let Err(err) = sink.on_end(outcome) {
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
