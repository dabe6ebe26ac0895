// src/core/output/json.rs

//! JSON dump writer: a single object whose members are the records in
//! encounter order, keyed by each record's key string.

use crate::core::errors::RdbError;
use crate::core::rdb::Emitter;
use crate::core::storage::record::Record;
use std::io::Write;

pub struct JsonEmitter<W> {
    out: W,
    first: bool,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out, first: true }
    }
}

impl<W: Write> Emitter for JsonEmitter<W> {
    fn on_record(&mut self, record: &Record) -> Result<(), RdbError> {
        let separator = if self.first { "{" } else { "," };
        self.first = false;
        let member = serde_json::to_string(&record.key_string())
            .map_err(|err| RdbError::Format(err.to_string()))?;
        write!(self.out, "{separator}{member}:{}", record.value_json())?;
        Ok(())
    }

    fn on_end(&mut self, _outcome: Result<(), &RdbError>) -> Result<(), RdbError> {
        if self.first {
            // No records at all still produces a well-formed document.
            write!(self.out, "{{")?;
        }
        write!(self.out, "}}")?;
        self.out.flush()?;
        Ok(())
    }
}
