// src/core/output/csv.rs

//! CSV dump writer: one row per record, meta records included.

use crate::core::errors::RdbError;
use crate::core::rdb::Emitter;
use crate::core::storage::record::Record;
use std::io::Write;

const HEADER: &str = "DataType,Key,Value,Size(bytes)";

pub struct CsvEmitter<W> {
    out: W,
    wrote_header: bool,
}

impl<W: Write> CsvEmitter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            wrote_header: false,
        }
    }
}

impl<W: Write> Emitter for CsvEmitter<W> {
    fn on_record(&mut self, record: &Record) -> Result<(), RdbError> {
        if !self.wrote_header {
            writeln!(self.out, "{HEADER}")?;
            self.wrote_header = true;
        }
        writeln!(
            self.out,
            "{},{},{},{}",
            quote(record.data_type()),
            quote(&record.key_string()),
            quote(&record.value_string()),
            record.concrete_size()
        )?;
        Ok(())
    }

    fn on_end(&mut self, _outcome: Result<(), &RdbError>) -> Result<(), RdbError> {
        self.out.flush()?;
        Ok(())
    }
}

/// RFC-4180 quoting: a field is wrapped only when it carries a separator,
/// quote, or line break.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
