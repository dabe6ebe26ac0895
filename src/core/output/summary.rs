// src/core/output/summary.rs

//! The "biggest keys / type summary" accumulator. Runs as one more sink on
//! the decode pass; meta records do not count towards the keyspace.

use crate::core::errors::RdbError;
use crate::core::rdb::Emitter;
use crate::core::storage::record::Record;
use std::collections::HashMap;
use std::io::Write;

/// Report order for the per-type sections.
const TYPE_ORDER: [&str; 6] = ["String", "Hash", "List", "SortedSet", "Set", "Stream"];

#[derive(Debug, Default, Clone)]
struct TypeStats {
    keys: u64,
    elements: u64,
    unit: &'static str,
}

#[derive(Debug, Clone)]
struct BiggestKey {
    key: String,
    value_len: u64,
    concrete_size: u64,
}

/// Accumulates keyspace statistics and prints the report on `on_end(Ok)`.
#[derive(Debug, Default)]
pub struct KeyspaceSummary {
    sampled_keys: u64,
    key_bytes: u64,
    gather: HashMap<&'static str, TypeStats>,
    biggest: HashMap<&'static str, BiggestKey>,
}

impl KeyspaceSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the report in the classic redis-cli `--bigkeys` shape.
    pub fn write_report<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        writeln!(out, "# Scanning the rdb file to find biggest keys\n")?;
        writeln!(out, "-------- summary -------\n")?;
        writeln!(out, "Sampled {} keys in the keyspace!", self.sampled_keys)?;
        writeln!(out, "Total key length in bytes is {}\n", self.key_bytes)?;

        for data_type in TYPE_ORDER {
            if let Some(biggest) = self.biggest.get(data_type) {
                let unit = self.gather.get(data_type).map(|s| s.unit).unwrap_or("");
                writeln!(
                    out,
                    "Biggest {:>9} found '{}' has {} {}",
                    data_type.to_lowercase(),
                    biggest.key,
                    biggest.value_len,
                    unit
                )?;
            }
        }
        writeln!(out)?;

        for data_type in TYPE_ORDER {
            if let Some(stats) = self.gather.get(data_type) {
                writeln!(
                    out,
                    "{} {} with {} {}",
                    stats.keys,
                    data_type.to_lowercase(),
                    stats.elements,
                    stats.unit
                )?;
            }
        }
        Ok(())
    }
}

impl Emitter for KeyspaceSummary {
    fn on_record(&mut self, record: &Record) -> Result<(), RdbError> {
        let Record::Key { meta, value } = record else {
            return Ok(());
        };

        self.sampled_keys += 1;
        self.key_bytes += meta.key.len() as u64;

        let stats = self.gather.entry(value.data_type()).or_default();
        stats.keys += 1;
        stats.elements += value.value_len();
        stats.unit = value.unit();

        let size = value.concrete_size();
        let candidate = || BiggestKey {
            key: record.key_string(),
            value_len: value.value_len(),
            concrete_size: size,
        };
        self.biggest
            .entry(value.data_type())
            .and_modify(|current| {
                if size > current.concrete_size {
                    *current = candidate();
                }
            })
            .or_insert_with(candidate);
        Ok(())
    }

    fn on_end(&mut self, outcome: Result<(), &RdbError>) -> Result<(), RdbError> {
        if outcome.is_ok() {
            let stdout = std::io::stdout();
            self.write_report(stdout.lock())?;
        }
        Ok(())
    }
}
