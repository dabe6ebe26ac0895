// src/config.rs

//! Run configuration: the already-parsed command-line option set.

use anyhow::{Result, anyhow, bail};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Dump file flavour selected with `--type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    /// Name of the dump file created inside the output directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "parser.csv",
            OutputFormat::Json => "parser.json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow!("unsupported output type {other:?}, expected csv or json")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Input snapshot.
    pub rdb_path: PathBuf,
    pub format: OutputFormat,
    /// Directory the dump file is written into; created when missing.
    pub output_dir: PathBuf,
}

impl Config {
    /// Scans the raw argument list (`--rdb <path>`, `--type csv|json`,
    /// `--o <dir>`).
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut rdb_path = None;
        let mut format = OutputFormat::default();
        let mut output_dir = PathBuf::from(".");

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--rdb" => {
                    let value = iter.next().ok_or_else(|| anyhow!("--rdb requires a value"))?;
                    rdb_path = Some(PathBuf::from(value));
                }
                "--type" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow!("--type requires a value"))?;
                    format = value.parse()?;
                }
                "--o" => {
                    let value = iter.next().ok_or_else(|| anyhow!("--o requires a value"))?;
                    output_dir = PathBuf::from(value);
                }
                other => bail!("unknown flag {other:?}"),
            }
        }

        let rdb_path = rdb_path.ok_or_else(|| anyhow!("--rdb <path> is required"))?;
        Ok(Self {
            rdb_path,
            format,
            output_dir,
        })
    }

    /// Full path of the dump file.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(self.format.file_name())
    }
}
