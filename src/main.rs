// src/main.rs

//! The command-line entry point for the rdbscan inspector.

use anyhow::{Result, anyhow};
use rdbscan::config::{Config, OutputFormat};
use rdbscan::core::output::{CsvEmitter, Fanout, JsonEmitter, KeyspaceSummary};
use rdbscan::core::rdb::{Emitter, RdbParser};
use std::env;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

fn main() {
    // Define version information.
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let args: Vec<String> = env::args().collect();

    // Handle the --version flag.
    if args.contains(&"--version".to_string()) {
        println!("rdbscan version {VERSION}");
        return;
    }

    // Setup logging with compact format and ANSI colors, on stderr so the
    // summary report owns stdout.
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_args(&args[1..]) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("rdbscan: {err}");
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        eprintln!("rdbscan: {err}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    if !config.output_dir.is_dir() {
        fs::create_dir_all(&config.output_dir)?;
    }

    let input = File::open(&config.rdb_path)?;
    info!(
        "parsing RDB snapshot at {} ({} bytes)",
        config.rdb_path.display(),
        input.metadata()?.len()
    );
    let mut parser = RdbParser::new(BufReader::new(input));

    let out_path = config.output_path();
    let dump_file = BufWriter::new(File::create(&out_path)?);
    let mut csv;
    let mut json;
    let dump: &mut dyn Emitter = match config.format {
        OutputFormat::Csv => {
            csv = CsvEmitter::new(dump_file);
            &mut csv
        }
        OutputFormat::Json => {
            json = JsonEmitter::new(dump_file);
            &mut json
        }
    };
    let mut summary = KeyspaceSummary::new();

    let mut sinks = Fanout::new(vec![dump, &mut summary]);
    parser
        .parse(&mut sinks)
        .map_err(|err| anyhow!("{} at byte offset {}: {err}", err.kind(), parser.position()))?;

    info!(
        "dump written to {} ({} format)",
        out_path.display(),
        config.format
    );
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: rdbscan --rdb <dump.rdb> [--type csv|json] [--o <output-dir>]");
    eprintln!("  --rdb   input RDB snapshot (required)");
    eprintln!("  --type  dump file format, csv or json (default: csv)");
    eprintln!("  --o     output directory for parser.csv / parser.json (default: .)");
}
