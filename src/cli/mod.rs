//! Command-line interface for jseq.
//!
//! Available commands:
//!
//! - **to-json**: Convert GenBank records to jseq JSON
//! - **to-genbank**: Convert jseq JSON back to GenBank
//! - **fix**: Re-write GenBank files from tolerant tools in canonical layout
//! - **inspect**: Summarize the records in a GenBank file
//!
//! ## Usage
//!
//! ```text
//! # Convert a plasmid map to JSON
//! jseq to-json pUC19.gb -o pUC19.json
//!
//! # Round trip through JSON from stdin
//! cat pUC19.gb | jseq to-json - | jseq to-genbank -
//!
//! # Normalize a file written by an older editor, dropping broken records
//! jseq fix legacy.gb --skip-invalid -o fixed.gb
//!
//! # Per-record summary for scripting
//! jseq inspect collection.gb.gz --format tsv
//! ```

use std::io::{self, Read, Write};
use std::path::Path;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::core::record::Record;
use crate::parsing::genbank::{
    parse_records, parse_records_lenient, parse_records_parallel, read_text_file,
};

pub mod fix;
pub mod inspect;
pub mod to_genbank;
pub mod to_json;

#[derive(Parser)]
#[command(name = "jseq")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Convert GenBank flat files to and from jseq JSON")]
#[command(
    long_about = "jseq parses GenBank records tolerantly, including the LOCUS-line quirks of common plasmid editors, and converts them to a JSON projection (jseq) and back.\n\nThe GenBank writer uses a fixed-column layout so that parsing its output gives back the same record."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for reports
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert GenBank records to jseq JSON
    ToJson(to_json::ToJsonArgs),

    /// Convert jseq JSON to GenBank
    ToGenbank(to_genbank::ToGenbankArgs),

    /// Re-write GenBank records in canonical layout
    Fix(fix::FixArgs),

    /// Summarize the records in a GenBank file
    Inspect(inspect::InspectArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

fn is_stdio(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

/// Read a whole input file, or stdin for `-`. Gzipped files are decompressed.
///
/// # Errors
///
/// Returns an error if the input cannot be read.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if is_stdio(path) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }

    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    Ok(read_text_file(path)?)
}

/// Write to a file, or stdout when no path (or `-`) is given.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_output(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(path) if !is_stdio(path) => std::fs::write(path, text)?,
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Parse GenBank text with the strategy chosen on the command line.
///
/// With `skip_invalid`, records that fail to parse are reported and left
/// out; otherwise the first failure is returned.
///
/// # Errors
///
/// Returns the first parse error unless `skip_invalid` is set.
pub fn parse_genbank(text: &str, parallel: bool, skip_invalid: bool) -> anyhow::Result<Vec<Record>> {
    if skip_invalid {
        let mut records = Vec::new();
        for (index, result) in parse_records_lenient(text)?.into_iter().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(e) => warn!(record = index + 1, error = %e, "Skipping invalid record"),
            }
        }
        return Ok(records);
    }

    let records = if parallel {
        parse_records_parallel(text)?
    } else {
        parse_records(text)?
    };
    Ok(records)
}

/// Replace every record's date with today's date
#[must_use]
pub fn stamp_today(records: Vec<Record>) -> Vec<Record> {
    let today = chrono::Local::now().date_naive();
    records.into_iter().map(|r| r.with_date(today)).collect()
}
