//! fix command - re-write GenBank records in canonical layout.
//!
//! Useful for files from editors that write LOCUS lines without a name,
//! topology or date, or long labels without quotes.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{parse_genbank, read_input, stamp_today, write_output};
use crate::writing::genbank::{write_records, WriterConfig};

#[derive(Args)]
pub struct FixArgs {
    /// GenBank input file (optionally gzipped). Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (stdout by default)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Leave out records that fail to parse instead of stopping
    #[arg(long)]
    pub skip_invalid: bool,

    /// Replace each record's date with today's date
    #[arg(long)]
    pub stamp_date: bool,

    /// Parse records on all cores
    #[arg(long)]
    pub parallel: bool,
}

/// Execute the fix command
///
/// # Errors
///
/// Returns an error if the input cannot be read or a record fails to parse
/// without `--skip-invalid`.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: FixArgs, verbose: bool) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    let mut records = parse_genbank(&text, args.parallel, args.skip_invalid)?;

    if verbose {
        let mismatched = records.iter().filter(|r| !r.size_matches_sequence()).count();
        eprintln!(
            "Parsed {} record(s); {} with a declared size different from the sequence length",
            records.len(),
            mismatched
        );
    }

    if args.stamp_date {
        records = stamp_today(records);
    }

    let mut buffer = Vec::new();
    write_records(&mut buffer, &records, &WriterConfig::default())?;

    write_output(args.output.as_deref(), &String::from_utf8(buffer)?)
}
