//! to-json command - convert GenBank records to jseq JSON.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{parse_genbank, read_input, write_output};
use crate::jseq;

#[derive(Args)]
pub struct ToJsonArgs {
    /// GenBank input file (optionally gzipped). Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (stdout by default)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Parse records on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Leave out records that fail to parse instead of stopping
    #[arg(long)]
    pub skip_invalid: bool,
}

/// Execute the to-json command
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ToJsonArgs, verbose: bool) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    let records = parse_genbank(&text, args.parallel, args.skip_invalid)?;

    if verbose {
        eprintln!("Parsed {} record(s) from {}", records.len(), args.input.display());
    }

    let mut json = if args.compact {
        jseq::to_json_compact(&records)?
    } else {
        jseq::to_json(&records)?
    };
    json.push('\n');

    write_output(args.output.as_deref(), &json)
}
