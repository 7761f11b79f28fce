//! to-genbank command - convert jseq JSON back to GenBank.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_input, stamp_today, write_output};
use crate::jseq;
use crate::writing::genbank::{to_genbank_with, WriterConfig};

#[derive(Args)]
pub struct ToGenbankArgs {
    /// jseq input file. Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (stdout by default)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Replace each record's date with today's date
    #[arg(long)]
    pub stamp_date: bool,

    /// Qualifier to write without quotes (repeatable). Replaces the default
    /// list: ApEinfo_label, ApEinfo_fwdcolor, ApEinfo_revcolor, label
    #[arg(long = "unquoted-qualifier", value_name = "NAME")]
    pub unquoted_qualifiers: Vec<String>,

    /// Column at which feature lines wrap
    #[arg(long, default_value = "80", value_parser = clap::value_parser!(u16).range(30..=1000))]
    pub line_width: u16,
}

impl ToGenbankArgs {
    pub(crate) fn writer_config(&self) -> WriterConfig {
        let mut config = WriterConfig {
            line_width: usize::from(self.line_width),
            ..WriterConfig::default()
        };
        if !self.unquoted_qualifiers.is_empty() {
            config.unquoted_qualifiers.clone_from(&self.unquoted_qualifiers);
        }
        config
    }
}

/// Execute the to-genbank command
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a jseq document.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ToGenbankArgs, verbose: bool) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    let mut records = jseq::from_json(&text)?;

    if verbose {
        eprintln!("Read {} record(s) from {}", records.len(), args.input.display());
    }

    if args.stamp_date {
        records = stamp_today(records);
    }

    let config = args.writer_config();
    let out: String = records.iter().map(|r| to_genbank_with(r, &config)).collect();

    write_output(args.output.as_deref(), &out)
}
