//! inspect command - per-record summary of a GenBank file.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{parse_genbank, read_input, OutputFormat};
use crate::core::record::Record;

#[derive(Args)]
pub struct InspectArgs {
    /// GenBank input file (optionally gzipped). Use '-' for stdin
    #[arg(required = true)]
    pub input: PathBuf,

    /// Leave out records that fail to parse instead of stopping
    #[arg(long)]
    pub skip_invalid: bool,
}

/// Execute the inspect command
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: InspectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    let records = parse_genbank(&text, false, args.skip_invalid)?;

    match format {
        OutputFormat::Text => print_text_summary(&records, verbose),
        OutputFormat::Json => print_json_summary(&records)?,
        OutputFormat::Tsv => print_tsv_summary(&records),
    }

    Ok(())
}

fn display_name(record: &Record) -> &str {
    if record.name.is_empty() {
        "(unnamed)"
    } else {
        &record.name
    }
}

fn annotation_names(record: &Record) -> Vec<&str> {
    record.annotations.iter().map(|(name, _)| name.as_str()).collect()
}

fn print_text_summary(records: &[Record], verbose: bool) {
    println!("{} record(s)", records.len());

    for record in records {
        println!();
        println!("{}", display_name(record));
        println!("  Declared size:   {} bp", record.size);
        println!("  Sequence length: {} bp", record.sequence.len());
        if !record.size_matches_sequence() {
            println!("  Note: declared size differs from sequence length");
        }
        println!("  Molecule:        {}", record.seqtype());
        println!("  Topology:        {}", record.topology);
        println!("  Date:            {}", record.date);
        println!("  Features:        {}", record.features.len());

        if verbose {
            for feature in &record.features {
                let span = feature
                    .bounds()
                    .map_or_else(String::new, |b| format!("{}..{}", b.start, b.end));
                println!(
                    "    {:<16} {:<16} {:>2} {}",
                    feature.kind,
                    span,
                    feature.strand.as_i8(),
                    feature.label().unwrap_or("")
                );
            }
        }

        let names = annotation_names(record);
        if !names.is_empty() {
            println!("  Annotations:     {}", names.join(", "));
        }
    }
}

fn print_json_summary(records: &[Record]) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = records
        .iter()
        .map(|record| {
            serde_json::json!({
                "name": record.name,
                "size": record.size,
                "sequence_length": record.sequence.len(),
                "size_matches": record.size_matches_sequence(),
                "seqtype": record.seqtype(),
                "topology": record.topology.as_str(),
                "date": record.date,
                "features": record.features.len(),
                "annotations": annotation_names(record),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_summary(records: &[Record]) {
    println!("name\tsize\tsequence_length\tseqtype\ttopology\tdate\tfeatures\tannotations");
    for record in records {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            record.name,
            record.size,
            record.sequence.len(),
            record.seqtype(),
            record.topology,
            record.date,
            record.features.len(),
            annotation_names(record).join(",")
        );
    }
}
