//! GenBank record assembler.
//!
//! A record is the LOCUS line followed by top-level sections, ended by a
//! `//` line. Any non-blank line starting at column 0 opens a new section;
//! indented lines belong to the section above them. Sections are dispatched
//! by keyword:
//!
//! - `FEATURES` to the feature-table grammar
//! - `ORIGIN` to the sequence grammar
//! - anything else starting with capitals is kept as a generic section
//!
//! A syntax error anywhere in a record aborts that record. Buffers holding
//! several records are split on `//` lines first, so each record can be
//! parsed on its own.

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::record::Record;
use crate::parsing::features::parse_feature_table;
use crate::parsing::location::LocationError;
use crate::parsing::locus::parse_locus;
use crate::parsing::origin::parse_origin;
use crate::parsing::section::{merge_sections, parse_section};
use crate::utils::validation::check_record_limit;

/// Line numbers are 1-based and relative to the start of the record.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid LOCUS line {line}: '{text}'")]
    HeaderSyntax { line: usize, text: String },

    #[error("Invalid location '{location}' on line {line}: {source}")]
    LocationSyntax {
        line: usize,
        location: String,
        #[source]
        source: LocationError,
    },

    #[error("Invalid qualifier on line {line}: '{text}'")]
    QualifierSyntax { line: usize, text: String },

    #[error("Line {line}: {reason}")]
    SectionSyntax { line: usize, reason: String },

    #[error("Too many records: {0} exceeds maximum allowed (100000)")]
    TooManyRecords(usize),

    #[error("Too many features: {0} exceeds maximum allowed (100000)")]
    TooManyFeatures(usize),
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn keyword(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

/// Whether `line` opens a new section, given the header of the current one
fn opens_section(line: &str, current: Option<&str>) -> bool {
    if is_blank(line) || line.starts_with(char::is_whitespace) {
        return false;
    }
    // Unindented sequence rows stay inside ORIGIN
    let in_origin = current.is_some_and(|header| keyword(header) == "ORIGIN");
    !(in_origin && line.starts_with(|c: char| c.is_ascii_digit()))
}

/// `[start, end)` line ranges of the sections in `body[from..]`
fn section_bounds(body: &[&str], from: usize) -> Vec<(usize, usize)> {
    let mut bounds = Vec::new();
    let mut current: Option<usize> = None;

    for (i, line) in body.iter().enumerate().skip(from) {
        if opens_section(line, current.map(|start| body[start])) {
            if let Some(start) = current {
                bounds.push((start, i));
            }
            current = Some(i);
        } else if current.is_none() && !is_blank(line) {
            warn!(line = i + 1, "Skipping indented line outside any section");
        }
    }

    if let Some(start) = current {
        bounds.push((start, body.len()));
    }
    bounds
}

/// Parse a single GenBank record.
///
/// The text must contain the record's `//` terminator. Anything after the
/// terminator is ignored with a warning; use [`parse_records`] for buffers
/// holding more than one record.
///
/// # Errors
///
/// Returns `ParseError::HeaderSyntax` if no LOCUS grammar matches the first
/// line, `ParseError::SectionSyntax` if the terminator is missing or a
/// section cannot be parsed, and the feature-table errors from
/// [`parse_feature_table`].
pub fn parse_record(text: &str) -> Result<Record, ParseError> {
    let lines: Vec<&str> = text.lines().collect();

    let terminator = lines
        .iter()
        .position(|l| l.trim_end() == "//")
        .ok_or_else(|| ParseError::SectionSyntax {
            line: lines.len() + 1,
            reason: "record is missing its '//' terminator".to_string(),
        })?;

    if lines[terminator + 1..].iter().any(|l| !is_blank(l)) {
        warn!(
            line = terminator + 2,
            "Ignoring text after the '//' record terminator"
        );
    }

    let body = &lines[..terminator];

    let header_index = body
        .iter()
        .position(|l| !is_blank(l))
        .ok_or_else(|| ParseError::HeaderSyntax {
            line: 1,
            text: String::new(),
        })?;
    let header = body[header_index];
    let (_, locus) = parse_locus(header).ok_or_else(|| ParseError::HeaderSyntax {
        line: header_index + 1,
        text: header.trim().to_string(),
    })?;

    let mut features = Vec::new();
    let mut sequence = String::new();
    let mut generics = Vec::new();
    let mut seen_features = false;
    let mut seen_origin = false;

    for (start, end) in section_bounds(body, header_index + 1) {
        let section = &body[start..end];
        let line = start + 1;

        match keyword(section[0]) {
            "FEATURES" => {
                if seen_features {
                    warn!(line, "Appending repeated FEATURES section");
                }
                seen_features = true;
                features.extend(parse_feature_table(&section[1..], line + 1)?);
            }
            "ORIGIN" => {
                if seen_origin {
                    warn!(line, "Appending repeated ORIGIN section");
                }
                seen_origin = true;
                sequence.push_str(&parse_origin(&section[1..], line + 1)?);
            }
            "LOCUS" => {
                return Err(ParseError::SectionSyntax {
                    line,
                    reason: "second LOCUS line before '//'".to_string(),
                });
            }
            _ => {
                let generic = parse_section(section).ok_or_else(|| ParseError::SectionSyntax {
                    line,
                    reason: format!("unrecognised line '{}'", section[0].trim()),
                })?;
                generics.push(generic);
            }
        }
    }

    if locus.size != sequence.len() as u64 {
        debug!(
            name = %locus.name,
            declared = locus.size,
            actual = sequence.len(),
            "Declared size differs from sequence length"
        );
    }

    Ok(Record {
        name: locus.name,
        size: locus.size,
        seq_kind: locus.seq_kind,
        strand_prefix: locus.strand_prefix,
        topology: locus.topology,
        division_code: locus.division_code,
        date: locus.date,
        sequence,
        features,
        annotations: merge_sections(generics),
    })
}

/// Split a buffer into records, each ending with (and including) its `//`
/// line.
///
/// Trailing text without a terminator is returned as a final chunk unless it
/// is blank, so that [`parse_record`] can report it.
#[must_use]
pub fn split_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        offset += line.len();
        if line.trim_end() == "//" {
            records.push(&text[start..offset]);
            start = offset;
        }
    }

    let rest = &text[start..];
    if !is_blank(rest) {
        records.push(rest);
    }
    records
}

fn split_within_limit(text: &str) -> Result<Vec<&str>, ParseError> {
    let chunks = split_records(text);
    if let Some(msg) = check_record_limit(chunks.len().saturating_sub(1)) {
        warn!("{msg}");
        return Err(ParseError::TooManyRecords(chunks.len()));
    }
    Ok(chunks)
}

/// Parse every record in a buffer, stopping at the first failure.
///
/// # Errors
///
/// Returns the first record's error, or `ParseError::TooManyRecords`.
pub fn parse_records(text: &str) -> Result<Vec<Record>, ParseError> {
    split_within_limit(text)?
        .into_iter()
        .map(parse_record)
        .collect()
}

/// Parse every record in a buffer, keeping one result per record so the
/// caller can skip the ones that failed.
///
/// # Errors
///
/// Returns `ParseError::TooManyRecords` if the buffer holds too many records.
pub fn parse_records_lenient(text: &str) -> Result<Vec<Result<Record, ParseError>>, ParseError> {
    Ok(split_within_limit(text)?
        .into_iter()
        .map(parse_record)
        .collect())
}

/// Like [`parse_records`], parsing records on the rayon thread pool.
///
/// Output order matches input order.
///
/// # Errors
///
/// Returns a failing record's error, or `ParseError::TooManyRecords`.
pub fn parse_records_parallel(text: &str) -> Result<Vec<Record>, ParseError> {
    split_within_limit(text)?
        .par_iter()
        .map(|chunk| parse_record(chunk))
        .collect()
}

/// Check if the path is a gzipped file
fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "gz" || e == "bgz")
}

/// Read a plain or gzip-compressed text file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or is not UTF-8.
pub fn read_text_file(path: &Path) -> Result<String, ParseError> {
    let mut text = String::new();
    if is_gzipped(path) {
        let file = std::fs::File::open(path)?;
        GzDecoder::new(file).read_to_string(&mut text)?;
    } else {
        text = std::fs::read_to_string(path)?;
    }
    Ok(text)
}

/// Parse every record in a GenBank file (`.gb`, `.gbk`, optionally `.gz`).
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, otherwise the errors
/// of [`parse_records`].
pub fn parse_file(path: &Path) -> Result<Vec<Record>, ParseError> {
    let text = read_text_file(path)?;
    parse_records(&text)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;
    use crate::core::feature::{QualifierValue, Span};
    use crate::core::types::{Strand, Topology};

    const MINIMAL: &str = "LOCUS test 10 bp DNA linear SYN 01-JAN-2000\nFEATURES Location/Qualifiers\n gene 1..10\n /label=\"x\"\nORIGIN\n 1 acgtacgtac\n//\n";

    const FULL: &str = "\
LOCUS       pTest                     60 bp ds-DNA     circular SYN 15-JUN-2021
DEFINITION  A test plasmid
            spanning two lines.
COMMENT     first comment
FEATURES             Location/Qualifiers
     source          1..60
                     /organism=\"synthetic DNA construct\"
     CDS             complement(join(1..10,21..30))
                     /gene=\"abc\"
                     /codon_start=1
COMMENT     second comment
ORIGIN
        1 acgtacgtac gtacgtacgt acgtacgtac gtacgtacgt acgtacgtac gtacgtacgt
//
";

    #[test]
    fn test_minimal_record() {
        let record = parse_record(MINIMAL).unwrap();
        assert_eq!(record.name, "test");
        assert_eq!(record.size, 10);
        assert_eq!(record.division_code, "SYN");
        assert_eq!(record.date, "01-JAN-2000");
        assert_eq!(record.sequence, "acgtacgtac");
        assert_eq!(record.features.len(), 1);

        let gene = &record.features[0];
        assert_eq!(gene.kind, "gene");
        assert_eq!(gene.location, vec![Span::new(1, 10)]);
        assert_eq!(gene.strand, Strand::Forward);
        assert_eq!(gene.qualifier("label"), Some(&QualifierValue::Text("x".to_string())));
    }

    #[test]
    fn test_full_record() {
        let record = parse_record(FULL).unwrap();
        assert_eq!(record.topology, Topology::Circular);
        assert_eq!(record.sequence.len(), 60);
        assert_eq!(record.features.len(), 2);
        assert_eq!(record.features[1].strand, Strand::Reverse);
        assert_eq!(
            record.annotations,
            vec![
                (
                    "DEFINITION".to_string(),
                    "A test plasmid\nspanning two lines.\n".to_string()
                ),
                (
                    "COMMENT".to_string(),
                    "first comment\nsecond comment\n".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_multiline_quoted_value_with_minimal_indent() {
        let text = MINIMAL.replace(" /label=\"x\"", " /note=\"two\n lines\"");
        let record = parse_record(&text).unwrap();
        assert_eq!(record.features.len(), 1);
        assert_eq!(
            record.features[0].qualifier("note"),
            Some(&QualifierValue::Text("two lines".to_string()))
        );
        assert_eq!(record.sequence, "acgtacgtac");
    }

    #[test]
    fn test_size_mismatch_is_tolerated() {
        let text = MINIMAL.replace("test 10 bp", "test 99 bp");
        let record = parse_record(&text).unwrap();
        assert_eq!(record.size, 99);
        assert_eq!(record.sequence.len(), 10);
        assert!(!record.size_matches_sequence());
    }

    #[test]
    fn test_header_failure_is_fatal() {
        let text = MINIMAL.replace("LOCUS test 10 bp", "LOCUS test ten bp");
        match parse_record(&text) {
            Err(ParseError::HeaderSyntax { line, text }) => {
                assert_eq!(line, 1);
                assert!(text.starts_with("LOCUS test ten"));
            }
            other => panic!("expected header error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_terminator() {
        let text = MINIMAL.replace("//\n", "");
        assert!(matches!(
            parse_record(&text),
            Err(ParseError::SectionSyntax { line: 7, .. })
        ));
    }

    #[test]
    fn test_bad_location_aborts_record() {
        let text = MINIMAL.replace(" gene 1..10", " gene 1..x");
        assert!(matches!(
            parse_record(&text),
            Err(ParseError::LocationSyntax { line: 3, .. })
        ));
    }

    #[test]
    fn test_unrecognised_column_zero_line() {
        let text = MINIMAL.replace("ORIGIN", "origin");
        assert!(matches!(
            parse_record(&text),
            Err(ParseError::SectionSyntax { line: 5, .. })
        ));
    }

    #[test]
    fn test_defaults_are_not_errors() {
        let text = MINIMAL.replace("LOCUS test 10 bp DNA linear SYN 01-JAN-2000", "LOCUS test 10 bp DNA SYN");
        let record = parse_record(&text).unwrap();
        assert_eq!(record.date, "19-MAR-1970");
        assert_eq!(record.topology, Topology::Linear);
    }

    #[test]
    fn test_record_without_features_or_origin() {
        let record = parse_record("LOCUS empty 0 bp DNA linear SYN 01-JAN-2000\n//\n").unwrap();
        assert!(record.features.is_empty());
        assert!(record.sequence.is_empty());
        assert!(record.annotations.is_empty());
    }

    #[test]
    fn test_split_records() {
        let text = format!("{MINIMAL}{MINIMAL}\n\n");
        let chunks = split_records(&text);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.trim_end().ends_with("//")));

        let unterminated = format!("{MINIMAL}LOCUS tail");
        assert_eq!(split_records(&unterminated).len(), 2);
        assert!(split_records("").is_empty());
    }

    #[test]
    fn test_parse_records_preserves_order() {
        let second = MINIMAL.replace("LOCUS test", "LOCUS other");
        let text = format!("{MINIMAL}{second}");
        let records = parse_records(&text).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["test", "other"]);

        let parallel = parse_records_parallel(&text).unwrap();
        assert_eq!(parallel, records);
    }

    #[test]
    fn test_parse_records_lenient_keeps_going() {
        let broken = MINIMAL.replace(" gene 1..10", " gene join(");
        let text = format!("{MINIMAL}{broken}{MINIMAL}");
        let results = parse_records_lenient(&text).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());

        assert!(parse_records(&text).is_err());
    }

    #[test]
    fn test_parse_file_plain_and_gzipped() {
        let dir = tempfile::tempdir().unwrap();

        let plain = dir.path().join("test.gb");
        std::fs::write(&plain, MINIMAL).unwrap();
        assert_eq!(parse_file(&plain).unwrap().len(), 1);

        let gz = dir.path().join("test.gb.gz");
        let mut encoder = GzEncoder::new(std::fs::File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(MINIMAL.as_bytes()).unwrap();
        encoder.finish().unwrap();
        assert_eq!(parse_file(&gz).unwrap()[0].sequence, "acgtacgtac");
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            parse_file(Path::new("/nonexistent/file.gb")),
            Err(ParseError::Io(_))
        ));
    }
}
