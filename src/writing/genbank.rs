//! GenBank serializer.
//!
//! Column layout:
//!
//! ```text
//! LOCUS       name                    size bp ds-DNA     linear   DIV DD-MMM-YYYY
//! DEFINITION  annotation text
//!             continued at column 12
//! FEATURES             Location/Qualifiers
//!      key             location wrapped at columns 21-80
//!                      /qualifier="value"
//! ORIGIN
//!         1 acgtacgtac acgtacgtac acgtacgtac acgtacgtac acgtacgtac acgtacgtac
//! //
//! ```
//!
//! The output is laid out so that parsing it again gives back an equal
//! record. Quoted values are therefore only broken at single spaces, and a
//! run with no such space is written on one long line.

use std::io::Write;

use tracing::warn;

use crate::core::feature::{Feature, QualifierValue, Span};
use crate::core::record::Record;
use crate::core::types::Strand;
use crate::parsing::qualifier::QUALIFIER_INDENT;
use crate::parsing::section::section_name;

/// Column where generic-section text starts
const SECTION_INDENT: usize = 12;

/// Bases per ORIGIN group, and groups per row
const GROUP_LEN: usize = 10;
const GROUPS_PER_ROW: usize = 6;

/// Section names the writer produces itself
const RESERVED_SECTIONS: [&str; 3] = ["LOCUS", "FEATURES", "ORIGIN"];

/// Layout options for [`to_genbank_with`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Qualifiers written as `/name=value` instead of `/name="value"`
    pub unquoted_qualifiers: Vec<String>,

    /// Column at which feature lines wrap
    pub line_width: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            unquoted_qualifiers: ["ApEinfo_label", "ApEinfo_fwdcolor", "ApEinfo_revcolor", "label"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            line_width: 80,
        }
    }
}

impl WriterConfig {
    fn is_unquoted(&self, name: &str) -> bool {
        self.unquoted_qualifiers.iter().any(|q| q == name)
    }

    fn wrap_width(&self) -> usize {
        self.line_width.saturating_sub(QUALIFIER_INDENT).max(1)
    }
}

/// Render a record with the default layout
#[must_use]
pub fn to_genbank(record: &Record) -> String {
    to_genbank_with(record, &WriterConfig::default())
}

/// Render a record as GenBank text, ending with its `//` line.
///
/// Spans must have `start <= end`.
#[must_use]
pub fn to_genbank_with(record: &Record, config: &WriterConfig) -> String {
    let mut out = format_locus_line(record);

    for (name, text) in &record.annotations {
        out.push_str(&format_section(name, text));
    }

    out.push_str("FEATURES             Location/Qualifiers\n");
    for feature in &record.features {
        out.push_str(&format_feature(feature, config));
    }

    out.push_str("ORIGIN\n");
    out.push_str(&format_origin(&record.sequence));
    out.push_str("//\n");
    out
}

/// Write records one after another
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_records<W: Write>(
    writer: &mut W,
    records: &[Record],
    config: &WriterConfig,
) -> std::io::Result<()> {
    for record in records {
        writer.write_all(to_genbank_with(record, config).as_bytes())?;
    }
    writer.flush()
}

/// The LOCUS line, newline included
#[must_use]
pub fn format_locus_line(record: &Record) -> String {
    let name = format!("{:<24}", record.name);
    let size = format!("{:>4}", record.size);
    // A 24-character name would otherwise run into a 4-digit size
    let separator = if name.ends_with(' ') || size.starts_with(' ') {
        ""
    } else {
        " "
    };

    format!(
        "LOCUS       {name}{separator}{size} bp {}{:<4}    {:<8} {} {}\n",
        record.strand_prefix,
        record.seq_kind,
        record.topology.as_str(),
        record.division_code,
        record.date,
    )
}

/// Location text for spans and a strand, the inverse of location parsing
#[must_use]
pub fn format_location(spans: &[Span], strand: Strand) -> String {
    let joined = spans
        .iter()
        .map(|span| {
            debug_assert!(span.start <= span.end, "span start after end: {span:?}");
            format!("{}..{}", span.start, span.end)
        })
        .collect::<Vec<_>>()
        .join(",");

    let location = if spans.len() > 1 {
        format!("join({joined})")
    } else {
        joined
    };

    match strand {
        Strand::Forward => location,
        Strand::Reverse => format!("complement({location})"),
    }
}

/// Numbered sequence rows; empty for an empty sequence
#[must_use]
pub fn format_origin(sequence: &str) -> String {
    let bytes = sequence.as_bytes();
    let row_len = GROUP_LEN * GROUPS_PER_ROW;
    let mut out = String::with_capacity(sequence.len() * 11 / 10 + sequence.len() / row_len * 10);

    for (row, chunk) in bytes.chunks(row_len).enumerate() {
        out.push_str(&format!("{:>9}", row * row_len + 1));
        for group in chunk.chunks(GROUP_LEN) {
            out.push(' ');
            out.push_str(&String::from_utf8_lossy(group));
        }
        out.push('\n');
    }
    out
}

fn format_section(name: &str, text: &str) -> String {
    if RESERVED_SECTIONS.contains(&name) || section_name(name) != Some(name) {
        warn!(section = name, "Not writing annotation with this name");
        return String::new();
    }

    let mut lines = text.lines();
    let first = lines.next().unwrap_or("");
    let width = SECTION_INDENT;
    let mut out = if name.len() < width {
        format!("{name:<width$}{first}")
    } else {
        format!("{name} {first}")
    };
    out.truncate(out.trim_end().len());
    out.push('\n');

    for line in lines {
        out.push_str(&" ".repeat(SECTION_INDENT));
        out.push_str(line);
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out
}

fn format_feature(feature: &Feature, config: &WriterConfig) -> String {
    let gutter = QUALIFIER_INDENT - 5;
    let mut out = if feature.kind.len() < gutter {
        format!("     {:<gutter$}", feature.kind)
    } else {
        format!("     {} ", feature.kind)
    };

    // Keys of 16 or more characters push the location past column 21
    let first_width = config.line_width.saturating_sub(out.chars().count()).max(1);
    let location = format_location(&feature.location, feature.strand);
    push_lines(
        &mut out,
        &hard_wrap(&location, first_width, config.wrap_width()),
        true,
    );

    for (name, value) in &feature.qualifiers {
        let lines = match value {
            QualifierValue::Flag => vec![format!("/{name}")],
            QualifierValue::Integer(n) if config.is_unquoted(name) => vec![format!("/{name}={n}")],
            QualifierValue::Integer(n) => vec![format!("/{name}=\"{n}\"")],
            QualifierValue::Text(text) if config.is_unquoted(name) => {
                let rendered = format!("/{name}={text}");
                let width = config.wrap_width();
                to_owned_lines(&hard_wrap(&rendered, width, width))
            }
            QualifierValue::Text(text) => {
                let rendered = format!("/{name}=\"{}\"", text.replace('"', "\"\""));
                to_owned_lines(&word_wrap(&rendered, config.wrap_width()))
            }
        };
        push_lines(&mut out, &lines, false);
    }
    out
}

fn to_owned_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| (*l).to_string()).collect()
}

/// Append lines at the qualifier indent; the first may continue the
/// current line instead
fn push_lines<S: AsRef<str>>(out: &mut String, lines: &[S], continue_first: bool) {
    for (i, line) in lines.iter().enumerate() {
        if i > 0 || !continue_first {
            out.push_str(&" ".repeat(QUALIFIER_INDENT));
        }
        out.push_str(line.as_ref());
        out.push('\n');
    }
}

/// Byte offset of the `n`th character, or the length if there are fewer
fn char_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

/// Split into chunks of at most `first_width` characters for the first line
/// and `width` after that, concatenated back verbatim by the parser.
///
/// A chunk never ends with whitespace, and the next one never starts with
/// `/` after any leading whitespace, since the parser would drop the first
/// and read the second as a new qualifier.
fn hard_wrap(text: &str, first_width: usize, width: usize) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    let mut limit = first_width;

    while rest.chars().count() > limit {
        let mut cut = char_offset(rest, limit);
        while rest[..cut].ends_with(char::is_whitespace)
            || rest[cut..].trim_start().starts_with('/')
        {
            match rest[..cut].char_indices().next_back() {
                Some((i, _)) if i > 0 => cut = i,
                _ => break,
            }
        }
        lines.push(&rest[..cut]);
        rest = &rest[cut..];
        limit = width;
    }

    lines.push(rest);
    lines
}

/// Whether the parser would turn a line break at `i` back into this space
fn is_break_point(text: &str, i: usize) -> bool {
    let bytes = text.as_bytes();
    bytes[i] == b' ' && i > 0 && bytes[i - 1] != b' ' && bytes.get(i + 1).is_some_and(|&b| b != b' ')
}

/// Break at single spaces so lines fit in `width` where possible
fn word_wrap(text: &str, width: usize) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while rest.chars().count() > width {
        let limit = char_offset(rest, width);
        let breaks: Vec<usize> = rest
            .match_indices(' ')
            .map(|(i, _)| i)
            .filter(|&i| is_break_point(rest, i))
            .collect();

        let cut = breaks
            .iter()
            .rev()
            .find(|&&i| i <= limit)
            .or_else(|| breaks.first())
            .copied();

        match cut {
            Some(i) => {
                lines.push(&rest[..i]);
                rest = &rest[i + 1..];
            }
            None => break,
        }
    }

    lines.push(rest);
    lines
}
