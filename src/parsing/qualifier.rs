//! Parser for feature qualifiers (`/name=value` and bare `/name`).
//!
//! A qualifier arrives as its first line plus any continuation lines the
//! feature table assigned to it. The value forms are tried in this order:
//!
//! 1. numeric: `/codon_start=1` or `/codon_start="1"`
//! 2. quoted: `/note="..."`, possibly spanning lines; each line break and the
//!    indentation after it become a single space
//! 3. unquoted: `/label=...`; continuation text starting at column 21 is
//!    appended without any separator
//! 4. flag: `/pseudo`
//!
//! Numeric comes first because `"12"` is also a valid quoted string.

use tracing::warn;

use crate::core::feature::QualifierValue;
use crate::parsing::genbank::ParseError;

/// Column where qualifiers and their continuation lines start
pub const QUALIFIER_INDENT: usize = 21;

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Parse one qualifier.
///
/// `first` is the line holding the `/`; `continuation` are the following
/// lines belonging to the same qualifier, untrimmed. `line` is the 1-based
/// line number of `first`, used in errors.
///
/// # Errors
///
/// Returns `ParseError::QualifierSyntax` if the text after `/` is not a
/// qualifier name optionally followed by `=`.
pub fn parse_qualifier(
    first: &str,
    continuation: &[&str],
    line: usize,
) -> Result<(String, QualifierValue), ParseError> {
    let syntax_error = || ParseError::QualifierSyntax {
        line,
        text: first.trim().to_string(),
    };

    let body = first.trim().strip_prefix('/').ok_or_else(syntax_error)?;
    let name_len = body.find(|c: char| !is_name_char(c)).unwrap_or(body.len());
    if name_len == 0 {
        return Err(syntax_error());
    }
    let (name, rest) = body.split_at(name_len);
    let rest = rest.trim_start();

    if rest.is_empty() {
        if !continuation.is_empty() {
            warn!(line, qualifier = name, "Ignoring text after flag qualifier");
        }
        return Ok((name.to_string(), QualifierValue::Flag));
    }

    let value_text = rest.strip_prefix('=').ok_or_else(syntax_error)?;

    if continuation.is_empty() {
        if let Some(n) = parse_numeric(value_text) {
            return Ok((name.to_string(), QualifierValue::Integer(n)));
        }
    }

    if let Some(quoted) = parse_quoted(value_text, continuation, line, name) {
        return Ok((name.to_string(), QualifierValue::Text(quoted)));
    }

    Ok((
        name.to_string(),
        QualifierValue::Text(parse_unquoted(value_text, continuation)),
    ))
}

/// `12` or `"12"`
fn parse_numeric(value_text: &str) -> Option<i64> {
    let v = value_text.trim();
    let digits = v
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(v);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parse_quoted(
    value_text: &str,
    continuation: &[&str],
    line: usize,
    name: &str,
) -> Option<String> {
    let opened = value_text.trim_start().strip_prefix('"')?;

    let mut joined = opened.to_string();
    for cont in continuation {
        joined.push('\n');
        joined.push_str(cont);
    }

    let close = closing_quote(&joined)?;
    let trailing = joined[close + 1..].trim();
    if !trailing.is_empty() {
        warn!(
            line,
            qualifier = name,
            trailing,
            "Ignoring text after closing quote"
        );
    }

    let content = joined[..close].replace("\"\"", "\"");
    Some(collapse_line_breaks(&content).trim().to_string())
}

fn parse_unquoted(value_text: &str, continuation: &[&str]) -> String {
    let mut value = value_text.trim_end().to_string();
    for cont in continuation {
        value.push_str(continuation_text(cont).trim_end());
    }
    value.trim().to_string()
}

/// Text of an unquoted continuation line, taken verbatim from column 21
fn continuation_text(line: &str) -> &str {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent >= QUALIFIER_INDENT {
        &line[QUALIFIER_INDENT..]
    } else {
        line.trim_start()
    }
}

/// Byte offset of the quote closing a value whose opening quote has already
/// been consumed. `""` is an escaped quote, not a close.
#[must_use]
pub fn closing_quote(s: &str) -> Option<usize> {
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '"' {
            if chars.peek().is_some_and(|&(_, next)| next == '"') {
                chars.next();
            } else {
                return Some(i);
            }
        }
    }
    None
}

/// Whether a qualifier line opens a quoted value that it does not close
#[must_use]
pub fn opens_unterminated_quote(first: &str) -> bool {
    first
        .split_once('=')
        .and_then(|(_, value)| value.trim_start().strip_prefix('"'))
        .is_some_and(|opened| closing_quote(opened).is_none())
}

/// Replace every line break followed by spaces with a single space
fn collapse_line_breaks(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut lines = s.split('\n');
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    for line in lines {
        let dedented = line.trim_start_matches(' ');
        if dedented.len() < line.len() {
            out.push(' ');
        } else {
            out.push('\n');
        }
        out.push_str(dedented);
    }
    out
}
