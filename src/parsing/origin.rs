//! Parser for the ORIGIN sequence block.
//!
//! Each row is a position number followed by one or more groups of bases.
//! The position numbers are not checked against the running length.

use crate::parsing::genbank::ParseError;
use crate::utils::validation::is_sequence_word;

/// Parse the rows following an `ORIGIN` line into a sequence.
///
/// `first_line` is the 1-based line number of `lines[0]`.
///
/// # Errors
///
/// Returns `ParseError::SectionSyntax` if a row does not start with a number
/// or contains characters outside `ACGTNacgtn`.
pub fn parse_origin(lines: &[&str], first_line: usize) -> Result<String, ParseError> {
    let mut sequence = String::new();

    for (offset, line) in lines.iter().enumerate() {
        let mut words = line.split_whitespace();
        let Some(position) = words.next() else {
            continue;
        };

        let line_number = first_line + offset;
        if !position.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseError::SectionSyntax {
                line: line_number,
                reason: format!("sequence row must start with a position, found '{position}'"),
            });
        }

        for word in words {
            if !is_sequence_word(word) {
                return Err(ParseError::SectionSyntax {
                    line: line_number,
                    reason: format!("invalid bases '{word}' in sequence"),
                });
            }
            sequence.push_str(word);
        }
    }

    Ok(sequence)
}
