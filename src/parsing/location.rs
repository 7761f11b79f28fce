//! Parser for GenBank location expressions.
//!
//! ```text
//! location := simple | complex
//! simple   := INDEX (".." INDEX)?
//! complex  := ("complement" | "join") "(" item ("," item)* ")"
//! item     := complex | simple
//! INDEX    := [<>]* digits [<>]*
//! ```
//!
//! Expressions are first parsed into a [`LocationExpr`] tree and then
//! flattened: every leaf span is collected in file order, and the strand is
//! reverse if `complement` appears anywhere in the tree. A `join` that mixes
//! forward and complemented parts therefore reports a single reverse strand
//! for all of its spans.

use thiserror::Error;

use crate::core::feature::Span;
use crate::core::types::Strand;

/// Nesting limit for `complement(join(...))` chains (DOS protection)
pub const MAX_NESTING_DEPTH: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason} at position {position}")]
pub struct LocationError {
    /// Character offset into the whitespace-free expression
    pub position: usize,
    pub reason: String,
}

/// Parsed location expression before flattening
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationExpr {
    Span(Span),
    Complement(Vec<LocationExpr>),
    Join(Vec<LocationExpr>),
}

/// A flattened location: spans in file order plus one strand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub spans: Vec<Span>,
    pub strand: Strand,
}

impl LocationExpr {
    /// Collect leaf spans in order and derive the strand
    #[must_use]
    pub fn flatten(&self) -> Location {
        let mut spans = Vec::new();
        let mut complemented = false;
        self.visit(&mut spans, &mut complemented);

        Location {
            spans,
            strand: if complemented {
                Strand::Reverse
            } else {
                Strand::Forward
            },
        }
    }

    fn visit(&self, spans: &mut Vec<Span>, complemented: &mut bool) {
        match self {
            Self::Span(span) => spans.push(*span),
            Self::Complement(children) => {
                *complemented = true;
                for child in children {
                    child.visit(spans, complemented);
                }
            }
            Self::Join(children) => {
                for child in children {
                    child.visit(spans, complemented);
                }
            }
        }
    }
}

/// Parse and flatten a location expression.
///
/// Whitespace anywhere in the text is ignored, so a location that was wrapped
/// across several lines can be passed as-is.
///
/// # Errors
///
/// Returns `LocationError` if the text is not a complete location expression
/// or a span has its start after its end.
pub fn parse_location(text: &str) -> Result<Location, LocationError> {
    parse_expression(text).map(|expr| expr.flatten())
}

/// Parse a location expression into its tree form
///
/// # Errors
///
/// Returns `LocationError` on any syntax error or trailing input.
pub fn parse_expression(text: &str) -> Result<LocationExpr, LocationError> {
    let compact: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(LocationError {
            position: 0,
            reason: "empty location".to_string(),
        });
    }

    let mut parser = ExprParser {
        chars: &compact,
        pos: 0,
    };
    let expr = parser.item(0)?;

    if parser.pos < compact.len() {
        return Err(parser.error(format!(
            "unexpected '{}' after location",
            compact[parser.pos]
        )));
    }

    Ok(expr)
}

struct ExprParser<'a> {
    chars: &'a [char],
    pos: usize,
}

impl ExprParser<'_> {
    fn error(&self, reason: impl Into<String>) -> LocationError {
        LocationError {
            position: self.pos,
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn starts_with(&self, keyword: &str) -> bool {
        let rest = &self.chars[self.pos..];
        keyword.chars().count() <= rest.len() && keyword.chars().zip(rest).all(|(a, &b)| a == b)
    }

    fn expect(&mut self, c: char) -> Result<(), LocationError> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}'")))
        }
    }

    fn item(&mut self, depth: usize) -> Result<LocationExpr, LocationError> {
        if self.starts_with("complement") {
            self.pos += "complement".len();
            self.operator(depth).map(LocationExpr::Complement)
        } else if self.starts_with("join") {
            self.pos += "join".len();
            self.operator(depth).map(LocationExpr::Join)
        } else {
            self.simple().map(LocationExpr::Span)
        }
    }

    fn operator(&mut self, depth: usize) -> Result<Vec<LocationExpr>, LocationError> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(self.error(format!(
                "location nested deeper than {MAX_NESTING_DEPTH} levels"
            )));
        }

        self.expect('(')?;
        let mut children = vec![self.item(depth + 1)?];
        while self.peek() == Some(',') {
            self.pos += 1;
            children.push(self.item(depth + 1)?);
        }
        self.expect(')')?;

        Ok(children)
    }

    fn simple(&mut self) -> Result<Span, LocationError> {
        let start_pos = self.pos;
        let start = self.index()?;

        if self.starts_with("..") {
            self.pos += 2;
            let end = self.index()?;
            if start > end {
                return Err(LocationError {
                    position: start_pos,
                    reason: format!("span start {start} is after end {end}"),
                });
            }
            Ok(Span::new(start, end))
        } else {
            Ok(Span::point(start))
        }
    }

    /// Digits with optional `<`/`>` fuzzy markers, which are discarded
    fn index(&mut self) -> Result<u64, LocationError> {
        let begin = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '<' || c == '>') {
            self.pos += 1;
        }

        let digits: String = self.chars[begin..self.pos]
            .iter()
            .filter(|c| c.is_ascii_digit())
            .collect();

        if digits.is_empty() {
            self.pos = begin;
            return Err(self.error("expected a position"));
        }

        digits.parse().map_err(|_| LocationError {
            position: begin,
            reason: format!("position '{digits}' is out of range"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_range() {
        let loc = parse_location("23..88").unwrap();
        assert_eq!(loc.spans, vec![Span::new(23, 88)]);
        assert_eq!(loc.strand, Strand::Forward);
    }

    #[test]
    fn test_single_index_is_degenerate_span() {
        let loc = parse_location("42").unwrap();
        assert_eq!(loc.spans, vec![Span::new(42, 42)]);
        assert_eq!(loc.strand, Strand::Forward);
    }

    #[test]
    fn test_fuzzy_markers_are_stripped() {
        let loc = parse_location("<454..>999").unwrap();
        assert_eq!(loc.spans, vec![Span::new(454, 999)]);
    }

    #[test]
    fn test_complement_join_flattens_in_order() {
        let loc = parse_location("complement(join(23..343,454..666,777..999))").unwrap();
        assert_eq!(
            loc.spans,
            vec![Span::new(23, 343), Span::new(454, 666), Span::new(777, 999)]
        );
        assert_eq!(loc.strand, Strand::Reverse);
    }

    #[test]
    fn test_join_order_is_not_sorted() {
        let loc = parse_location("join(5000..5100,1..10)").unwrap();
        assert_eq!(loc.spans, vec![Span::new(5000, 5100), Span::new(1, 10)]);
    }

    #[test]
    fn test_join_of_complements() {
        let loc = parse_location("join(complement(34..123),complement(333..565))").unwrap();
        assert_eq!(loc.spans, vec![Span::new(34, 123), Span::new(333, 565)]);
        assert_eq!(loc.strand, Strand::Reverse);
    }

    #[test]
    fn test_mixed_join_reports_single_reverse_strand() {
        let loc = parse_location("join(1..10,complement(20..30))").unwrap();
        assert_eq!(loc.spans, vec![Span::new(1, 10), Span::new(20, 30)]);
        assert_eq!(loc.strand, Strand::Reverse);
    }

    #[test]
    fn test_single_element_join() {
        let expr = parse_expression("join(5..9)").unwrap();
        assert_eq!(expr, LocationExpr::Join(vec![LocationExpr::Span(Span::new(5, 9))]));
        assert_eq!(expr.flatten().spans, vec![Span::new(5, 9)]);
    }

    #[test]
    fn test_tree_keeps_nesting() {
        let expr = parse_expression("complement(join(1..2,3..4))").unwrap();
        assert_eq!(
            expr,
            LocationExpr::Complement(vec![LocationExpr::Join(vec![
                LocationExpr::Span(Span::new(1, 2)),
                LocationExpr::Span(Span::new(3, 4)),
            ])])
        );
    }

    #[test]
    fn test_wrapped_location_whitespace_ignored() {
        let loc = parse_location("join(1..10,\n                     20..30)").unwrap();
        assert_eq!(loc.spans, vec![Span::new(1, 10), Span::new(20, 30)]);
    }

    #[test]
    fn test_malformed_locations() {
        assert!(parse_location("").is_err());
        assert!(parse_location("join(1..10").is_err());
        assert!(parse_location("join()").is_err());
        assert!(parse_location("order(1..10,20..30)").is_err());
        assert!(parse_location("45.48").is_err());
        assert!(parse_location("12^13").is_err());
        assert!(parse_location("<>..10").is_err());
    }

    #[test]
    fn test_reversed_span_rejected() {
        let err = parse_location("join(1..10,30..20)").unwrap_err();
        assert!(err.reason.contains("after end"));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1..2{}", "join(".repeat(100), ")".repeat(100));
        let err = parse_location(&deep).unwrap_err();
        assert!(err.reason.contains("nested deeper"));
    }
}
