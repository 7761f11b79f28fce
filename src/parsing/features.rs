//! Parser for the FEATURES table.
//!
//! Lines are classified by their first non-blank character and indent:
//!
//! - starts with `/`: a new qualifier of the current feature
//! - indent below column 21: a feature key line (`gene  1..10`)
//! - indent of 21 or more: continuation of the location or of the previous
//!   qualifier
//!
//! A quoted qualifier value that is still open keeps consuming lines until
//! its closing quote, whatever they look like and however far they are
//! indented.

use crate::core::feature::Feature;
use crate::parsing::genbank::ParseError;
use crate::parsing::location::parse_location;
use crate::parsing::qualifier::{
    closing_quote, opens_unterminated_quote, parse_qualifier, QUALIFIER_INDENT,
};
use crate::utils::validation::check_feature_limit;

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_continuation(line: &str) -> bool {
    !is_blank(line)
        && indent_of(line) >= QUALIFIER_INDENT
        && !line.trim_start().starts_with('/')
}

/// Parse the lines following a `FEATURES` header.
///
/// `first_line` is the 1-based line number of `lines[0]`.
///
/// # Errors
///
/// Returns `ParseError::LocationSyntax` if any feature's location is invalid,
/// `ParseError::QualifierSyntax` for a malformed qualifier,
/// `ParseError::SectionSyntax` for a qualifier or continuation line with no
/// feature to attach to, or `ParseError::TooManyFeatures` if the limit is
/// exceeded.
pub fn parse_feature_table(lines: &[&str], first_line: usize) -> Result<Vec<Feature>, ParseError> {
    let lines: Vec<&str> = lines.iter().map(|l| l.trim_end()).collect();
    let mut features = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if is_blank(line) {
            i += 1;
            continue;
        }

        let line_number = first_line + i;
        let content = line.trim_start();

        if content.starts_with('/') || indent_of(line) >= QUALIFIER_INDENT {
            return Err(ParseError::SectionSyntax {
                line: line_number,
                reason: format!("'{content}' does not belong to any feature"),
            });
        }

        let (kind, location_head) = content
            .split_once(char::is_whitespace)
            .map_or((content, ""), |(k, rest)| (k, rest.trim()));

        let mut location_text = location_head.to_string();
        i += 1;
        while i < lines.len() && is_continuation(lines[i]) {
            location_text.push_str(lines[i].trim());
            i += 1;
        }

        let location = parse_location(&location_text).map_err(|source| {
            ParseError::LocationSyntax {
                line: line_number,
                location: location_text.clone(),
                source,
            }
        })?;

        let mut feature = Feature::new(kind, location.spans, location.strand);

        loop {
            while i < lines.len() && is_blank(lines[i]) {
                i += 1;
            }
            if i >= lines.len() || !lines[i].trim_start().starts_with('/') {
                break;
            }
            let end = qualifier_end(&lines, i);
            let qualifier = parse_qualifier(lines[i], &lines[i + 1..end], first_line + i)?;
            feature.qualifiers.push(qualifier);
            i = end;
        }

        if check_feature_limit(features.len()).is_some() {
            return Err(ParseError::TooManyFeatures(features.len()));
        }
        features.push(feature);
    }

    Ok(features)
}

/// Index one past the last line of the qualifier starting at `start`.
///
/// An open quote runs to the line holding its closing quote, whatever that
/// line's indent. If the quote is never closed the qualifier falls back to
/// ordinary continuation lines.
fn qualifier_end(lines: &[&str], start: usize) -> usize {
    if opens_unterminated_quote(lines[start]) {
        if let Some(offset) = lines[start + 1..]
            .iter()
            .position(|line| closing_quote(line).is_some())
        {
            return start + offset + 2;
        }
    }

    let mut end = start + 1;
    while end < lines.len() && is_continuation(lines[end]) {
        end += 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feature::{QualifierValue, Span};
    use crate::core::types::Strand;

    fn table(text: &str) -> Result<Vec<Feature>, ParseError> {
        let lines: Vec<&str> = text.lines().collect();
        parse_feature_table(&lines, 2)
    }

    #[test]
    fn test_single_feature_minimal_indent() {
        let features = table(" gene 1..10\n /label=\"x\"\n").unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].kind, "gene");
        assert_eq!(features[0].location, vec![Span::new(1, 10)]);
        assert_eq!(features[0].strand, Strand::Forward);
        assert_eq!(
            features[0].qualifiers,
            vec![("label".to_string(), QualifierValue::Text("x".to_string()))]
        );
    }

    #[test]
    fn test_standard_layout() {
        let text = r#"     promoter        1..20
                     /label="test promoter"
     CDS             complement(30..90)
                     /label="GFP"
                     /gene="gfp"
                     /codon_start=1
                     /pseudo
     misc_feature    50
"#;
        let features = table(text).unwrap();
        assert_eq!(features.len(), 3);

        let cds = &features[1];
        assert_eq!(cds.kind, "CDS");
        assert_eq!(cds.strand, Strand::Reverse);
        let names: Vec<&str> = cds.qualifiers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["label", "gene", "codon_start", "pseudo"]);
        assert_eq!(cds.qualifier("codon_start"), Some(&QualifierValue::Integer(1)));
        assert_eq!(cds.qualifier("pseudo"), Some(&QualifierValue::Flag));

        assert!(features[2].qualifiers.is_empty());
        assert_eq!(features[2].location, vec![Span::new(50, 50)]);
    }

    #[test]
    fn test_wrapped_location() {
        let text = "     CDS             join(1..10,20..30,\n                     40..50)\n                     /gene=\"x\"\n";
        let features = table(text).unwrap();
        assert_eq!(
            features[0].location,
            vec![Span::new(1, 10), Span::new(20, 30), Span::new(40, 50)]
        );
    }

    #[test]
    fn test_multiline_quoted_qualifier_with_slash_line() {
        let text = r#"     CDS             1..90
                     /note="see
                     /not_a_qualifier here"
                     /gene="x"
"#;
        let features = table(text).unwrap();
        assert_eq!(
            features[0].qualifier("note"),
            Some(&QualifierValue::Text("see /not_a_qualifier here".to_string()))
        );
        assert_eq!(features[0].qualifiers.len(), 2);
    }

    #[test]
    fn test_multiline_quoted_qualifier_minimal_indent() {
        let features = table(" gene 1..10\n /note=\"two\n lines\"\n /label=\"x\"\n gene 20..30\n").unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(
            features[0].qualifier("note"),
            Some(&QualifierValue::Text("two lines".to_string()))
        );
        assert_eq!(features[0].label(), Some("x"));
        assert_eq!(features[1].location, vec![Span::new(20, 30)]);
    }

    #[test]
    fn test_unclosed_quote_falls_back_to_continuation_lines() {
        let text = "     CDS             1..90\n                     /note=\"open\n                     still open\n     gene            1..10\n";
        let features = table(text).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[1].kind, "gene");
    }

    #[test]
    fn test_unquoted_label_continuation() {
        let text = "     misc_feature    1..5\n                     /label=abcdef\n                     ghij\n                     /ApEinfo_fwdcolor=#85dae9\n";
        let features = table(text).unwrap();
        assert_eq!(
            features[0].qualifier("label"),
            Some(&QualifierValue::Text("abcdefghij".to_string()))
        );
        assert_eq!(
            features[0].qualifier("ApEinfo_fwdcolor"),
            Some(&QualifierValue::Text("#85dae9".to_string()))
        );
    }

    #[test]
    fn test_bad_location_is_fatal() {
        let text = "     gene            1..10\n     gene            bogus\n";
        match table(text) {
            Err(ParseError::LocationSyntax { line, location, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(location, "bogus");
            }
            other => panic!("expected location error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_location_is_fatal() {
        assert!(matches!(
            table("     gene\n"),
            Err(ParseError::LocationSyntax { .. })
        ));
    }

    #[test]
    fn test_orphan_qualifier() {
        assert!(matches!(
            table("                     /label=\"x\"\n"),
            Err(ParseError::SectionSyntax { line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_table() {
        assert!(table("").unwrap().is_empty());
    }
}
