//! Generic top-level sections (DEFINITION, SOURCE, COMMENT, ...).
//!
//! A section starts with an all-caps word at column 0 and owns every
//! following indented line. Its text is kept verbatim apart from the
//! indentation, which is removed so each source line becomes one
//! `\n`-terminated line of text.

/// One occurrence of a generic section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericSection {
    pub name: String,
    pub text: String,
}

/// Leading run of `A-Z` on a column-0 line
#[must_use]
pub fn section_name(line: &str) -> Option<&str> {
    let len = line
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(line.len());
    (len > 0).then(|| &line[..len])
}

/// Parse a section from its header line and continuation lines.
///
/// Returns `None` if the first line does not start with a section name.
#[must_use]
pub fn parse_section(lines: &[&str]) -> Option<GenericSection> {
    let (first, rest) = lines.split_first()?;
    let name = section_name(first)?;

    let mut text = String::new();
    text.push_str(first[name.len()..].trim());
    text.push('\n');

    for line in rest.iter().filter(|l| !l.trim().is_empty()) {
        text.push_str(line.trim_start_matches([' ', '\t']).trim_end());
        text.push('\n');
    }

    Some(GenericSection {
        name: name.to_string(),
        text,
    })
}

/// Fold sections into name/text pairs, concatenating repeated names.
///
/// The first occurrence fixes a name's position; later occurrences are
/// appended to its text with no separator.
#[must_use]
pub fn merge_sections(sections: impl IntoIterator<Item = GenericSection>) -> Vec<(String, String)> {
    sections
        .into_iter()
        .fold(Vec::new(), |mut merged: Vec<(String, String)>, section| {
            match merged.iter_mut().find(|(name, _)| *name == section.name) {
                Some((_, text)) => text.push_str(&section.text),
                None => merged.push((section.name, section.text)),
            }
            merged
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_section() {
        let section = parse_section(&["DEFINITION  pUC19 cloning vector."]).unwrap();
        assert_eq!(section.name, "DEFINITION");
        assert_eq!(section.text, "pUC19 cloning vector.\n");
    }

    #[test]
    fn test_continuation_lines_are_dedented() {
        let section = parse_section(&[
            "SOURCE      synthetic DNA construct",
            "  ORGANISM  synthetic DNA construct",
            "            other sequences.  ",
        ])
        .unwrap();
        assert_eq!(
            section.text,
            "synthetic DNA construct\nORGANISM  synthetic DNA construct\nother sequences.\n"
        );
    }

    #[test]
    fn test_not_a_section() {
        assert!(parse_section(&["lowercase text"]).is_none());
        assert!(parse_section(&["  INDENTED"]).is_none());
        assert!(parse_section(&[]).is_none());
    }

    #[test]
    fn test_name_is_leading_capitals() {
        let section = parse_section(&["BASE COUNT  10 a"]).unwrap();
        assert_eq!(section.name, "BASE");
        assert_eq!(section.text, "COUNT  10 a\n");
    }

    #[test]
    fn test_repeated_sections_concatenate_without_separator() {
        let sections = vec![
            parse_section(&["COMMENT     first"]).unwrap(),
            parse_section(&["DEFINITION  def"]).unwrap(),
            parse_section(&["COMMENT     second", "            more"]).unwrap(),
        ];
        let merged = merge_sections(sections);
        assert_eq!(
            merged,
            vec![
                ("COMMENT".to_string(), "first\nsecond\nmore\n".to_string()),
                ("DEFINITION".to_string(), "def\n".to_string()),
            ]
        );
    }
}
