//! Parser for the LOCUS header line.
//!
//! Different tools write LOCUS lines differently, so the line is matched
//! against an ordered list of alternative grammars and the first one that
//! matches wins, even if a later one would also match:
//!
//! 1. [`LocusVariant::WellFormed`]: `LOCUS name size bp type topology [div] date`
//! 2. [`LocusVariant::MissingName`]: as 1 without a name (older ApE output)
//! 3. [`LocusVariant::MissingTopology`]: topology optional, defaults to linear
//! 4. [`LocusVariant::MissingDate`]: division mandatory, date optional
//!
//! Tokens are matched as prefixes of the remaining text after skipping
//! whitespace, and text after the last field is ignored.

use tracing::debug;

use crate::core::record::{DEFAULT_DATE, DEFAULT_DIVISION};
use crate::core::types::{StrandPrefix, Topology};
use crate::utils::validation::genbank_date_len;

/// Which alternative grammar accepted a LOCUS line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocusVariant {
    WellFormed,
    MissingName,
    MissingTopology,
    MissingDate,
}

/// Fields of a LOCUS line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocusLine {
    pub name: String,
    pub size: u64,
    pub seq_kind: String,
    pub strand_prefix: StrandPrefix,
    pub topology: Topology,
    pub division_code: String,
    pub date: String,
}

type Alternative = fn(&mut Scanner<'_>) -> Option<LocusLine>;

const ALTERNATIVES: [(LocusVariant, Alternative); 4] = [
    (LocusVariant::WellFormed, well_formed),
    (LocusVariant::MissingName, missing_name),
    (LocusVariant::MissingTopology, missing_topology),
    (LocusVariant::MissingDate, missing_date),
];

/// Parse a LOCUS line with the first alternative grammar that accepts it
pub fn parse_locus(line: &str) -> Option<(LocusVariant, LocusLine)> {
    ALTERNATIVES.iter().find_map(|(variant, grammar)| {
        let mut scanner = Scanner::new(line);
        grammar(&mut scanner).map(|locus| {
            debug!(variant = ?variant, name = %locus.name, "Parsed LOCUS line");
            (*variant, locus)
        })
    })
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_().\\".contains(c)
}

fn is_seqtype_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '-'
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn literal(&mut self, expected: &str) -> Option<()> {
        self.skip_whitespace();
        self.rest().starts_with(expected).then(|| self.pos += expected.len())
    }

    fn caseless(&mut self, expected: &str) -> Option<()> {
        self.skip_whitespace();
        let candidate = self.rest().get(..expected.len())?;
        candidate
            .eq_ignore_ascii_case(expected)
            .then(|| self.pos += expected.len())
    }

    fn word(&mut self, accept: fn(char) -> bool) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest.find(|c: char| !accept(c)).unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    fn topology(&mut self) -> Option<Topology> {
        let start = self.pos;
        if self.caseless("linear").is_some() {
            return Some(Topology::Linear);
        }
        self.pos = start;
        if self.caseless("circular").is_some() {
            return Some(Topology::Circular);
        }
        self.pos = start;
        None
    }

    fn date(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = genbank_date_len(rest)?;
        self.pos += len;
        Some(&rest[..len])
    }

    /// Run `f`, rewinding if it does not match
    fn optional<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.pos;
        let result = f(self);
        if result.is_none() {
            self.pos = start;
        }
        result
    }
}

/// `name size bp seqtype` shared by every alternative, name optional
fn size_and_type(s: &mut Scanner<'_>, with_name: bool) -> Option<(String, u64, String)> {
    s.literal("LOCUS")?;
    let name = if with_name {
        s.word(is_name_char)?.to_string()
    } else {
        String::new()
    };
    let size = s.word(|c| c.is_ascii_digit())?.parse().ok()?;
    s.caseless("bp")?;
    let seqtype = s.word(is_seqtype_char)?.to_string();
    Some((name, size, seqtype))
}

fn build(
    (name, size, seqtype): (String, u64, String),
    topology: Topology,
    division: Option<&str>,
    date: &str,
) -> LocusLine {
    let (strand_prefix, seq_kind) = StrandPrefix::split(&seqtype);
    LocusLine {
        name,
        size,
        seq_kind: seq_kind.to_string(),
        strand_prefix,
        topology,
        division_code: division.map_or_else(|| DEFAULT_DIVISION.to_string(), str::to_string),
        date: date.to_string(),
    }
}

fn well_formed(s: &mut Scanner<'_>) -> Option<LocusLine> {
    let head = size_and_type(s, true)?;
    let topology = s.topology()?;
    let division = s.optional(|s| s.word(|c| c.is_ascii_alphabetic()));
    let date = s.date()?;
    Some(build(head, topology, division, date))
}

fn missing_name(s: &mut Scanner<'_>) -> Option<LocusLine> {
    let head = size_and_type(s, false)?;
    let topology = s.topology()?;
    let division = s.optional(|s| s.word(|c| c.is_ascii_alphabetic()));
    let date = s.date()?;
    Some(build(head, topology, division, date))
}

fn missing_topology(s: &mut Scanner<'_>) -> Option<LocusLine> {
    let head = size_and_type(s, true)?;
    let topology = s.optional(Scanner::topology).unwrap_or_default();
    let division = s.optional(|s| s.word(|c| c.is_ascii_alphabetic()));
    let date = s.date()?;
    Some(build(head, topology, division, date))
}

fn missing_date(s: &mut Scanner<'_>) -> Option<LocusLine> {
    let head = size_and_type(s, true)?;
    let topology = s.optional(Scanner::topology).unwrap_or_default();
    let division = s.word(|c| c.is_ascii_alphabetic())?;
    let date = s.optional(Scanner::date).unwrap_or(DEFAULT_DATE);
    Some(build(head, topology, Some(division), date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> (LocusVariant, LocusLine) {
        parse_locus(line).unwrap()
    }

    #[test]
    fn test_well_formed() {
        let (variant, locus) =
            parse("LOCUS       pUC19                   2686 bp ds-DNA     circular SYN 01-JAN-2000");
        assert_eq!(variant, LocusVariant::WellFormed);
        assert_eq!(locus.name, "pUC19");
        assert_eq!(locus.size, 2686);
        assert_eq!(locus.seq_kind, "DNA");
        assert_eq!(locus.strand_prefix, StrandPrefix::Double);
        assert_eq!(locus.topology, Topology::Circular);
        assert_eq!(locus.division_code, "SYN");
        assert_eq!(locus.date, "01-JAN-2000");
    }

    #[test]
    fn test_well_formed_without_division() {
        let (variant, locus) = parse("LOCUS test 10 bp DNA linear 01-JAN-2000");
        assert_eq!(variant, LocusVariant::WellFormed);
        assert_eq!(locus.division_code, "   ");
    }

    #[test]
    fn test_caseless_topology_and_unit() {
        let (_, locus) = parse("LOCUS test 10 BP mRNA CIRCULAR SYN 01-JAN-2000");
        assert_eq!(locus.topology, Topology::Circular);
        assert_eq!(locus.seq_kind, "mRNA");
    }

    #[test]
    fn test_missing_name() {
        let (variant, locus) = parse("LOCUS       5741 bp    DNA   linear   SYN 12-AUG-2013");
        assert_eq!(variant, LocusVariant::MissingName);
        assert_eq!(locus.name, "");
        assert_eq!(locus.size, 5741);
    }

    #[test]
    fn test_missing_topology() {
        let (variant, locus) = parse("LOCUS       YEplac181\t5741 bp \tDNA\tSYN 12-AUG-2013");
        assert_eq!(variant, LocusVariant::MissingTopology);
        assert_eq!(locus.topology, Topology::Linear);
        assert_eq!(locus.division_code, "SYN");
    }

    #[test]
    fn test_missing_topology_and_division() {
        let (variant, locus) = parse("LOCUS       YEplac181 5741 bp DNA 12-AUG-2013");
        assert_eq!(variant, LocusVariant::MissingTopology);
        assert_eq!(locus.division_code, "   ");
    }

    #[test]
    fn test_missing_date() {
        let (variant, locus) = parse("LOCUS       YEplac181\t5741 bp \tDNA\tSYN");
        assert_eq!(variant, LocusVariant::MissingDate);
        assert_eq!(locus.date, DEFAULT_DATE);
        assert_eq!(locus.division_code, "SYN");
    }

    #[test]
    fn test_garbled_date_defaults() {
        let (variant, locus) = parse("LOCUS x 10 bp DNA circular SYN 1-JAN-00");
        assert_eq!(variant, LocusVariant::MissingDate);
        assert_eq!(locus.date, DEFAULT_DATE);
        assert_eq!(locus.topology, Topology::Circular);
    }

    #[test]
    fn test_first_match_wins() {
        // Also acceptable to the missing-topology grammar, but the
        // well-formed grammar is tried first.
        let (variant, _) = parse("LOCUS x 10 bp DNA linear SYN 01-JAN-2000");
        assert_eq!(variant, LocusVariant::WellFormed);
    }

    #[test]
    fn test_no_alternative_matches() {
        assert!(parse_locus("LOCUS").is_none());
        assert!(parse_locus("LOCUS x ten bp DNA linear SYN 01-JAN-2000").is_none());
        assert!(parse_locus("ID   x; SV 1; linear; DNA").is_none());
        assert!(parse_locus("LOCUS 10 bp DNA SYN").is_none());
    }
}
