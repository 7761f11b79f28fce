use chrono::NaiveDate;

use crate::core::feature::Feature;
use crate::core::types::{StrandPrefix, Topology};

/// Date used when a LOCUS line has no usable date
pub const DEFAULT_DATE: &str = "19-MAR-1970";

/// Division code used when a LOCUS line has none
pub const DEFAULT_DIVISION: &str = "   ";

/// One parsed GenBank entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Locus name, empty when the LOCUS line had none
    pub name: String,

    /// Declared length from the LOCUS line. Advisory only: it is kept as
    /// written even when it disagrees with `sequence.len()`.
    pub size: u64,

    /// Molecule type without the strandedness prefix, e.g. `DNA`
    pub seq_kind: String,

    pub strand_prefix: StrandPrefix,

    pub topology: Topology,

    pub division_code: String,

    /// `DD-MMM-YYYY`
    pub date: String,

    pub sequence: String,

    pub features: Vec<Feature>,

    /// Generic sections keyed by name, in order of first occurrence
    pub annotations: Vec<(String, String)>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            seq_kind: "DNA".to_string(),
            strand_prefix: StrandPrefix::default(),
            topology: Topology::default(),
            division_code: DEFAULT_DIVISION.to_string(),
            date: DEFAULT_DATE.to_string(),
            sequence: String::new(),
            features: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Set the sequence and make `size` agree with it
    #[must_use]
    pub fn with_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = sequence.into();
        self.size = self.sequence.len() as u64;
        self
    }

    #[must_use]
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    #[must_use]
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    /// Replace the date with a calendar date rendered as `DD-MMM-YYYY`
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = format_genbank_date(date);
        self
    }

    /// Text of a generic section, if present
    pub fn annotation(&self, name: &str) -> Option<&str> {
        self.annotations
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Molecule token as written in jseq documents.
    ///
    /// The strand prefix is only spelled out when it is not the default, so
    /// `DNA` and `ds-DNA` both project to `DNA`.
    #[must_use]
    pub fn seqtype(&self) -> String {
        if self.strand_prefix == StrandPrefix::default() {
            self.seq_kind.clone()
        } else {
            format!("{}{}", self.strand_prefix, self.seq_kind)
        }
    }

    /// The date as a calendar date, when it is one
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%d-%b-%Y").ok()
    }

    /// Whether the declared size agrees with the sequence actually present
    #[must_use]
    pub fn size_matches_sequence(&self) -> bool {
        self.size == self.sequence.len() as u64
    }

    #[must_use]
    pub fn is_circular(&self) -> bool {
        self.topology == Topology::Circular
    }
}

/// Render a date the way LOCUS lines carry it (`05-JUN-2024`)
#[must_use]
pub fn format_genbank_date(date: NaiveDate) -> String {
    date.format("%d-%b-%Y").to_string().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seqtype_hides_default_prefix() {
        let mut record = Record::new("pUC19");
        assert_eq!(record.seqtype(), "DNA");

        record.strand_prefix = StrandPrefix::Single;
        record.seq_kind = "RNA".to_string();
        assert_eq!(record.seqtype(), "ss-RNA");
    }

    #[test]
    fn test_parsed_date() {
        let mut record = Record::new("x");
        assert_eq!(record.parsed_date(), NaiveDate::from_ymd_opt(1970, 3, 19));

        record.date = "31-FEB-2000".to_string();
        assert!(record.parsed_date().is_none());
    }

    #[test]
    fn test_with_date_formats_uppercase_month() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let record = Record::new("x").with_date(date);
        assert_eq!(record.date, "05-JUN-2024");
    }

    #[test]
    fn test_size_is_advisory() {
        let mut record = Record::new("x").with_sequence("acgt");
        assert!(record.size_matches_sequence());

        record.size = 10;
        assert!(!record.size_matches_sequence());
        assert_eq!(record.sequence.len(), 4);
    }
}
