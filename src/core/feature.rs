use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::core::types::Strand;

/// An inclusive, 1-based coordinate pair from a location expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u64, u64)", into = "(u64, u64)")]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    #[must_use]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Degenerate span for a lone index (`42` -> `42..42`)
    #[must_use]
    pub fn point(index: u64) -> Self {
        Self::new(index, index)
    }
}

impl From<(u64, u64)> for Span {
    fn from((start, end): (u64, u64)) -> Self {
        Self::new(start, end)
    }
}

impl From<Span> for (u64, u64) {
    fn from(span: Span) -> Self {
        (span.start, span.end)
    }
}

/// Value of a feature qualifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QualifierValue {
    /// `/codon_start=1` or `/codon_start="1"`
    Integer(i64),
    /// `/label="GFP"` or an unquoted value
    Text(String),
    /// Bare `/pseudo`
    Flag,
}

impl QualifierValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Flag)
    }
}

impl std::fmt::Display for QualifierValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Flag => write!(f, "true"),
        }
    }
}

impl From<&str> for QualifierValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for QualifierValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for QualifierValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl Serialize for QualifierValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Flag => serializer.serialize_bool(true),
        }
    }
}

impl<'de> Deserialize<'de> for QualifierValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl de::Visitor<'_> for ValueVisitor {
            type Value = QualifierValue;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an integer, a string, or true")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(QualifierValue::Integer(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i64::try_from(v)
                    .map(QualifierValue::Integer)
                    .map_err(|_| E::custom(format!("qualifier integer {v} out of range")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(QualifierValue::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(QualifierValue::Text(v))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                if v {
                    Ok(QualifierValue::Flag)
                } else {
                    Err(E::custom("flag qualifiers can only be true"))
                }
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// One entry of the FEATURES table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Feature key, e.g. `CDS`
    pub kind: String,

    /// Coordinate pairs in file order (significant for `join`)
    pub location: Vec<Span>,

    pub strand: Strand,

    /// Qualifiers in file order; order is part of equality
    pub qualifiers: Vec<(String, QualifierValue)>,
}

impl Feature {
    pub fn new(kind: impl Into<String>, location: Vec<Span>, strand: Strand) -> Self {
        Self {
            kind: kind.into(),
            location,
            strand,
            qualifiers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_qualifier(mut self, name: impl Into<String>, value: impl Into<QualifierValue>) -> Self {
        self.qualifiers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_flag(mut self, name: impl Into<String>) -> Self {
        self.qualifiers.push((name.into(), QualifierValue::Flag));
        self
    }

    /// First qualifier with the given name
    pub fn qualifier(&self, name: &str) -> Option<&QualifierValue> {
        self.qualifiers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Best human-readable name: `label`, `ApEinfo_label`, `gene`, then `product`
    pub fn label(&self) -> Option<&str> {
        ["label", "ApEinfo_label", "gene", "product"]
            .iter()
            .find_map(|name| self.qualifier(name).and_then(QualifierValue::as_text))
    }

    /// Lowest start and highest end over all spans
    pub fn bounds(&self) -> Option<Span> {
        let start = self.location.iter().map(|s| s.start).min()?;
        let end = self.location.iter().map(|s| s.end).max()?;
        Some(Span::new(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_point() {
        let span = Span::point(42);
        assert_eq!(span, Span::new(42, 42));
    }

    #[test]
    fn test_feature_qualifier_lookup() {
        let feature = Feature::new("CDS", vec![Span::new(1, 90)], Strand::Forward)
            .with_qualifier("gene", "gfp")
            .with_qualifier("codon_start", 1_i64)
            .with_flag("pseudo");

        assert_eq!(feature.qualifier("codon_start"), Some(&QualifierValue::Integer(1)));
        assert!(feature.qualifier("pseudo").is_some_and(QualifierValue::is_flag));
        assert_eq!(feature.label(), Some("gfp"));
        assert!(feature.qualifier("note").is_none());
    }

    #[test]
    fn test_feature_equality_respects_qualifier_order() {
        let a = Feature::new("gene", vec![Span::new(1, 10)], Strand::Forward)
            .with_qualifier("label", "x")
            .with_qualifier("note", "y");
        let b = Feature::new("gene", vec![Span::new(1, 10)], Strand::Forward)
            .with_qualifier("note", "y")
            .with_qualifier("label", "x");
        assert_ne!(a, b);
    }

    #[test]
    fn test_feature_bounds_over_join() {
        let feature = Feature::new(
            "CDS",
            vec![Span::new(500, 600), Span::new(1, 20)],
            Strand::Forward,
        );
        assert_eq!(feature.bounds(), Some(Span::new(1, 600)));
    }

    #[test]
    fn test_qualifier_value_json_forms() {
        let values: Vec<QualifierValue> = serde_json::from_str(r#"[12, "GFP", true]"#).unwrap();
        assert_eq!(
            values,
            vec![
                QualifierValue::Integer(12),
                QualifierValue::Text("GFP".to_string()),
                QualifierValue::Flag,
            ]
        );
        assert!(serde_json::from_str::<QualifierValue>("false").is_err());
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"[12,"GFP",true]"#);
    }
}
