use serde::{Deserialize, Serialize};

/// Orientation of a feature relative to the recorded sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl Strand {
    /// Numeric form used in jseq documents (`1` or `-1`)
    #[must_use]
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }
}

impl From<Strand> for i8 {
    fn from(strand: Strand) -> Self {
        strand.as_i8()
    }
}

impl TryFrom<i8> for Strand {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Forward),
            -1 => Ok(Self::Reverse),
            other => Err(format!("strand must be 1 or -1, got {other}")),
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

/// Molecule topology from the LOCUS line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    #[default]
    Linear,
    Circular,
}

impl Topology {
    /// Parse a topology token, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("linear") {
            Some(Self::Linear)
        } else if s.eq_ignore_ascii_case("circular") {
            Some(Self::Circular)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Circular => "circular",
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strandedness prefix of the molecule type (`ds-DNA`, `ss-RNA`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StrandPrefix {
    #[default]
    #[serde(rename = "ds-")]
    Double,
    #[serde(rename = "ss-")]
    Single,
    #[serde(rename = "ms-")]
    Mixed,
}

impl StrandPrefix {
    pub const ALL: [Self; 3] = [Self::Double, Self::Single, Self::Mixed];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Double => "ds-",
            Self::Single => "ss-",
            Self::Mixed => "ms-",
        }
    }

    /// Split a molecule token such as `ss-RNA` into its prefix and kind.
    ///
    /// Tokens without a recognised prefix keep their full text as the kind and
    /// get the default `ds-` prefix.
    pub fn split(token: &str) -> (Self, &str) {
        for prefix in Self::ALL {
            if let Some(kind) = token.strip_prefix(prefix.as_str()) {
                return (prefix, kind);
            }
        }
        (Self::default(), token)
    }
}

impl std::fmt::Display for StrandPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
