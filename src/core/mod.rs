//! Core data types for parsed GenBank entries.
//!
//! - [`Record`]: one entry (LOCUS metadata, sequence, features, generic sections)
//! - [`Feature`]: one FEATURES-table entry with its location and qualifiers
//! - [`Span`]: an inclusive 1-based coordinate pair
//! - [`QualifierValue`]: integer, text, or bare flag
//! - [`Strand`], [`Topology`], [`StrandPrefix`]: small enums from the LOCUS line
//!   and location expressions
//!
//! ## Coordinates
//!
//! Spans keep GenBank's inclusive 1-based convention. Fuzzy boundary markers
//! (`<1..>200`) are dropped during parsing, so `<1..>200` and `1..200` produce
//! the same span.

pub mod feature;
pub mod record;
pub mod types;
