//! Tolerant parsers for GenBank flat files.
//!
//! Each grammar lives in its own module:
//!
//! - **locus**: the LOCUS header line, with fallbacks for known tool quirks
//! - **location**: `complement(join(1..10,20..30))` style expressions
//! - **qualifier**: `/name=value` annotations on a feature
//! - **features**: the FEATURES table
//! - **section**: generic sections such as DEFINITION or COMMENT
//! - **origin**: the ORIGIN sequence block
//! - **genbank**: the record assembler tying them together
//!
//! ## Example
//!
//! ```rust
//! use jseq::parsing::genbank::parse_record;
//!
//! let text = "LOCUS test 10 bp DNA linear SYN 01-JAN-2000\n\
//!             FEATURES Location/Qualifiers\n \
//!             gene 1..10\n \
//!             /label=\"x\"\n\
//!             ORIGIN\n \
//!             1 acgtacgtac\n\
//!             //\n";
//! let record = parse_record(text).unwrap();
//! assert_eq!(record.features[0].kind, "gene");
//! assert_eq!(record.sequence, "acgtacgtac");
//! ```
//!
//! ## Tolerated deviations
//!
//! | Input | Result |
//! |-------|--------|
//! | LOCUS without a name | empty name |
//! | LOCUS without topology | `linear` |
//! | LOCUS without division | three spaces |
//! | missing or garbled date | `19-MAR-1970` |
//! | `<` / `>` on positions | stripped |
//! | size differing from sequence length | kept as declared |

pub mod features;
pub mod genbank;
pub mod location;
pub mod locus;
pub mod origin;
pub mod qualifier;
pub mod section;
