//! # jseq
//!
//! A tolerant GenBank flat-file parser with a JSON projection (jseq) and a
//! fixed-column GenBank writer.
//!
//! Plasmid editors and older tools write GenBank files that strict parsers
//! reject: LOCUS lines without a name, topology or date, long labels without
//! quotes, sizes that disagree with the sequence. `jseq` accepts these,
//! fills in defaults, and writes records back in a layout that parses to the
//! same record again.
//!
//! ## Features
//!
//! - **Tolerant LOCUS parsing**: ordered fallback grammars for known tool quirks
//! - **Location expressions**: nested `complement`/`join`, fuzzy ends stripped
//! - **Lossless JSON**: record, feature, and qualifier order preserved
//! - **Round-trip writer**: `parse(write(r)) == r` for parsed records
//! - **Multi-record buffers**: sequential, lenient, or parallel parsing
//!
//! ## Example
//!
//! ```rust
//! use jseq::{parse_record, to_genbank, Strand};
//!
//! let text = "LOCUS       demo 12 bp DNA circular SYN 01-JAN-2000\n\
//!             FEATURES             Location/Qualifiers\n\
//!             \x20    CDS             complement(join(1..3,7..12))\n\
//!             \x20                    /gene=\"abc\"\n\
//!             ORIGIN\n\
//!             \x20       1 acgtacgtac gt\n\
//!             //\n";
//!
//! let record = parse_record(text).unwrap();
//! assert_eq!(record.features[0].strand, Strand::Reverse);
//!
//! let json = jseq::jseq::to_json(&[record.clone()]).unwrap();
//! let back = jseq::jseq::from_json(&json).unwrap();
//! assert_eq!(back[0], record);
//!
//! assert_eq!(parse_record(&to_genbank(&record)).unwrap(), record);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Records, features, and their field types
//! - [`parsing`]: The GenBank grammars and record assembler
//! - [`writing`]: The GenBank serializer
//! - [`jseq`]: The JSON projection
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod jseq;
pub mod parsing;
pub mod utils;
pub mod writing;

// Re-export commonly used types for convenience
pub use crate::core::feature::{Feature, QualifierValue, Span};
pub use crate::core::record::Record;
pub use crate::core::types::*;
pub use crate::jseq::{from_json, to_json, JseqError, FORMAT_TAG};
pub use crate::parsing::genbank::{parse_file, parse_record, parse_records, ParseError};
pub use crate::writing::genbank::{to_genbank, to_genbank_with, WriterConfig};
