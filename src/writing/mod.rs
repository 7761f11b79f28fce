//! Serializers for records.
//!
//! Only GenBank is written here; the JSON side lives in [`crate::jseq`].

pub mod genbank;
