//! The jseq JSON projection of GenBank records.
//!
//! A jseq document is either a single record object or an array of them.
//! Writers always produce an array; readers accept both.

pub mod document;

use std::path::Path;

use thiserror::Error;

use crate::core::record::Record;
use crate::jseq::document::{record_from_value, record_to_value};

/// Value of the `__format__` key
pub const FORMAT_TAG: &str = "jseq v0.1";

#[derive(Error, Debug)]
pub enum JseqError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid jseq document: {0}")]
    Document(String),
}

/// Pretty-printed array of records
///
/// # Errors
///
/// Returns `JseqError::Json` if serialization fails.
pub fn to_json(records: &[Record]) -> Result<String, JseqError> {
    let values: Vec<_> = records.iter().map(record_to_value).collect();
    Ok(serde_json::to_string_pretty(&values)?)
}

/// Single-line array of records
///
/// # Errors
///
/// Returns `JseqError::Json` if serialization fails.
pub fn to_json_compact(records: &[Record]) -> Result<String, JseqError> {
    let values: Vec<_> = records.iter().map(record_to_value).collect();
    Ok(serde_json::to_string(&values)?)
}

/// Pretty-printed object for one record
///
/// # Errors
///
/// Returns `JseqError::Json` if serialization fails.
pub fn record_to_json(record: &Record) -> Result<String, JseqError> {
    Ok(serde_json::to_string_pretty(&record_to_value(record))?)
}

/// Read records from a jseq document holding one object or an array.
///
/// # Errors
///
/// Returns `JseqError::Json` for malformed JSON and `JseqError::Document` for
/// JSON that is not a jseq record or array of records.
pub fn from_json(text: &str) -> Result<Vec<Record>, JseqError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    match value {
        serde_json::Value::Array(items) => items.iter().map(record_from_value).collect(),
        value @ serde_json::Value::Object(_) => Ok(vec![record_from_value(&value)?]),
        other => Err(JseqError::Document(format!(
            "expected a record object or an array, got {other}"
        ))),
    }
}

/// Read records from a jseq file
///
/// # Errors
///
/// Returns `JseqError::Io` if the file cannot be read, otherwise the errors of
/// [`from_json`].
pub fn from_json_file(path: &Path) -> Result<Vec<Record>, JseqError> {
    let text = std::fs::read_to_string(path)?;
    from_json(&text)
}
