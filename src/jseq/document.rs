//! Conversion between records and jseq JSON values.
//!
//! Key order in the output follows the record layout and is kept by
//! `serde_json`'s `preserve_order` map:
//!
//! ```json
//! {
//!   "__format__": "jseq v0.1",
//!   "name": "pUC19", "size": 2686, "seqtype": "DNA", "divcode": "SYN",
//!   "date": "01-JAN-2000", "topology": "circular", "sequence": "...",
//!   "features": [{"type": "CDS", "location": [[1, 10]], "strand": -1, "gene": "bla"}],
//!   "annotations": {"DEFINITION": "..."}
//! }
//! ```

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::core::feature::{Feature, QualifierValue, Span};
use crate::core::record::{Record, DEFAULT_DATE, DEFAULT_DIVISION};
use crate::core::types::{Strand, StrandPrefix, Topology};
use crate::jseq::{JseqError, FORMAT_TAG};

/// Feature keys that are not qualifiers
const FEATURE_FIELDS: [&str; 3] = ["type", "location", "strand"];

#[must_use]
pub fn record_to_value(record: &Record) -> Value {
    let annotations: Map<String, Value> = record
        .annotations
        .iter()
        .map(|(name, text)| (name.clone(), json!(text)))
        .collect();
    let features: Vec<Value> = record.features.iter().map(feature_to_value).collect();

    json!({
        "__format__": FORMAT_TAG,
        "name": record.name,
        "size": record.size,
        "seqtype": record.seqtype(),
        "divcode": record.division_code,
        "date": record.date,
        "topology": record.topology.as_str(),
        "sequence": record.sequence,
        "features": features,
        "annotations": annotations,
    })
}

/// Feature object; qualifiers follow the fixed keys in their own order.
///
/// JSON objects cannot repeat a key, so a repeated qualifier name keeps its
/// first position and its last value.
#[must_use]
pub fn feature_to_value(feature: &Feature) -> Value {
    let mut object = Map::new();
    object.insert("type".to_string(), json!(feature.kind));
    object.insert("location".to_string(), json!(feature.location));
    object.insert("strand".to_string(), json!(feature.strand));

    for (name, value) in &feature.qualifiers {
        if FEATURE_FIELDS.contains(&name.as_str()) {
            warn!(feature = %feature.kind, qualifier = %name, "Dropping qualifier that clashes with a feature field");
            continue;
        }
        if object.insert(name.clone(), json!(value)).is_some() {
            warn!(feature = %feature.kind, qualifier = %name, "Repeated qualifier; keeping the last value");
        }
    }

    Value::Object(object)
}

fn invalid(reason: impl Into<String>) -> JseqError {
    JseqError::Document(reason.into())
}

fn optional_str<'a>(object: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>, JseqError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(invalid(format!("'{key}' must be a string, got {other}"))),
    }
}

/// Build a record from a jseq object.
///
/// Missing fields take the same defaults the GenBank parser uses; `size`
/// defaults to the sequence length.
///
/// # Errors
///
/// Returns `JseqError::Document` if the value is not an object or a field has
/// the wrong type, and `JseqError::Json` for malformed locations or strands.
pub fn record_from_value(value: &Value) -> Result<Record, JseqError> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid("record must be a JSON object"))?;

    match optional_str(object, "__format__")? {
        Some(FORMAT_TAG) => {}
        Some(other) => warn!(found = other, expected = FORMAT_TAG, "Unexpected format tag"),
        None => debug!("Record has no format tag"),
    }

    let sequence = optional_str(object, "sequence")?.unwrap_or_default().to_string();

    let size = match object.get("size") {
        None | Some(Value::Null) => sequence.len() as u64,
        Some(v) => v
            .as_u64()
            .ok_or_else(|| invalid(format!("'size' must be a non-negative integer, got {v}")))?,
    };

    let (strand_prefix, seq_kind) = optional_str(object, "seqtype")?
        .map_or((StrandPrefix::default(), "DNA"), StrandPrefix::split);

    let topology = match optional_str(object, "topology")? {
        None => Topology::default(),
        Some(t) => Topology::parse(t).ok_or_else(|| invalid(format!("unknown topology '{t}'")))?,
    };

    let features = match object.get("features") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| feature_from_value(item, i))
            .collect::<Result<_, _>>()?,
        Some(other) => return Err(invalid(format!("'features' must be an array, got {other}"))),
    };

    let annotations = match object.get("annotations") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(name, text)| match text {
                Value::String(s) => Ok((name.clone(), s.clone())),
                other => Err(invalid(format!("annotation '{name}' must be a string, got {other}"))),
            })
            .collect::<Result<_, _>>()?,
        Some(other) => return Err(invalid(format!("'annotations' must be an object, got {other}"))),
    };

    Ok(Record {
        name: optional_str(object, "name")?.unwrap_or_default().to_string(),
        size,
        seq_kind: seq_kind.to_string(),
        strand_prefix,
        topology,
        division_code: optional_str(object, "divcode")?
            .unwrap_or(DEFAULT_DIVISION)
            .to_string(),
        date: optional_str(object, "date")?.unwrap_or(DEFAULT_DATE).to_string(),
        sequence,
        features,
        annotations,
    })
}

/// Build a feature from a jseq object; `index` is only used in errors.
///
/// # Errors
///
/// Returns `JseqError::Document` if `type` or `location` is missing, a span
/// has its start after its end, or a qualifier is not an integer, string or
/// `true`.
pub fn feature_from_value(value: &Value, index: usize) -> Result<Feature, JseqError> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid(format!("feature {index} must be a JSON object")))?;

    let kind = optional_str(object, "type")?
        .ok_or_else(|| invalid(format!("feature {index} has no 'type'")))?;

    let location: Vec<Span> = object
        .get("location")
        .map(|v| serde_json::from_value(v.clone()))
        .transpose()?
        .ok_or_else(|| invalid(format!("feature {index} has no 'location'")))?;

    if let Some(span) = location.iter().find(|s| s.start > s.end) {
        return Err(invalid(format!(
            "feature {index} has span {}..{} with start after end",
            span.start, span.end
        )));
    }

    let strand: Strand = match object.get("strand") {
        None | Some(Value::Null) => Strand::default(),
        Some(v) => serde_json::from_value(v.clone())?,
    };

    let mut feature = Feature::new(kind, location, strand);
    for (name, v) in object {
        if FEATURE_FIELDS.contains(&name.as_str()) {
            continue;
        }
        let qualifier: QualifierValue = serde_json::from_value(v.clone())
            .map_err(|e| invalid(format!("feature {index} qualifier '{name}': {e}")))?;
        feature.qualifiers.push((name.clone(), qualifier));
    }

    Ok(feature)
}
