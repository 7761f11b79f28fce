//! Centralized validation and helper functions.

/// Maximum number of records accepted from a single buffer (DOS protection)
pub const MAX_RECORDS: usize = 100_000;

/// Maximum number of features accepted in a single record (DOS protection)
pub const MAX_FEATURES: usize = 100_000;

/// Check if adding another record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

/// Same as [`check_record_limit`], for features within one record.
#[must_use]
pub fn check_feature_limit(count: usize) -> Option<String> {
    if count >= MAX_FEATURES {
        Some(format!(
            "Too many features: adding another would exceed maximum of {MAX_FEATURES}"
        ))
    } else {
        None
    }
}

/// Check that a token has the `DD-MMM-YYYY` shape used by LOCUS dates.
///
/// Only the shape is checked: two digits, any three non-space characters,
/// four digits. `31-FEB-2000` passes.
///
/// # Examples
///
/// ```
/// use jseq::utils::validation::is_genbank_date;
///
/// assert!(is_genbank_date("01-JAN-2000"));
/// assert!(!is_genbank_date("1-JAN-2000"));
/// assert!(!is_genbank_date("JAN-01-2000"));
/// ```
#[must_use]
pub fn is_genbank_date(s: &str) -> bool {
    genbank_date_len(s) == Some(s.len())
}

/// Length of a `DD-MMM-YYYY` date at the start of `s`, if one is there.
#[must_use]
pub fn genbank_date_len(s: &str) -> Option<usize> {
    let mut chars = s.char_indices();
    let mut take = |pred: &dyn Fn(char) -> bool| match chars.next() {
        Some((_, c)) if pred(c) => Some(()),
        _ => None,
    };

    let digit = |c: char| c.is_ascii_digit();
    let dash = |c: char| c == '-';
    let word = |c: char| !c.is_whitespace();

    take(&digit)?;
    take(&digit)?;
    take(&dash)?;
    take(&word)?;
    take(&word)?;
    take(&word)?;
    take(&dash)?;
    for _ in 0..4 {
        take(&digit)?;
    }

    Some(chars.next().map_or(s.len(), |(i, _)| i))
}

/// Whether `s` consists only of bases the ORIGIN grammar accepts
#[must_use]
pub fn is_sequence_word(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| matches!(c, 'A' | 'C' | 'G' | 'T' | 'N' | 'a' | 'c' | 'g' | 't' | 'n'))
}
