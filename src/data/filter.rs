use serde_json::{Map, Value as JsonValue};

use super::model::{DATE, DURATION};

// ---------------------------------------------------------------------------
// Completeness rule: which source rows survive loading
// ---------------------------------------------------------------------------

/// Fields a row must carry to be kept.
pub const REQUIRED_FIELDS: [&str; 2] = [DATE, DURATION];

/// A value counts as missing when it is absent or `null`.
pub fn is_missing(value: Option<&JsonValue>) -> bool {
    matches!(value, None | Some(JsonValue::Null))
}

/// Whether `field` of a row counts as missing.
///
/// Blank `date` text cannot be read as a date and is treated like `null`.
/// A blank `duration` is present: it is left for the enricher to reject.
pub fn is_field_missing(field: &str, value: Option<&JsonValue>) -> bool {
    match value {
        Some(JsonValue::String(s)) if field == DATE => s.trim().is_empty(),
        _ => is_missing(value),
    }
}

/// The first required field the row is missing, if any.
pub fn missing_required(row: &Map<String, JsonValue>) -> Option<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .find(|field| is_field_missing(field, row.get(*field)))
}
