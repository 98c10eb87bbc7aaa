use std::path::Path;

use chrono::NaiveDateTime;
use indexmap::{IndexMap, IndexSet};
use log::{debug, info};
use serde_json::{Map, Value as JsonValue};

use super::filter::missing_required;
use super::model::{EvaDataset, EvaRecord, FieldValue, CREW, DATE, DURATION, EVA};
use super::parse::{date_from_epoch_millis, parse_date};
use crate::error::{EvaError, Result, SourceError};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load, clean and date-sort the EVA records in a JSON file.
///
/// Expected layout (records-oriented, as published by data.nasa.gov):
///
/// ```json
/// [
///   {
///     "eva": "1",
///     "country": "USA",
///     "crew": "Ed White;",
///     "vehicle": "Gemini IV",
///     "date": "1965-06-03T00:00:00.000",
///     "duration": "0:36",
///     "purpose": "..."
///   },
///   ...
/// ]
/// ```
pub fn load_json(path: &Path) -> Result<EvaDataset> {
    let source_error = |source: SourceError| EvaError::SourceRead {
        path: path.to_path_buf(),
        source,
    };

    let text = std::fs::read_to_string(path).map_err(|e| source_error(e.into()))?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| source_error(e.into()))?;

    let JsonValue::Array(items) = root else {
        return Err(source_error(SourceError::Shape(
            "expected top-level JSON array".into(),
        )));
    };

    let rows = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            JsonValue::Object(obj) => Ok(obj),
            _ => Err(source_error(SourceError::Shape(format!(
                "row {i} is not a JSON object"
            )))),
        })
        .collect::<Result<Vec<_>>>()?;

    let dataset = load_records(rows)?;
    info!(
        "Loaded {} records from {} ({} incomplete rows dropped)",
        dataset.len(),
        path.display(),
        dataset.dropped
    );
    Ok(dataset)
}

/// Clean already-parsed source rows.
///
/// `eva` is coerced to a float for every row, then rows missing `date` or
/// `duration` are dropped, and the rest are stably sorted by date. Any
/// coercion failure aborts the whole load.
pub fn load_records(rows: Vec<Map<String, JsonValue>>) -> Result<EvaDataset> {
    let mut columns: IndexSet<String> = IndexSet::new();
    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = 0;

    for (i, row) in rows.into_iter().enumerate() {
        columns.extend(row.keys().cloned());

        let eva = coerce_eva(i, row.get(EVA))?;

        if let Some(field) = missing_required(&row) {
            debug!("Row {i}: dropped, '{field}' is missing");
            dropped += 1;
            continue;
        }

        let date = coerce_date(i, row.get(DATE))?;
        let duration = coerce_text(i, DURATION, row.get(DURATION))?;
        let crew = coerce_text(i, CREW, row.get(CREW))?;

        let fields: IndexMap<String, FieldValue> = row
            .into_iter()
            .filter(|(key, _)| ![EVA, DATE, DURATION, CREW].contains(&key.as_str()))
            .map(|(key, val)| (key, json_to_field(val)))
            .collect();

        records.push(EvaRecord {
            source_row: i,
            eva,
            date,
            duration,
            crew,
            fields,
        });
    }

    // `sort_by` is stable: same-date rows keep their source order.
    records.sort_by(|a, b| a.date.cmp(&b.date));

    Ok(EvaDataset {
        records,
        columns: columns.into_iter().collect(),
        dropped,
    })
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

fn type_error(
    row: usize,
    field: &'static str,
    value: &JsonValue,
    expected: &'static str,
) -> EvaError {
    EvaError::TypeConversion {
        row,
        field,
        value: value.to_string(),
        expected,
    }
}

/// Numbers and numeric strings become `f64`; `null`/absent stays absent.
fn coerce_eva(row: usize, value: Option<&JsonValue>) -> Result<Option<f64>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let number = match value {
        JsonValue::Null => return Ok(None),
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .map(Some)
        .ok_or_else(|| type_error(row, EVA, value, "numeric"))
}

fn coerce_date(row: usize, value: Option<&JsonValue>) -> Result<NaiveDateTime> {
    let value = value.unwrap_or(&JsonValue::Null);
    let date = match value {
        JsonValue::String(s) => parse_date(s),
        JsonValue::Number(n) => n.as_i64().and_then(date_from_epoch_millis),
        _ => None,
    };
    date.ok_or_else(|| type_error(row, DATE, value, "a date"))
}

/// Text fields; `null`/absent reads as empty text.
fn coerce_text(row: usize, field: &'static str, value: Option<&JsonValue>) -> Result<String> {
    match value {
        None | Some(JsonValue::Null) => Ok(String::new()),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(other) => Err(type_error(row, field, other, "text")),
    }
}

fn json_to_field(val: JsonValue) -> FieldValue {
    match val {
        JsonValue::String(s) => FieldValue::String(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => FieldValue::Bool(b),
        JsonValue::Null => FieldValue::Null,
        other => FieldValue::Json(other.to_string()),
    }
}
