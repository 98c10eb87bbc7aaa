use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use indexmap::IndexMap;

/// Source field holding the numeric EVA identifier.
pub const EVA: &str = "eva";
/// Source field holding the event date.
pub const DATE: &str = "date";
/// Source field holding `H:MM` duration text.
pub const DURATION: &str = "duration";
/// Source field holding `;`-terminated crew names.
pub const CREW: &str = "crew";

/// Columns appended by enrichment, in export order.
pub const DERIVED_COLUMNS: [&str; 3] = [
    "duration_hours",
    "cumulative_duration_hours",
    "crew_size",
];

// ---------------------------------------------------------------------------
// FieldValue – a passthrough cell
// ---------------------------------------------------------------------------

/// A dynamically-typed passthrough value, kept as it came from the source.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Arrays and objects, stored as their JSON text.
    Json(String),
    Null,
}

impl fmt::Display for FieldValue {
    /// Renders the value as a table cell. `Null` is an empty cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) | FieldValue::Json(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Null => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// EvaRecord – one cleaned row
// ---------------------------------------------------------------------------

/// One spacewalk event after loading. `date` and `duration` are always present.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaRecord {
    /// Zero-based position of the row in the source array, before dropping
    /// and sorting. Errors about this record name this row.
    pub source_row: usize,
    pub eva: Option<f64>,
    pub date: NaiveDateTime,
    /// Raw `H:MM` text; parsed during enrichment.
    pub duration: String,
    /// Raw crew text, empty when the source had none.
    pub crew: String,
    /// Every other source field, in source order.
    pub fields: IndexMap<String, FieldValue>,
}

impl EvaRecord {
    /// Render the named source column as a table cell.
    pub fn cell(&self, column: &str) -> String {
        match column {
            EVA => self.eva.map(|v| format!("{v:?}")).unwrap_or_default(),
            DATE => format_date(&self.date),
            DURATION => self.duration.clone(),
            CREW => self.crew.clone(),
            other => self
                .fields
                .get(other)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Dates at midnight are written as a bare day, everything else with a time.
pub fn format_date(date: &NaiveDateTime) -> String {
    if date.time() == NaiveTime::MIN {
        date.format("%Y-%m-%d").to_string()
    } else {
        date.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

// ---------------------------------------------------------------------------
// EvaDataset – the loaded, date-ordered collection
// ---------------------------------------------------------------------------

/// Cleaned records sorted ascending by date, plus the source column order.
#[derive(Debug, Clone, Default)]
pub struct EvaDataset {
    pub records: Vec<EvaRecord>,
    /// Source column names in first-appearance order.
    pub columns: Vec<String>,
    /// How many source rows were discarded as incomplete.
    pub dropped: usize,
}

impl EvaDataset {
    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records survived loading.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Enriched records
// ---------------------------------------------------------------------------

/// A loaded record plus the fields derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedEvaRecord {
    pub record: EvaRecord,
    pub duration_hours: f64,
    /// Running total of `duration_hours` up to and including this record.
    pub cumulative_duration_hours: f64,
    /// `None` when the crew text was blank.
    pub crew_size: Option<usize>,
}

impl EnrichedEvaRecord {
    /// Cells for the derived columns, in [`DERIVED_COLUMNS`] order.
    pub fn derived_cells(&self) -> [String; 3] {
        [
            self.duration_hours.to_string(),
            self.cumulative_duration_hours.to_string(),
            self.crew_size.map(|n| n.to_string()).unwrap_or_default(),
        ]
    }
}

/// Output of enrichment: a new collection, same order as the input.
#[derive(Debug, Clone, Default)]
pub struct EnrichedDataset {
    pub records: Vec<EnrichedEvaRecord>,
    pub columns: Vec<String>,
}

impl EnrichedDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header row: source columns followed by the derived ones.
    pub fn header(&self) -> Vec<String> {
        self.columns
            .iter()
            .cloned()
            .chain(DERIVED_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    /// Sum of all durations, i.e. the last cumulative value.
    pub fn total_duration_hours(&self) -> f64 {
        self.records
            .last()
            .map(|r| r.cumulative_duration_hours)
            .unwrap_or(0.0)
    }
}
