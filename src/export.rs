use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::data::model::EnrichedDataset;
use crate::error::{EvaError, Result, SinkError, SourceError};

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write the enriched dataset as CSV, replacing any existing file.
///
/// Columns are the source columns in source order followed by
/// `duration_hours`, `cumulative_duration_hours` and `crew_size`. Absent
/// values are written as empty fields. The parent directory must exist.
pub fn write_csv(dataset: &EnrichedDataset, path: &Path) -> Result<()> {
    let sink_error = |source: SinkError| EvaError::SinkWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(|e| sink_error(e.into()))?;
    writer
        .write_record(dataset.header())
        .map_err(|e| sink_error(e.into()))?;

    for enriched in &dataset.records {
        let row = dataset
            .columns
            .iter()
            .map(|column| enriched.record.cell(column))
            .chain(enriched.derived_cells());
        writer.write_record(row).map_err(|e| sink_error(e.into()))?;
    }
    writer.flush().map_err(|e| sink_error(e.into()))?;

    info!("Wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV read-back
// ---------------------------------------------------------------------------

/// The columns of an exported table that carry derived values.
/// Passthrough columns are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportedRow {
    pub date: String,
    pub duration: String,
    pub duration_hours: f64,
    pub cumulative_duration_hours: f64,
    pub crew_size: Option<usize>,
}

/// Read a table produced by [`write_csv`].
pub fn read_csv(path: &Path) -> Result<Vec<ExportedRow>> {
    let source_error = |e: csv::Error| EvaError::SourceRead {
        path: path.to_path_buf(),
        source: SourceError::Csv(e),
    };

    let mut reader = csv::Reader::from_path(path).map_err(source_error)?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<ExportedRow>, csv::Error>>()
        .map_err(source_error)
}
