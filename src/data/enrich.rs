use log::{info, warn};

use super::model::{EnrichedDataset, EnrichedEvaRecord, EvaDataset, DURATION};
use super::parse::{calculate_crew_size, has_trailing_separator, text_to_duration};
use crate::error::{EvaError, Result};

/// Derive crew size, duration in hours and the running duration total.
///
/// Records are processed in dataset (date) order; the cumulative value of
/// each record is the sum of its own duration and every earlier one. The
/// input is left untouched and a new collection is returned. A single
/// malformed duration fails the whole stage.
pub fn enrich(dataset: &EvaDataset) -> Result<EnrichedDataset> {
    let mut running_total = 0.0;
    let mut records = Vec::with_capacity(dataset.len());

    for record in &dataset.records {
        let row = record.source_row;
        let duration_hours =
            text_to_duration(&record.duration).map_err(|source| EvaError::Parse {
                row,
                field: DURATION,
                source,
            })?;
        running_total += duration_hours;

        if !has_trailing_separator(&record.crew) {
            warn!(
                "Row {row}: crew '{}' has no trailing ';', crew size may be undercounted",
                record.crew
            );
        }

        records.push(EnrichedEvaRecord {
            record: record.clone(),
            duration_hours,
            cumulative_duration_hours: running_total,
            crew_size: calculate_crew_size(&record.crew),
        });
    }

    let enriched = EnrichedDataset {
        records,
        columns: dataset.columns.clone(),
    };
    info!(
        "Enriched {} records, {:.1} hours in total",
        enriched.len(),
        enriched.total_duration_hours()
    );
    Ok(enriched)
}
