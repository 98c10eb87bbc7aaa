use std::path::PathBuf;

use log::info;

use crate::chart::render_cumulative_chart;
use crate::data::enrich::enrich;
use crate::data::loader::load_json;
use crate::error::Result;
use crate::export::write_csv;

/// Default input, relative to the working directory.
pub const DEFAULT_INPUT: &str = "data/eva-data.json";
/// Default table destination.
pub const DEFAULT_TABLE_OUTPUT: &str = "results/eva-data.csv";
/// Default chart destination.
pub const DEFAULT_CHART_OUTPUT: &str = "results/cumulative_eva_graph.png";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Where one run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub table_output: PathBuf,
    pub chart_output: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input: PathBuf::from(DEFAULT_INPUT),
            table_output: PathBuf::from(DEFAULT_TABLE_OUTPUT),
            chart_output: PathBuf::from(DEFAULT_CHART_OUTPUT),
        }
    }
}

/// What a completed run processed.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub records_read: usize,
    pub records_dropped: usize,
    pub records_written: usize,
    pub total_duration_hours: f64,
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Load → enrich → export table → render chart.
///
/// The first failing stage aborts the run. Outputs already written by
/// earlier stages are left in place.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport> {
    info!("--START--");

    info!("Reading JSON file {}", config.input.display());
    let dataset = load_json(&config.input)?;

    info!("Adding crew size, duration and cumulative duration");
    let enriched = enrich(&dataset)?;

    info!("Saving table to {}", config.table_output.display());
    write_csv(&enriched, &config.table_output)?;

    info!(
        "Plotting cumulative spacewalk duration and saving to {}",
        config.chart_output.display()
    );
    render_cumulative_chart(&enriched, &config.chart_output)?;

    let report = PipelineReport {
        records_read: dataset.len() + dataset.dropped,
        records_dropped: dataset.dropped,
        records_written: enriched.len(),
        total_duration_hours: enriched.total_duration_hours(),
    };
    info!(
        "{} of {} records written, {:.1} hours in total",
        report.records_written, report.records_read, report.total_duration_hours
    );
    info!("--END--");
    Ok(report)
}
