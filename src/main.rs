use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use eva_analysis::pipeline::{self, PipelineConfig, DEFAULT_CHART_OUTPUT};

/// Clean EVA records, export them as CSV and plot cumulative time in space.
///
/// Run with no arguments to use `data/eva-data.json` and
/// `results/eva-data.csv`, or give both paths.
#[derive(Debug, Parser)]
#[command(name = "eva-analysis", version)]
struct Cli {
    /// JSON file with EVA records
    #[arg(requires = "output")]
    input: Option<PathBuf>,

    /// CSV file to write
    output: Option<PathBuf>,

    /// PNG file for the cumulative duration chart
    #[arg(long, default_value = DEFAULT_CHART_OUTPUT)]
    graph: PathBuf,
}

impl From<Cli> for PipelineConfig {
    fn from(cli: Cli) -> Self {
        let defaults = PipelineConfig::default();
        PipelineConfig {
            input: cli.input.unwrap_or(defaults.input),
            table_output: cli.output.unwrap_or(defaults.table_output),
            chart_output: cli.graph,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig::from(Cli::parse());
    pipeline::run(&config)
        .with_context(|| format!("EVA pipeline failed for {}", config.input.display()))?;
    Ok(())
}
