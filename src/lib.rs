//! Spacewalk (EVA) record processing.
//!
//! Reads a JSON array of EVA events, drops incomplete rows, orders them by
//! date, derives duration in hours, running total and crew size, then writes
//! a CSV table and a cumulative-duration chart. See [`pipeline::run`].

pub mod chart;
pub mod data;
pub mod error;
pub mod export;
pub mod pipeline;

pub use data::model::{EnrichedDataset, EnrichedEvaRecord, EvaDataset, EvaRecord, FieldValue};
pub use data::parse::{calculate_crew_size, text_to_duration};
pub use error::{EvaError, Result};
pub use pipeline::{run, PipelineConfig, PipelineReport};
