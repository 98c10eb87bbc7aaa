//! Cumulative-duration chart, drawn with `plotters` and encoded as PNG.

pub mod plot;

pub use plot::{render_cumulative_chart, ChartStyle};
