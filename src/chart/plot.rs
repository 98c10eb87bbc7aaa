use std::ops::Range;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use log::{info, warn};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use crate::data::model::EnrichedDataset;
use crate::error::{EvaError, Result, SinkError};

// ---------------------------------------------------------------------------
// Chart style
// ---------------------------------------------------------------------------

/// Geometry, labels and colours of the cumulative-duration chart.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub x_label: String,
    pub y_label: String,
    pub background: RGBColor,
    /// Markers and connecting lines.
    pub series: RGBColor,
    pub marker_radius: u32,
    pub line_width: u32,
    /// Blank border around the whole chart.
    pub margin: u32,
    /// Room below the plot for tick labels and the x description.
    pub x_label_area: u32,
    /// Room left of the plot for tick labels and the y description.
    pub y_label_area: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            width: 800,
            height: 600,
            x_label: "Year".to_string(),
            y_label: "Total time spent in space to date (hours)".to_string(),
            background: WHITE,
            series: BLACK,
            marker_radius: 3,
            line_width: 2,
            margin: 20,
            x_label_area: 50,
            y_label_area: 70,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Plot cumulative duration against date and save it as a PNG at `path`.
///
/// Uses the values already computed by enrichment; nothing is recomputed.
pub fn render_cumulative_chart(dataset: &EnrichedDataset, path: &Path) -> Result<()> {
    render_with_style(dataset, path, &ChartStyle::default())
}

/// [`render_cumulative_chart`] with a caller-supplied style.
pub fn render_with_style(
    dataset: &EnrichedDataset,
    path: &Path,
    style: &ChartStyle,
) -> Result<()> {
    if dataset.is_empty() {
        warn!("No records to plot, writing empty axes to {}", path.display());
    }

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    draw_chart(&root, dataset, style)
        .and_then(|_| root.present())
        .map_err(|e| EvaError::SinkWrite {
            path: path.to_path_buf(),
            source: SinkError::Chart(e.to_string()),
        })?;

    info!("Saved cumulative duration chart to {}", path.display());
    Ok(())
}

/// Draw the chart onto any plotters drawing area.
///
/// Returns the backend pixel of each marker, in record order.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dataset: &EnrichedDataset,
    style: &ChartStyle,
) -> std::result::Result<Vec<(i32, i32)>, DrawingAreaErrorKind<DB::ErrorType>> {
    let points: Vec<(NaiveDate, f64)> = dataset
        .records
        .iter()
        .map(|r| (r.record.date.date(), r.cumulative_duration_hours))
        .collect();
    let x_range = date_range(points.iter().map(|p| p.0));
    let y_range = hours_range(points.iter().map(|p| p.1));
    let multi_year = (x_range.end - x_range.start).num_days() > 3 * 365;

    root.fill(&style.background)?;

    let mut chart = ChartBuilder::on(root)
        .margin(style.margin)
        .x_label_area_size(style.x_label_area)
        .y_label_area_size(style.y_label_area)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(style.x_label.as_str())
        .y_desc(style.y_label.as_str())
        .x_label_formatter(&|d: &NaiveDate| date_tick(d, multi_year))
        .draw()?;

    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        style.series.stroke_width(style.line_width),
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|&p| Circle::new(p, style.marker_radius, style.series.filled())),
    )?;

    Ok(points.iter().map(|p| chart.backend_coord(p)).collect())
}

// ---------------------------------------------------------------------------
// Axis ranges
// ---------------------------------------------------------------------------

/// Date extent padded by a twentieth of the span (at least 30 days) each
/// side. Empty data gets the year starting 1970-01-01.
fn date_range(dates: impl Iterator<Item = NaiveDate>) -> Range<NaiveDate> {
    let bounds = dates.fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| match acc {
        None => Some((d, d)),
        Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
    });
    let Some((min, max)) = bounds else {
        let start = NaiveDate::default();
        return start..start + Duration::days(365);
    };
    let pad = Duration::days(((max - min).num_days() / 20).max(30));
    min - pad..max + pad
}

/// Zero up to 5% above the largest total; `0..1` when there is nothing
/// above zero.
fn hours_range(totals: impl Iterator<Item = f64>) -> Range<f64> {
    let max = totals.fold(0.0_f64, f64::max);
    if max > 0.0 {
        0.0..max * 1.05
    } else {
        0.0..1.0
    }
}

fn date_tick(date: &NaiveDate, multi_year: bool) -> String {
    if multi_year {
        date.format("%Y").to_string()
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}
