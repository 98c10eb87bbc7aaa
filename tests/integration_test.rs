//! End-to-end tests for the EVA pipeline.

use std::io::Write;
use std::path::Path;

use serde_json::{json, Map, Value as JsonValue};
use tempfile::{NamedTempFile, TempDir};

use eva_analysis::data::enrich::enrich;
use eva_analysis::data::loader::{load_json, load_records};
use eva_analysis::export::{read_csv, write_csv};
use eva_analysis::{run, EvaError, PipelineConfig};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn rows(value: JsonValue) -> Vec<Map<String, JsonValue>> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_object().cloned().expect("object"))
        .collect()
}

/// A small sample in the data.nasa.gov layout, deliberately out of order and
/// with incomplete rows.
const SAMPLE: &str = r#"[
  {"eva": "4", "country": "USA", "crew": "Gene Cernan;", "vehicle": "Gemini IX-A",
   "date": "1966-06-05T00:00:00.000", "duration": "2:07", "purpose": "Tested AMU"},
  {"eva": "1", "country": "USA", "crew": "Ed White;", "vehicle": "Gemini IV",
   "date": "1965-06-03T00:00:00.000", "duration": "0:36", "purpose": "First U.S. EVA"},
  {"eva": "2", "country": "Russia", "crew": "Alexei Leonov;", "vehicle": "Voskhod 2",
   "date": "1965-03-18T00:00:00.000", "duration": "0:12", "purpose": "First EVA"},
  {"eva": "3", "country": "USA", "crew": "", "vehicle": "Gemini VIII",
   "date": null, "duration": "0:00", "purpose": "Cancelled"},
  {"eva": "5", "country": "USA", "crew": "Michael Collins; John Young;", "vehicle": "Gemini X",
   "date": "1966-07-19T00:00:00.000", "duration": null, "purpose": "Standup EVA"},
  {"eva": "6", "country": "USA", "crew": "Buzz Aldrin; Neil Armstrong;", "vehicle": "Apollo 11",
   "date": "1969-07-21T00:00:00.000", "duration": "2:31", "purpose": "Lunar surface"}
]"#;

// =============================================================================
// Loading invariants
// =============================================================================

#[test]
fn loaded_records_are_complete_and_date_ordered() {
    let file = create_test_file(SAMPLE);
    let ds = load_json(file.path()).expect("load failed");

    assert_eq!(ds.len(), 4);
    assert_eq!(ds.dropped, 2);
    assert!(ds.records.iter().all(|r| !r.duration.trim().is_empty()));
    assert!(ds.records.windows(2).all(|w| w[0].date <= w[1].date));

    let ids: Vec<Option<f64>> = ds.records.iter().map(|r| r.eva).collect();
    assert_eq!(ids, [Some(2.0), Some(1.0), Some(4.0), Some(6.0)]);
}

#[test]
fn same_date_records_keep_input_order() {
    let ds = load_records(rows(json!([
        {"eva": 10, "date": "1990-01-01", "duration": "1:00", "crew": "second-date;"},
        {"eva": 11, "date": "1980-01-01", "duration": "1:00", "crew": "tie-a;"},
        {"eva": 12, "date": "1980-01-01", "duration": "1:00", "crew": "tie-b;"}
    ])))
    .expect("load failed");

    let ids: Vec<Option<f64>> = ds.records.iter().map(|r| r.eva).collect();
    assert_eq!(ids, [Some(11.0), Some(12.0), Some(10.0)]);
}

// =============================================================================
// Enrichment
// =============================================================================

#[test]
fn three_day_scenario() {
    let ds = load_records(rows(json!([
        {"eva": 1, "date": "2000-01-01", "duration": "1:00", "crew": "A;"},
        {"eva": 2, "date": "2000-01-02", "duration": "2:30", "crew": "A; B;"},
        {"eva": 3, "date": "2000-01-03", "duration": "0:30", "crew": ""}
    ])))
    .expect("load failed");
    let enriched = enrich(&ds).expect("enrich failed");

    let hours: Vec<f64> = enriched.records.iter().map(|r| r.duration_hours).collect();
    let totals: Vec<f64> = enriched
        .records
        .iter()
        .map(|r| r.cumulative_duration_hours)
        .collect();
    let crews: Vec<Option<usize>> = enriched.records.iter().map(|r| r.crew_size).collect();

    assert_eq!(hours, [1.0, 2.5, 0.5]);
    assert_eq!(totals, [1.0, 3.5, 4.0]);
    assert_eq!(crews, [Some(1), Some(2), None]);
}

#[test]
fn malformed_duration_stops_enrichment() {
    let ds = load_records(rows(json!([
        {"eva": 1, "date": "2000-01-01", "duration": "1h30m", "crew": "A;"}
    ])))
    .expect("load failed");
    assert!(matches!(
        enrich(&ds),
        Err(EvaError::Parse { field: "duration", .. })
    ));
}

#[test]
fn blank_duration_is_a_parse_error_not_a_dropped_row() {
    let ds = load_records(rows(json!([
        {"eva": 1, "date": "2000-01-01", "duration": "1:00", "crew": "A;"},
        {"eva": 2, "date": "2000-01-02", "duration": "", "crew": "B;"}
    ])))
    .expect("load failed");
    assert_eq!(ds.dropped, 0);
    assert!(matches!(
        enrich(&ds),
        Err(EvaError::Parse { row: 1, field: "duration", .. })
    ));
}

#[test]
fn parse_error_row_is_the_source_position() {
    // the bad row sorts first but sits at index 2 of the source array
    let ds = load_records(rows(json!([
        {"eva": 1, "date": "2000-01-03", "duration": "1:00", "crew": "A;"},
        {"eva": 2, "date": null, "duration": "1:00", "crew": "B;"},
        {"eva": 3, "date": "2000-01-01", "duration": "1h", "crew": "C;"}
    ])))
    .expect("load failed");
    let err = enrich(&ds).unwrap_err();
    assert!(matches!(err, EvaError::Parse { row: 2, .. }));
    assert!(err.to_string().starts_with("row 2:"));
}

// =============================================================================
// Export round-trip
// =============================================================================

#[test]
fn exported_table_round_trips_derived_values() {
    let file = create_test_file(SAMPLE);
    let dir = TempDir::new().expect("tempdir");
    let table = dir.path().join("eva-data.csv");

    let enriched = enrich(&load_json(file.path()).expect("load")).expect("enrich");
    write_csv(&enriched, &table).expect("write");
    let read_back = read_csv(&table).expect("read");

    assert_eq!(read_back.len(), enriched.len());
    for (written, read) in enriched.records.iter().zip(&read_back) {
        assert!((written.duration_hours - read.duration_hours).abs() < 1e-9);
        assert!(
            (written.cumulative_duration_hours - read.cumulative_duration_hours).abs() < 1e-9
        );
        assert_eq!(written.crew_size, read.crew_size);
        assert_eq!(written.record.duration, read.duration);
    }
}

#[test]
fn exported_header_keeps_source_order_then_derived() {
    let file = create_test_file(SAMPLE);
    let dir = TempDir::new().expect("tempdir");
    let table = dir.path().join("eva-data.csv");

    let enriched = enrich(&load_json(file.path()).expect("load")).expect("enrich");
    write_csv(&enriched, &table).expect("write");

    let text = std::fs::read_to_string(&table).expect("read");
    assert_eq!(
        text.lines().next(),
        Some(
            "eva,country,crew,vehicle,date,duration,purpose,\
             duration_hours,cumulative_duration_hours,crew_size"
        )
    );
    assert!(text.contains("2.0,Russia,Alexei Leonov;,Voskhod 2,1965-03-18,0:12,First EVA,0.2,0.2,1"));
}

// =============================================================================
// Full pipeline
// =============================================================================

fn config_in(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        input: dir.join("eva-data.json"),
        table_output: dir.join("eva-data.csv"),
        chart_output: dir.join("cumulative_eva_graph.png"),
    }
}

#[test]
fn pipeline_writes_both_artifacts() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(dir.path());
    std::fs::write(&config.input, SAMPLE).expect("write input");

    let report = run(&config).expect("pipeline failed");
    assert_eq!(report.records_read, 6);
    assert_eq!(report.records_dropped, 2);
    assert_eq!(report.records_written, 4);
    let expected_total = 0.2 + 0.6 + (2.0 + 7.0 / 60.0) + (2.0 + 31.0 / 60.0);
    assert!((report.total_duration_hours - expected_total).abs() < 1e-9);

    let png = std::fs::read(&config.chart_output).expect("chart missing");
    assert_eq!(&png[..4], b"\x89PNG");
    assert_eq!(read_csv(&config.table_output).expect("table").len(), 4);
}

#[test]
fn pipeline_can_run_twice() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(dir.path());
    std::fs::write(&config.input, SAMPLE).expect("write input");

    let first = run(&config).expect("first run");
    let second = run(&config).expect("second run");
    assert_eq!(first, second);
}

#[test]
fn missing_input_fails_before_any_output() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(dir.path());

    let err = run(&config).unwrap_err();
    assert!(matches!(err, EvaError::SourceRead { .. }));
    assert!(!config.table_output.exists());
    assert!(!config.chart_output.exists());
}

#[test]
fn non_numeric_eva_fails_the_run() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(dir.path());
    std::fs::write(
        &config.input,
        r#"[{"eva": "first", "date": "1965-06-03", "duration": "0:36", "crew": "Ed White;"}]"#,
    )
    .expect("write input");

    assert!(matches!(
        run(&config),
        Err(EvaError::TypeConversion { field: "eva", .. })
    ));
}
