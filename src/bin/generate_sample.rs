use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use clap::Parser;
use serde_json::{json, Value as JsonValue};

/// Write a synthetic EVA dataset in the data.nasa.gov JSON layout.
#[derive(Debug, Parser)]
#[command(name = "generate-sample")]
struct Cli {
    /// Destination JSON file
    #[arg(default_value = "data/eva-data.json")]
    output: PathBuf,

    /// Number of records to generate
    #[arg(long, default_value_t = 120)]
    count: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `0..n`.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n.max(1)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }
}

const ASTRONAUTS: [&str; 12] = [
    "Ed White",
    "Alexei Leonov",
    "Gene Cernan",
    "Buzz Aldrin",
    "Kathryn Sullivan",
    "Svetlana Savitskaya",
    "Bruce McCandless",
    "Sunita Williams",
    "Peggy Whitson",
    "Anatoly Solovyev",
    "Michael Lopez-Alegria",
    "Jerry Ross",
];

const VEHICLES: [(&str, &str); 4] = [
    ("USA", "Gemini"),
    ("Russia", "Salyut"),
    ("USA", "STS"),
    ("Russia", "Mir"),
];

fn crew_text(rng: &mut SimpleRng) -> String {
    let size = 1 + rng.below(3) as usize;
    let mut crew = String::new();
    for _ in 0..size {
        crew.push_str(*rng.pick(&ASTRONAUTS));
        crew.push(';');
    }
    crew
}

fn record(index: usize, rng: &mut SimpleRng, first_day: NaiveDate, span_days: u64) -> JsonValue {
    let date = first_day + Duration::days(rng.below(span_days) as i64);
    let duration = format!("{}:{:02}", rng.below(9), rng.below(60));
    let (country, vehicle) = *rng.pick(&VEHICLES);

    // roughly one row in twenty is incomplete, and a few have no crew listed
    let date = match rng.below(20) {
        0 => JsonValue::Null,
        _ => json!(date.format("%Y-%m-%dT00:00:00.000").to_string()),
    };
    let duration = match rng.below(20) {
        0 => JsonValue::Null,
        _ => json!(duration),
    };
    let crew = match rng.below(15) {
        0 => json!(""),
        _ => json!(crew_text(rng)),
    };

    json!({
        "eva": (index + 1).to_string(),
        "country": country,
        "crew": crew,
        "vehicle": format!("{vehicle} {}", 1 + rng.below(12)),
        "date": date,
        "duration": duration,
        "purpose": "Synthetic spacewalk record",
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = SimpleRng::new(cli.seed);

    let first_day = NaiveDate::from_ymd_opt(1965, 3, 18).context("invalid start date")?;
    let last_day = NaiveDate::from_ymd_opt(2013, 12, 31).context("invalid end date")?;
    let span_days = (last_day - first_day).num_days() as u64;

    let records: Vec<JsonValue> = (0..cli.count)
        .map(|i| record(i, &mut rng, first_day, span_days))
        .collect();

    let file = File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    println!("Wrote {} EVA records to {}", records.len(), cli.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eva_analysis::calculate_crew_size;

    #[test]
    fn crew_text_lists_known_names_with_trailing_separator() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..50 {
            let crew = crew_text(&mut rng);
            assert!(crew.ends_with(';'));
            for name in crew.split(';').filter(|n| !n.is_empty()) {
                assert!(ASTRONAUTS.contains(&name), "unexpected name {name:?}");
            }
            let size = calculate_crew_size(&crew).unwrap();
            assert!((1..=3).contains(&size));
        }
    }

    #[test]
    fn same_seed_gives_same_records() {
        let first_day = NaiveDate::from_ymd_opt(1965, 3, 18).unwrap();
        let mut a = SimpleRng::new(42);
        let mut b = SimpleRng::new(42);
        let left: Vec<JsonValue> = (0..20).map(|i| record(i, &mut a, first_day, 1000)).collect();
        let right: Vec<JsonValue> = (0..20).map(|i| record(i, &mut b, first_day, 1000)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn incomplete_rows_use_null_not_blank_text() {
        let first_day = NaiveDate::from_ymd_opt(1965, 3, 18).unwrap();
        let mut rng = SimpleRng::new(3);
        for i in 0..200 {
            let row = record(i, &mut rng, first_day, 1000);
            assert_ne!(row["duration"], json!(""));
            assert_ne!(row["date"], json!(""));
        }
    }
}
