//! Data layer: record types, loading, cleaning and enrichment.
//!
//! Architecture:
//! ```text
//!  eva-data.json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  coerce `eva`, drop incomplete rows (filter), sort by date
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ EvaDataset  │  Vec<EvaRecord>, source column order
//!   └────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  enrich   │  parse durations/crews, running total → EnrichedDataset
//!   └──────────┘
//! ```

pub mod enrich;
pub mod filter;
pub mod loader;
pub mod model;
pub mod parse;
