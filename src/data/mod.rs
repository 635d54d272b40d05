/// Data layer: core types, loading, timestamp parsing and filtering.
///
/// Architecture:
/// ```text
///      input .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  header → Schema, records → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌────────────┐
///   │  filter   │ ───▶ │ timestamp  │  raw cell → ParseOutcome (UTC)
///   └──────────┘      └────────────┘
///        │  kept row indices
///        ▼
///   ┌──────────┐
///   │  loader   │  temp file → rename → output .csv
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod timestamp;
