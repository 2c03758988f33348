/// Data layer: county table, loading, and county selection.
///
/// Architecture:
/// ```text
///  .mat / .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read four named arrays → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  parallel arrays, joined by position
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  whole country / state prefix / explicit counties
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod states;
