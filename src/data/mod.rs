/// Data layer: core types, loading, cleaning, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, lowercase headers → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  coerce torque / engine size, drop failures
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  range / equality / distinct → derived Dataset views
///   └──────────┘
/// ```
pub mod clean;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
