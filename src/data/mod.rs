/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, coerce loose values → RowStore
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ RowStore  │  Vec<ClimateRow>, year range; immutable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year + known region + finite metric
///   └──────────┘
///        │
///        ├──► aggregate  mean per (year, region)
///        └──► ranking    target-year mean minus baseline-year mean
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod ranking;
