/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable → normalize → MatchTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  (path, content digest) → Arc<MatchTable>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  season / team / date predicates → visible indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ aggregate │  metrics + chart series, or the Empty signal
///   └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
