/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///      .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows, derive year / month → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetHandle │  Arc<Dataset>, swapped on reload
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year / month predicates → View (indices)
///   └──────────┘
/// ```

pub mod filter;
pub mod handle;
pub mod loader;
pub mod model;
