/// Data layer: loading sample matrices from disk.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SeismicSection
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ SeismicSection  │  Array2 samples × traces, optional axes
///   └────────────────┘
///        │
///        ▼
///   wiggle::normalize
/// ```

pub mod loader;
pub mod model;
