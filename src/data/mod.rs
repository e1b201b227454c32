/// Data layer: decoding, header promotion, cascading filters and export.
///
/// Architecture:
/// ```text
///  .csv / .xls / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode bytes → RawTable (no header)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  header   │  promote one row → Table (labels + rows below)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  equality predicates → candidates / FilteredTable
///   └──────────┘      (candidates ordered by `options`)
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  project columns → CSV bytes
///   └──────────┘
/// ```

pub mod error;
pub mod export;
pub mod filter;
pub mod header;
pub mod loader;
pub mod model;
pub mod options;
