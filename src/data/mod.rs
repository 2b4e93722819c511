/// Data layer: core types, log parsing, and CSV export.
///
/// Architecture:
/// ```text
///  logs/log20250602.txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  regex scan line by line → StressSeries
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ StressSeries  │  counts[], rates[] in file order
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  samples → count,fps CSV
///   └──────────┘
/// ```

pub mod export;
pub mod loader;
pub mod model;
