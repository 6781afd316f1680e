/// Data layer: core types, loading, preprocessing, filtering and aggregation.
///
/// Architecture:
/// ```text
///  {"items": [...]}  (or an exported .csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + flatten → ListingTable   (memoized by cache)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ preprocess  │  coerce types, derive columns, fill amounts
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category / floor / deposit / date → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────────────────┐
///   │ aggregate · charts · insight  │  → Dashboard      export → CSV
///   └──────────────────────────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod charts;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod insight;
pub mod loader;
pub mod model;
pub mod preprocess;

#[cfg(test)]
pub(crate) mod test_support;
