//! Data layer: core types, sources, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  fixtures        .parquet / .json / .csv
//!     │                   │
//!     │              ┌──────────┐
//!     │              │  loader   │  parse file → TimeSeries
//!     │              └──────────┘
//!     ▼                   ▼
//!   ┌──────────────────────────┐
//!   │ source: DataSource trait  │  FixtureSource / DirectorySource
//!   └──────────────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Catalog   │  immutable snapshot, one TimeSeries per DatasetId
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  date + range predicates → order-preserving subset
//!   └──────────┘
//! ```
//!
//! `export` writes a source back out in the layout `DirectorySource` reads.

pub mod export;
pub mod fixtures;
pub mod filter;
pub mod loader;
pub mod model;
pub mod source;
