//! The in-memory emperor catalog: loading, lookups, listings and export.

mod error;
pub mod export;
pub mod query;
pub mod source;

pub use error::{QueryError, SourceError};
pub use export::export_csv;
pub use query::{accept_reorder, ListQuery, Page, SortKey, SortOrder};
pub use source::{Catalog, RecordSource};
