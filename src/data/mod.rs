//! Data access: the tabular query executor seam and typed row loading.

pub mod executor;
pub mod laudos;

pub use executor::{Field, QueryExecutor, SqliteExecutor, Table};
