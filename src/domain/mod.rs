//! Domain types for the report dataset and panel configuration.

mod types;

pub use types::*;
