//! File output (JSON export of aggregated statistics).

pub mod export;
