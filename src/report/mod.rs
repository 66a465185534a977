//! Plain-text reporting for the two artifacts.
//!
//! We keep formatting code in one place so:
//! - aggregation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

mod format;

pub use format::*;

/// Fixed overall caption of the composed panel artifact.
pub const TITULO_GERAL: &str = "Seção de Estatísticas - Balística - SecTec/Ccrim";
