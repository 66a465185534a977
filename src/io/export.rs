//! Export the aggregated panel series to JSON.
//!
//! The export is the "portable" representation of one statistics run:
//! - the total row count
//! - every panel in slot order (dimension, encoding, title, series)
//!
//! It is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agg::PanelData;
use crate::domain::{Dimension, Encoding};
use crate::error::AppError;
use crate::panel::PanelPlan;
use crate::report::TITULO_GERAL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsFile {
    pub tool: String,
    pub titulo: String,
    pub total_laudos: usize,
    pub paineis: Vec<StatsPanel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsPanel {
    pub dimensao: Dimension,
    pub encoding: Encoding,
    pub titulo: String,
    pub categorias: Vec<StatsCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsCount {
    pub categoria: String,
    pub quantidade: u64,
}

/// Build the serializable view of a plan.
pub fn stats_file(plan: &PanelPlan, total_laudos: usize) -> StatsFile {
    let paineis = plan
        .panels
        .iter()
        .map(|panel| StatsPanel {
            dimensao: panel.dimension,
            encoding: panel.encoding,
            titulo: panel.titulo().to_string(),
            categorias: match &panel.data {
                PanelData::Categorias(v) => v
                    .iter()
                    .map(|(categoria, quantidade)| StatsCount {
                        categoria: categoria.clone(),
                        quantidade: *quantidade,
                    })
                    .collect(),
                PanelData::Anos(v) => v
                    .iter()
                    .map(|&(ano, quantidade)| StatsCount {
                        categoria: ano.to_string(),
                        quantidade,
                    })
                    .collect(),
            },
        })
        .collect();

    StatsFile {
        tool: "laudos".to_string(),
        titulo: TITULO_GERAL.to_string(),
        total_laudos,
        paineis,
    }
}

/// Write a stats JSON file.
pub fn write_stats_json(path: &Path, plan: &PanelPlan, total_laudos: usize) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create stats JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &stats_file(plan, total_laudos))
        .map_err(|e| AppError::config(format!("Failed to write stats JSON: {e}")))?;

    Ok(())
}
