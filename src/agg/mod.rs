//! Dimension aggregation: grouped counts along one column of the dataset.
//!
//! Design goals:
//! - **Deterministic ordering** (frequency order with first-seen tie-break,
//!   chronological order for years)
//! - **Read-only**: source rows are never mutated; outputs are derived views
//! - **Separation of concerns**: no chart or layout logic here

use std::collections::HashMap;

use crate::domain::{Dimension, Laudo};
use crate::error::AppError;

/// Aggregated series for one panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelData {
    /// Categorical counts, descending by count (ties by first-seen order).
    Categorias(Vec<(String, u64)>),
    /// Yearly counts, ascending by year.
    Anos(Vec<(i32, u64)>),
}

impl PanelData {
    pub fn len(&self) -> usize {
        match self {
            PanelData::Categorias(v) => v.len(),
            PanelData::Anos(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of counts across all categories.
    pub fn total(&self) -> u64 {
        match self {
            PanelData::Categorias(v) => v.iter().map(|(_, c)| c).sum(),
            PanelData::Anos(v) => v.iter().map(|(_, c)| c).sum(),
        }
    }

    /// Labels and counts in display order, label rendered as text.
    pub fn rotulos(&self) -> Vec<(String, u64)> {
        match self {
            PanelData::Categorias(v) => v.clone(),
            PanelData::Anos(v) => v.iter().map(|&(ano, c)| (ano.to_string(), c)).collect(),
        }
    }
}

/// Count rows per distinct value, descending by count.
///
/// Ties keep first-seen order so the result is stable across re-runs of an
/// unchanged dataset.
pub fn value_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<(String, u64)> {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, u64)> = Vec::new();

    for value in values {
        match first_seen.get(value) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                first_seen.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by_key(|&i| (std::cmp::Reverse(counts[i].1), i));
    order
        .into_iter()
        .map(|i| (counts[i].0.to_string(), counts[i].1))
        .collect()
}

/// Group reports by integer year, ascending.
///
/// A non-coercible value is a data-quality error naming the offending value;
/// the caller decides whether that invalidates the whole panel batch.
pub fn year_counts(laudos: &[Laudo]) -> Result<Vec<(i32, u64)>, AppError> {
    let mut counts: std::collections::BTreeMap<i32, u64> = std::collections::BTreeMap::new();
    for laudo in laudos {
        let ano = laudo.ano.trim().parse::<i32>().map_err(|_| {
            AppError::data(format!(
                "A coluna 'ano' possui valores não numéricos ('{}').",
                laudo.ano
            ))
        })?;
        *counts.entry(ano).or_insert(0) += 1;
    }
    Ok(counts.into_iter().collect())
}

/// Aggregate one dimension of the report dataset.
pub fn aggregate(dim: Dimension, laudos: &[Laudo]) -> Result<PanelData, AppError> {
    match dim {
        Dimension::Ano => Ok(PanelData::Anos(year_counts(laudos)?)),
        _ => Ok(PanelData::Categorias(value_counts(
            laudos.iter().map(|l| dim.valor(l)),
        ))),
    }
}
