//! Panel plan: map an ordered dimension catalog onto a fixed-capacity grid.
//!
//! The contract: the first N catalog dimensions fill the first N slots in
//! catalog order; unfilled slots are deleted from the rendered artifact,
//! never left as empty placeholders. A catalog longer than the grid is
//! truncated to capacity.

use rayon::prelude::*;

use crate::agg::{self, PanelData};
use crate::domain::{Dimension, Encoding, Laudo, YearPolicy};
use crate::error::AppError;

pub const GRID_ROWS: usize = 2;
pub const GRID_COLS: usize = 3;
/// Fixed maximum number of panel slots in the composed artifact.
pub const GRID_CAPACITY: usize = GRID_ROWS * GRID_COLS;

/// User-visible notice when the source query returns zero rows.
pub const AVISO_SEM_DADOS: &str = "Não há dados para gerar gráficos.";

/// One chart cell of the composed artifact.
#[derive(Debug, Clone)]
pub struct Panel {
    pub dimension: Dimension,
    pub encoding: Encoding,
    pub data: PanelData,
}

impl Panel {
    pub fn titulo(&self) -> &'static str {
        self.dimension.titulo()
    }
}

/// The composed plan: at most `GRID_CAPACITY` panels, in catalog order.
#[derive(Debug, Clone)]
pub struct PanelPlan {
    pub panels: Vec<Panel>,
    /// Dimensions that were dropped and why (only under `YearPolicy::Partial`).
    pub skipped: Vec<(Dimension, String)>,
}

/// Build the panel plan for a catalog over the loaded dataset.
///
/// Independent dimensions have no data dependency on each other, so they are
/// aggregated in parallel with read-only access to the slice.
pub fn build_plan(
    catalog: &[Dimension],
    laudos: &[Laudo],
    year_policy: YearPolicy,
) -> Result<PanelPlan, AppError> {
    if laudos.is_empty() {
        return Err(AppError::data(AVISO_SEM_DADOS));
    }

    let slots = &catalog[..catalog.len().min(GRID_CAPACITY)];

    let aggregated: Vec<(Dimension, Result<PanelData, AppError>)> = slots
        .par_iter()
        .map(|&dim| (dim, agg::aggregate(dim, laudos)))
        .collect();

    let mut panels = Vec::with_capacity(slots.len());
    let mut skipped = Vec::new();
    for (dim, result) in aggregated {
        match result {
            Ok(data) => panels.push(Panel {
                dimension: dim,
                encoding: dim.encoding(),
                data,
            }),
            Err(err) => match year_policy {
                YearPolicy::AbortAll => return Err(err),
                YearPolicy::Partial => skipped.push((dim, err.to_string())),
            },
        }
    }

    Ok(PanelPlan { panels, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laudo(opm: &str, ano: &str) -> Laudo {
        Laudo {
            id: 0,
            numero_laudo: String::new(),
            ano: ano.to_string(),
            opm: opm.to_string(),
            perito_relator: "P".to_string(),
            marca_arma: "M".to_string(),
            modelo_arma: "Mo".to_string(),
            descricao_exame: "E".to_string(),
        }
    }

    fn dataset() -> Vec<Laudo> {
        vec![laudo("A", "2020"), laudo("A", "2021"), laudo("B", "2020")]
    }

    #[test]
    fn full_catalog_fills_all_six_slots_in_order() {
        let plan = build_plan(&Dimension::TODAS, &dataset(), YearPolicy::AbortAll).unwrap();
        assert_eq!(plan.panels.len(), GRID_CAPACITY);
        let dims: Vec<Dimension> = plan.panels.iter().map(|p| p.dimension).collect();
        assert_eq!(dims, Dimension::TODAS.to_vec());
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn reduced_catalog_produces_exactly_that_many_panels() {
        let catalog = [
            Dimension::Opm,
            Dimension::Ano,
            Dimension::PeritoRelator,
            Dimension::MarcaArma,
        ];
        let plan = build_plan(&catalog, &dataset(), YearPolicy::AbortAll).unwrap();
        assert_eq!(plan.panels.len(), 4);
    }

    #[test]
    fn oversized_catalog_is_truncated_to_capacity() {
        let mut catalog = Dimension::TODAS.to_vec();
        catalog.push(Dimension::Opm);
        let plan = build_plan(&catalog, &dataset(), YearPolicy::AbortAll).unwrap();
        assert_eq!(plan.panels.len(), GRID_CAPACITY);
    }

    #[test]
    fn empty_dataset_is_signaled_before_any_panel_is_built() {
        let err = build_plan(&Dimension::TODAS, &[], YearPolicy::AbortAll).unwrap_err();
        assert_eq!(err.to_string(), AVISO_SEM_DADOS);
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn bad_year_aborts_the_whole_batch_by_default() {
        let mut rows = dataset();
        rows.push(laudo("C", "abc"));
        let err = build_plan(&Dimension::TODAS, &rows, YearPolicy::AbortAll).unwrap_err();
        assert!(err.to_string().contains("não numéricos"));
    }

    #[test]
    fn bad_year_under_partial_policy_keeps_the_other_panels() {
        let mut rows = dataset();
        rows.push(laudo("C", "abc"));
        let plan = build_plan(&Dimension::TODAS, &rows, YearPolicy::Partial).unwrap();
        assert_eq!(plan.panels.len(), GRID_CAPACITY - 1);
        assert!(plan.panels.iter().all(|p| p.dimension != Dimension::Ano));
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].0, Dimension::Ano);
    }

    #[test]
    fn aggregation_matches_reference_scenario() {
        let plan = build_plan(&[Dimension::Opm, Dimension::Ano], &dataset(), YearPolicy::AbortAll)
            .unwrap();
        assert_eq!(
            plan.panels[0].data,
            PanelData::Categorias(vec![("A".to_string(), 2), ("B".to_string(), 1)])
        );
        assert_eq!(plan.panels[1].data, PanelData::Anos(vec![(2020, 2), (2021, 1)]));
    }

    #[test]
    fn rebuilding_yields_identical_assignment() {
        let first = build_plan(&Dimension::TODAS, &dataset(), YearPolicy::AbortAll).unwrap();
        let second = build_plan(&Dimension::TODAS, &dataset(), YearPolicy::AbortAll).unwrap();
        for (a, b) in first.panels.iter().zip(second.panels.iter()) {
            assert_eq!(a.dimension, b.dimension);
            assert_eq!(a.data, b.data);
        }
    }
}
