//! Shared pipeline logic used by both the CLI reports and the TUI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! query -> typed rows -> per-dimension aggregation -> panel plan
//! query -> open-transit join -> sort/format -> listing
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! The two artifacts are built independently: a data-quality notice on one
//! never blocks the other.

use crate::abertos::OpenListing;
use crate::data::executor::QueryExecutor;
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::panel::PanelPlan;

/// All computed outputs of one panel run.
#[derive(Debug, Clone)]
pub struct PanelsRun {
    pub plan: PanelPlan,
    pub total_laudos: usize,
}

/// Load the dataset and build the panel plan.
pub fn run_panels(exec: &dyn QueryExecutor, config: &RunConfig) -> Result<PanelsRun, AppError> {
    let laudos = crate::data::laudos::load_laudos(exec)?;
    let plan = crate::panel::build_plan(&config.catalog, &laudos, config.year_policy)?;
    Ok(PanelsRun {
        plan,
        total_laudos: laudos.len(),
    })
}

/// Run the open-transit query and build the listing.
pub fn run_abertos(exec: &dyn QueryExecutor) -> Result<OpenListing, AppError> {
    let linhas = crate::data::laudos::load_abertos(exec)?;
    Ok(crate::abertos::montar_listagem(linhas))
}
