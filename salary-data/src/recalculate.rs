use salary_core::calculations::recalculate_position;
use salary_core::{PayrollCalculator, RepositoryError, SalaryConfig, SalaryRepository};
use serde::Serialize;
use tracing::info;

/// Counts from one [`PlanningRecalculator::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecalculationSummary {
    /// Positions read.
    pub processed: usize,
    /// Positions whose gross components were written back.
    pub updated: usize,
    /// Positions whose total gross moved by more than
    /// [`GROSS_CHANGE_THRESHOLD`](salary_core::calculations::GROSS_CHANGE_THRESHOLD).
    pub changed: usize,
}

/// Re-derives every planning position's gross amounts after a config change.
pub struct PlanningRecalculator;

impl PlanningRecalculator {
    /// Recalculate all stored positions under `config` and persist those
    /// whose gross components differ.
    ///
    /// An invalid `config` is clamped into range, with a warning, before use.
    pub async fn run<R: SalaryRepository + ?Sized>(
        repo: &R,
        config: &SalaryConfig,
    ) -> Result<RecalculationSummary, RepositoryError> {
        let calculator = PayrollCalculator::lenient(config);
        let positions = repo.list_planning_positions().await?;
        let mut summary = RecalculationSummary::default();

        for position in &positions {
            let result = recalculate_position(&calculator, position);
            summary.processed += 1;

            if result.position != *position {
                repo.update_planning_position(&result.position).await?;
                summary.updated += 1;
            }
            if result.changed {
                summary.changed += 1;
            }
        }

        info!(
            processed = summary.processed,
            updated = summary.updated,
            changed = summary.changed,
            "Recalculated planning positions"
        );
        Ok(summary)
    }
}
