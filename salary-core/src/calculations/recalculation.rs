//! Re-deriving a planning position's gross components from its net ones.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::{PayrollCalculator, SolverOptions};
use crate::models::PlanningPosition;

/// A total gross change of at most this many units counts as unchanged.
pub const GROSS_CHANGE_THRESHOLD: Decimal = Decimal::ONE;

/// Result of [`recalculate_position`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionRecalculation {
    /// The position with fresh gross components.
    pub position: PlanningPosition,
    pub previous_total_gross: Decimal,
    /// True when the total gross moved by more than
    /// [`GROSS_CHANGE_THRESHOLD`].
    pub changed: bool,
}

impl PayrollCalculator {
    /// Gross for one net component of a planning position. Positions always
    /// apply the personal deduction, to each component on its own.
    pub fn planned_gross(
        &self,
        net: Decimal,
    ) -> Decimal {
        self.solve_gross(net, true, &SolverOptions::default()).gross
    }
}

/// Solves every gross component of `position` again under `calculator`'s
/// config.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use salary_core::calculations::recalculate_position;
/// use salary_core::{DEFAULT_SALARY_CONFIG, PayrollCalculator, PlanningPosition};
///
/// let position = PlanningPosition {
///     id: 1,
///     position_title: "Engineer".to_string(),
///     department: None,
///     base_net: dec!(243655),
///     kpi_net: dec!(0),
///     bonus_net: dec!(0),
///     base_gross: dec!(0),
///     kpi_gross: dec!(0),
///     bonus_gross: dec!(0),
/// };
///
/// let calculator = PayrollCalculator::lenient(&DEFAULT_SALARY_CONFIG);
/// let result = recalculate_position(&calculator, &position);
///
/// assert_eq!(result.position.base_gross, dec!(300000));
/// assert!(result.changed);
/// ```
pub fn recalculate_position(
    calculator: &PayrollCalculator,
    position: &PlanningPosition,
) -> PositionRecalculation {
    let previous_total_gross = position.total_gross();

    let updated = PlanningPosition {
        base_gross: calculator.planned_gross(position.base_net),
        kpi_gross: calculator.planned_gross(position.kpi_net),
        bonus_gross: calculator.planned_gross(position.bonus_net),
        ..position.clone()
    };

    let changed = (updated.total_gross() - previous_total_gross).abs() > GROSS_CHANGE_THRESHOLD;
    debug!(
        position_id = position.id,
        previous_total_gross = %previous_total_gross,
        total_gross = %updated.total_gross(),
        changed,
        "Recalculated planning position"
    );

    PositionRecalculation {
        position: updated,
        previous_total_gross,
        changed,
    }
}
