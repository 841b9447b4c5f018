use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A budgeted position whose pay is planned as net amounts.
///
/// Gross amounts are derived from the net amounts and the active
/// [`SalaryConfig`](super::SalaryConfig), and go stale when it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningPosition {
    pub id: i64,
    pub position_title: String,
    pub department: Option<String>,
    pub base_net: Decimal,
    pub kpi_net: Decimal,
    pub bonus_net: Decimal,
    pub base_gross: Decimal,
    pub kpi_gross: Decimal,
    pub bonus_gross: Decimal,
}

impl PlanningPosition {
    pub fn total_net(&self) -> Decimal {
        self.base_net + self.kpi_net + self.bonus_net
    }

    pub fn total_gross(&self) -> Decimal {
        self.base_gross + self.kpi_gross + self.bonus_gross
    }
}

/// A position to insert. Gross amounts start at zero until recalculated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlanningPosition {
    pub position_title: String,
    pub department: Option<String>,
    pub base_net: Decimal,
    pub kpi_net: Decimal,
    pub bonus_net: Decimal,
}
