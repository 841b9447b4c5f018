//! Payroll calculations.
//!
//! Everything here is synchronous and pure: a [`PayrollCalculator`] holds a
//! copy of its [`SalaryConfig`](crate::SalaryConfig) and nothing else, so it
//! can be shared across threads freely.

pub mod common;
mod employer;
mod gross_solver;
mod payroll;
mod recalculation;
mod salary_request;

pub use employer::{EmployerContributions, SO_BASE_CAP_MZP, SO_BASE_FLOOR_MZP};
pub use gross_solver::{
    DEFAULT_MAX_ITERATIONS, GrossSolution, LEGACY_MAX_ITERATIONS, MAX_BRACKET_EXPANSIONS,
    SolverOptions, solve_gross_from_net,
};
pub use payroll::{PayrollCalculator, TaxBreakdown, calculate_taxes};
pub use recalculation::{GROSS_CHANGE_THRESHOLD, PositionRecalculation, recalculate_position};
pub use salary_request::{
    AmountKind, ParseAmountKindError, SalaryBreakdown, SalaryRequest,
};
