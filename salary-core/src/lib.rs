pub mod calculations;
pub mod db;
pub mod models;

pub use calculations::{
    GrossSolution, PayrollCalculator, SalaryBreakdown, SolverOptions, TaxBreakdown,
    calculate_taxes, solve_gross_from_net,
};
pub use db::{
    DEFAULT_HISTORY_LIMIT, DbConfig, RepositoryError, RepositoryFactory, RepositoryRegistry,
    SalaryRepository,
};
pub use models::*;
