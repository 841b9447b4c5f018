//! Inverse payroll calculation: net salary to gross salary.
//!
//! The forward calculation is piecewise linear with kinks at every
//! contribution cap, so the gross is found numerically by bisection on
//! [`PayrollCalculator::calculate`]. Bisection relies on the net salary being
//! non-decreasing in gross, which holds while every rate lies in [0, 1] and
//! the employee pension and medical rates together stay at or below 1.
//!
//! The search starts from the bracket `[net, net × 2.5]`. When the bracket's
//! upper end still yields less than the requested net (only possible with a
//! combined tax burden above 60%), the bracket is widened by doubling before
//! bisecting. [`SolverOptions::legacy`] disables widening and limits the
//! search to 20 iterations, reproducing earlier results exactly.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::PayrollCalculator;
use crate::calculations::common::round_whole;
use crate::models::SalaryConfig;

/// Iteration budget of the legacy search.
pub const LEGACY_MAX_ITERATIONS: u32 = 20;

/// Default iteration budget. The first [`LEGACY_MAX_ITERATIONS`] steps are
/// identical to the legacy search.
pub const DEFAULT_MAX_ITERATIONS: u32 = 64;

/// Upper limit on bracket doublings.
pub const MAX_BRACKET_EXPANSIONS: u32 = 32;

const DEFAULT_UPPER_BOUND_FACTOR: Decimal = dec!(2.5);

const DEFAULT_TOLERANCE: Decimal = Decimal::ONE;

/// Tuning for [`PayrollCalculator::solve_gross`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverOptions {
    pub max_iterations: u32,
    /// Stop once the candidate's rounded net is closer than this to the target.
    pub tolerance: Decimal,
    /// Initial upper bound as a multiple of the target net.
    pub upper_bound_factor: Decimal,
    /// Widen the bracket when it does not contain the root.
    pub expand_bracket: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            upper_bound_factor: DEFAULT_UPPER_BOUND_FACTOR,
            expand_bracket: true,
        }
    }
}

impl SolverOptions {
    /// Twenty iterations from the fixed `[net, net × 2.5]` bracket.
    pub fn legacy() -> Self {
        Self {
            max_iterations: LEGACY_MAX_ITERATIONS,
            expand_bracket: false,
            ..Self::default()
        }
    }
}

/// Outcome of a gross search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossSolution {
    /// Gross salary rounded to a whole unit.
    pub gross: Decimal,
    /// Whether the tolerance was met. When false, `gross` is the last
    /// midpoint tried.
    pub converged: bool,
    pub iterations: u32,
    pub bracket_expansions: u32,
}

impl GrossSolution {
    fn zero() -> Self {
        Self {
            gross: Decimal::ZERO,
            converged: true,
            iterations: 0,
            bracket_expansions: 0,
        }
    }
}

impl PayrollCalculator {
    /// Finds the gross salary whose net salary is `net`.
    ///
    /// A net of zero or less yields a gross of zero. The search never fails;
    /// a result that missed the tolerance is flagged with
    /// `converged = false` and logged.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use salary_core::{DEFAULT_SALARY_CONFIG, PayrollCalculator, SolverOptions};
    ///
    /// let calculator = PayrollCalculator::lenient(&DEFAULT_SALARY_CONFIG);
    /// let solution = calculator.solve_gross(dec!(243655), true, &SolverOptions::default());
    ///
    /// assert_eq!(solution.gross, dec!(300000));
    /// assert!(solution.converged);
    /// ```
    pub fn solve_gross(
        &self,
        net: Decimal,
        apply_deduction: bool,
        options: &SolverOptions,
    ) -> GrossSolution {
        if net <= Decimal::ZERO {
            debug!(net = %net, "Net is not positive; gross is zero");
            return GrossSolution::zero();
        }

        let mut low = net;
        let mut high = net
            .checked_mul(options.upper_bound_factor)
            .unwrap_or(Decimal::MAX);

        let bracket_expansions = if options.expand_bracket {
            self.expand_bracket(net, apply_deduction, &mut low, &mut high)
        } else {
            0
        };

        let mut mid = low;
        for iteration in 1..=options.max_iterations {
            mid = midpoint(low, high);
            let candidate = self.calculate(mid, apply_deduction).net;

            if (candidate - net).abs() < options.tolerance {
                return GrossSolution {
                    gross: round_whole(mid),
                    converged: true,
                    iterations: iteration,
                    bracket_expansions,
                };
            }

            if candidate < net {
                low = mid;
            } else {
                high = mid;
            }
        }

        let gross = round_whole(mid);
        warn!(
            net = %net,
            gross = %gross,
            iterations = options.max_iterations,
            apply_deduction,
            "Gross search did not converge; returning best approximation"
        );
        GrossSolution {
            gross,
            converged: false,
            iterations: options.max_iterations,
            bracket_expansions,
        }
    }

    /// Doubles `high` until it yields at least `net`, moving `low` up behind
    /// it. Returns the number of doublings.
    fn expand_bracket(
        &self,
        net: Decimal,
        apply_deduction: bool,
        low: &mut Decimal,
        high: &mut Decimal,
    ) -> u32 {
        let mut expansions = 0;
        while expansions < MAX_BRACKET_EXPANSIONS
            && self.calculate(*high, apply_deduction).net < net
        {
            let Some(wider) = high.checked_mul(dec!(2)) else {
                break;
            };
            *low = *high;
            *high = wider;
            expansions += 1;
        }

        if expansions > 0 {
            warn!(
                net = %net,
                expansions,
                high = %high,
                "Initial gross bracket too narrow; widened"
            );
        }
        expansions
    }
}

fn midpoint(
    low: Decimal,
    high: Decimal,
) -> Decimal {
    match low.checked_add(high) {
        Some(sum) => sum / dec!(2),
        None => low + (high - low) / dec!(2),
    }
}

/// Returns the whole-unit gross salary whose net salary is `net`.
///
/// Never fails. Uses [`SolverOptions::default`] and clamps an out-of-range
/// config; call [`PayrollCalculator::solve_gross`] to inspect convergence.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use salary_core::{DEFAULT_SALARY_CONFIG, solve_gross_from_net};
///
/// assert_eq!(solve_gross_from_net(dec!(243655), &DEFAULT_SALARY_CONFIG, true), dec!(300000));
/// assert_eq!(solve_gross_from_net(dec!(0), &DEFAULT_SALARY_CONFIG, true), dec!(0));
/// ```
pub fn solve_gross_from_net(
    net: Decimal,
    config: &SalaryConfig,
    apply_deduction: bool,
) -> Decimal {
    PayrollCalculator::lenient(config)
        .solve_gross(net, apply_deduction, &SolverOptions::default())
        .gross
}
