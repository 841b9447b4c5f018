//! Forward payroll calculation: gross salary to net salary.
//!
//! Each employee contribution is taken from a capped base, then income tax is
//! charged on what remains after the contributions and the personal
//! deduction.
//!
//! | Step | Amount |
//! |------|--------|
//! | 1 | Pension (OPV): `min(gross, opv_limit_mzp × mzp) × opv_rate` |
//! | 2 | Medical (VOSMS): `min(gross, vosms_limit_mzp × mzp) × vosms_rate` |
//! | 3 | Deduction: `ipn_deduction_mrp × mrp`, or zero when not applied |
//! | 4 | Income-tax base: `max(0, gross − opv − vosms − deduction)` |
//! | 5 | Income tax (IPN): `base × ipn_rate` |
//! | 6 | Net: `gross − opv − vosms − ipn` |
//! | 7 | Employer pension (OPVR): `min(gross, opvr_limit_mzp × mzp) × opvr_rate` |
//!
//! Every output field is rounded to a whole unit independently, so the
//! rounded components need not add up to the rounded net exactly.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use salary_core::{DEFAULT_SALARY_CONFIG, PayrollCalculator};
//!
//! let calculator = PayrollCalculator::new(DEFAULT_SALARY_CONFIG).unwrap();
//! let result = calculator.calculate(dec!(300000), true);
//!
//! assert_eq!(result.net, dec!(243655));
//! assert_eq!(result.opv, dec!(30000));
//! assert_eq!(result.vosms, dec!(6000));
//! assert_eq!(result.ipn, dec!(20345));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{capped, non_negative, round_whole};
use crate::models::{SalaryConfig, SalaryConfigError};

/// Rounded result of a forward calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub gross: Decimal,
    pub net: Decimal,
    /// Employee pension contribution.
    pub opv: Decimal,
    /// Employee medical-insurance contribution.
    pub vosms: Decimal,
    /// Individual income tax.
    pub ipn: Decimal,
    /// Employer pension contribution. Informational; not part of `net`.
    pub opvr: Decimal,
}

impl TaxBreakdown {
    /// The canonical result for a non-positive gross.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Unrounded employee-side amounts for one gross salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Withholdings {
    pub opv: Decimal,
    pub vosms: Decimal,
    pub deduction: Decimal,
    pub ipn: Decimal,
    pub net: Decimal,
}

/// Payroll calculations bound to one [`SalaryConfig`].
///
/// Construct with [`PayrollCalculator::new`] to reject out-of-range
/// configurations, or with [`PayrollCalculator::lenient`] to clamp them.
/// Either way the calculator only ever holds a config whose rates lie in
/// [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayrollCalculator {
    config: SalaryConfig,
}

impl PayrollCalculator {
    /// Creates a calculator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SalaryConfigError`] reported by
    /// [`SalaryConfig::validate`].
    pub fn new(config: SalaryConfig) -> Result<Self, SalaryConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Creates a calculator that never fails, clamping `config` into range.
    pub fn lenient(config: &SalaryConfig) -> Self {
        if let Err(error) = config.validate() {
            warn!(
                error = %error,
                "Salary config out of range; calculating with clamped values"
            );
        }
        Self {
            config: config.clamped(),
        }
    }

    pub fn config(&self) -> &SalaryConfig {
        &self.config
    }

    /// Calculates net salary and withholdings for a gross salary.
    ///
    /// A gross of zero or less yields [`TaxBreakdown::zero`].
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use salary_core::{DEFAULT_SALARY_CONFIG, PayrollCalculator, TaxBreakdown};
    ///
    /// let calculator = PayrollCalculator::lenient(&DEFAULT_SALARY_CONFIG);
    ///
    /// assert_eq!(calculator.calculate(dec!(-5), true), TaxBreakdown::zero());
    /// assert_eq!(calculator.calculate(dec!(100000), false).net, dec!(79200));
    /// ```
    pub fn calculate(
        &self,
        gross: Decimal,
        apply_deduction: bool,
    ) -> TaxBreakdown {
        if gross <= Decimal::ZERO {
            debug!(gross = %gross, "Gross is not positive; returning zero breakdown");
            return TaxBreakdown::zero();
        }

        let withholdings = self.withholdings(gross, apply_deduction);

        // Step 7: Employer pension, reported alongside
        let opvr = self.employer_pension(gross);

        TaxBreakdown {
            gross: round_whole(gross),
            net: round_whole(withholdings.net),
            opv: round_whole(withholdings.opv),
            vosms: round_whole(withholdings.vosms),
            ipn: round_whole(withholdings.ipn),
            opvr: round_whole(opvr),
        }
    }

    /// Runs steps 1 through 6 without rounding. `gross` must be positive.
    pub(crate) fn withholdings(
        &self,
        gross: Decimal,
        apply_deduction: bool,
    ) -> Withholdings {
        // Step 1: Pension contribution
        let opv = self.pension_contribution(gross);

        // Step 2: Medical contribution
        let vosms = self.medical_contribution(gross);

        // Step 3: Personal deduction
        let deduction = self.income_tax_deduction(apply_deduction);

        // Step 4: Income-tax base
        let ipn_base = self.income_tax_base(gross, opv, vosms, deduction);

        // Step 5: Income tax
        let ipn = self.income_tax(ipn_base);

        // Step 6: Net
        let net = gross - opv - vosms - ipn;

        Withholdings {
            opv,
            vosms,
            deduction,
            ipn,
            net,
        }
    }

    fn pension_contribution(
        &self,
        gross: Decimal,
    ) -> Decimal {
        capped(gross, self.config.opv_cap()) * self.config.opv_rate
    }

    fn medical_contribution(
        &self,
        gross: Decimal,
    ) -> Decimal {
        capped(gross, self.config.vosms_cap()) * self.config.vosms_rate
    }

    fn income_tax_deduction(
        &self,
        apply_deduction: bool,
    ) -> Decimal {
        if apply_deduction {
            self.config.ipn_deduction()
        } else {
            Decimal::ZERO
        }
    }

    /// Never negative: a deduction larger than the remaining income leaves
    /// nothing to tax.
    fn income_tax_base(
        &self,
        gross: Decimal,
        opv: Decimal,
        vosms: Decimal,
        deduction: Decimal,
    ) -> Decimal {
        non_negative((gross - opv - vosms).saturating_sub(deduction))
    }

    fn income_tax(
        &self,
        ipn_base: Decimal,
    ) -> Decimal {
        ipn_base * self.config.ipn_rate
    }

    pub(crate) fn employer_pension(
        &self,
        gross: Decimal,
    ) -> Decimal {
        capped(gross, self.config.opvr_cap()) * self.config.effective_opvr_rate()
    }
}

/// Calculates taxes for `gross` under `config`.
///
/// Never fails. An out-of-range config is clamped (with a warning) rather
/// than rejected; use [`PayrollCalculator::new`] to reject it instead.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use salary_core::{DEFAULT_SALARY_CONFIG, calculate_taxes};
///
/// let result = calculate_taxes(dec!(300000), &DEFAULT_SALARY_CONFIG, true);
///
/// assert_eq!(result.gross, dec!(300000));
/// assert_eq!(result.net, dec!(243655));
/// assert_eq!(result.opvr, dec!(7500));
/// ```
pub fn calculate_taxes(
    gross: Decimal,
    config: &SalaryConfig,
    apply_deduction: bool,
) -> TaxBreakdown {
    PayrollCalculator::lenient(config).calculate(gross, apply_deduction)
}
