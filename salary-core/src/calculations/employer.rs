//! Employer-side contributions.
//!
//! These amounts are paid on top of the gross salary and never reduce the
//! employee's net pay. They are computed for budgeting.
//!
//! | Amount | Formula |
//! |--------|---------|
//! | OSMS | `min(gross, vosms_limit_mzp × mzp) × vosms_employer_rate` |
//! | SO | `clamp(gross − opv, 1 × mzp, 7 × mzp) × so_rate` |
//! | SN | `max(0, (gross − opv) × sn_rate − so)` |
//! | OPVR | `min(gross, opvr_limit_mzp × mzp) × opvr_rate` |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::PayrollCalculator;
use crate::calculations::common::{capped, non_negative, round_whole};

/// Lower bound of the social payment base, in multiples of `mzp`.
pub const SO_BASE_FLOOR_MZP: Decimal = dec!(1);

/// Upper bound of the social payment base, in multiples of `mzp`.
pub const SO_BASE_CAP_MZP: Decimal = dec!(7);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerContributions {
    /// Employer medical-insurance contribution.
    pub osms: Decimal,
    /// Social payment.
    pub so: Decimal,
    /// Social tax, net of the social payment.
    pub sn: Decimal,
    /// Employer pension contribution.
    pub opvr: Decimal,
}

impl PayrollCalculator {
    /// Calculates the employer's contributions for a gross salary.
    ///
    /// A gross of zero or less yields all zeros.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use salary_core::{DEFAULT_SALARY_CONFIG, PayrollCalculator};
    ///
    /// let calculator = PayrollCalculator::lenient(&DEFAULT_SALARY_CONFIG);
    /// let employer = calculator.employer_contributions(dec!(300000));
    ///
    /// assert_eq!(employer.osms, dec!(9000));
    /// assert_eq!(employer.so, dec!(9450));
    /// assert_eq!(employer.sn, dec!(16200));
    /// assert_eq!(employer.opvr, dec!(7500));
    /// ```
    pub fn employer_contributions(
        &self,
        gross: Decimal,
    ) -> EmployerContributions {
        if gross <= Decimal::ZERO {
            debug!(gross = %gross, "Gross is not positive; no employer contributions");
            return EmployerContributions::default();
        }

        let config = self.config();
        let opv = self.withholdings(gross, false).opv;
        let after_pension = gross - opv;

        let osms = capped(gross, config.vosms_cap()) * config.vosms_employer_rate;

        let so_base = after_pension.clamp(
            SO_BASE_FLOOR_MZP.saturating_mul(config.mzp),
            SO_BASE_CAP_MZP.saturating_mul(config.mzp),
        );
        let so = so_base * config.so_rate;

        let sn = non_negative(after_pension * config.sn_rate - so);

        let opvr = self.employer_pension(gross);

        EmployerContributions {
            osms: round_whole(osms),
            so: round_whole(so),
            sn: round_whole(sn),
            opvr: round_whole(opvr),
        }
    }
}
