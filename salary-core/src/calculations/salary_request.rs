//! Full salary breakdown from either a net or a gross amount.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::round_whole;
use crate::calculations::{PayrollCalculator, SolverOptions};

/// Whether a [`SalaryRequest`] amount is net or gross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountKind {
    Net,
    Gross,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown amount kind '{0}', expected 'net' or 'gross'")]
pub struct ParseAmountKindError(String);

impl FromStr for AmountKind {
    type Err = ParseAmountKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "net" => Ok(Self::Net),
            "gross" => Ok(Self::Gross),
            _ => Err(ParseAmountKindError(s.to_string())),
        }
    }
}

impl fmt::Display for AmountKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Net => f.write_str("net"),
            Self::Gross => f.write_str("gross"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRequest {
    pub amount: Decimal,
    pub kind: AmountKind,
    #[serde(default = "default_apply_deduction")]
    pub apply_deduction: bool,
}

fn default_apply_deduction() -> bool {
    true
}

impl SalaryRequest {
    pub fn net(amount: Decimal) -> Self {
        Self {
            amount,
            kind: AmountKind::Net,
            apply_deduction: true,
        }
    }

    pub fn gross(amount: Decimal) -> Self {
        Self {
            amount,
            kind: AmountKind::Gross,
            apply_deduction: true,
        }
    }

    pub fn without_deduction(self) -> Self {
        Self {
            apply_deduction: false,
            ..self
        }
    }
}

/// Employee and employer amounts for one salary, all whole units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    pub gross: Decimal,
    pub net: Decimal,
    pub opv: Decimal,
    pub vosms: Decimal,
    pub ipn: Decimal,
    pub osms: Decimal,
    pub so: Decimal,
    pub sn: Decimal,
    pub opvr: Decimal,
    /// Income-tax deduction used; zero when not applied.
    pub deduction_applied: Decimal,
}

impl SalaryBreakdown {
    /// Gross plus every employer contribution.
    pub fn employer_cost(&self) -> Decimal {
        self.gross + self.osms + self.so + self.sn + self.opvr
    }
}

impl fmt::Display for SalaryBreakdown {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Gross                 {:>12}", self.gross)?;
        writeln!(f, "  Pension (OPV)       {:>12}", self.opv)?;
        writeln!(f, "  Medical (VOSMS)     {:>12}", self.vosms)?;
        writeln!(f, "  Income tax (IPN)    {:>12}", self.ipn)?;
        writeln!(f, "  Deduction applied   {:>12}", self.deduction_applied)?;
        writeln!(f, "Net                   {:>12}", self.net)?;
        writeln!(f, "Employer")?;
        writeln!(f, "  Medical (OSMS)      {:>12}", self.osms)?;
        writeln!(f, "  Social payment (SO) {:>12}", self.so)?;
        writeln!(f, "  Social tax (SN)     {:>12}", self.sn)?;
        writeln!(f, "  Pension (OPVR)      {:>12}", self.opvr)?;
        write!(f, "Employer cost         {:>12}", self.employer_cost())
    }
}

impl PayrollCalculator {
    /// Resolves a request to a full breakdown.
    ///
    /// A net amount is first converted to gross with
    /// [`PayrollCalculator::solve_gross`] using `options`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use salary_core::calculations::SalaryRequest;
    /// use salary_core::{DEFAULT_SALARY_CONFIG, PayrollCalculator, SolverOptions};
    ///
    /// let calculator = PayrollCalculator::lenient(&DEFAULT_SALARY_CONFIG);
    /// let breakdown = calculator.calculate_salary(
    ///     &SalaryRequest::net(dec!(243655)),
    ///     &SolverOptions::default(),
    /// );
    ///
    /// assert_eq!(breakdown.gross, dec!(300000));
    /// assert_eq!(breakdown.deduction_applied, dec!(60550));
    /// ```
    pub fn calculate_salary(
        &self,
        request: &SalaryRequest,
        options: &SolverOptions,
    ) -> SalaryBreakdown {
        let gross = match request.kind {
            AmountKind::Gross => request.amount,
            AmountKind::Net => {
                self.solve_gross(request.amount, request.apply_deduction, options)
                    .gross
            }
        };
        self.breakdown(gross, request.apply_deduction)
    }

    /// Full breakdown for a known gross.
    pub fn breakdown(
        &self,
        gross: Decimal,
        apply_deduction: bool,
    ) -> SalaryBreakdown {
        if gross <= Decimal::ZERO {
            return SalaryBreakdown::default();
        }

        let taxes = self.calculate(gross, apply_deduction);
        let employer = self.employer_contributions(gross);
        let deduction = self.withholdings(gross, apply_deduction).deduction;

        SalaryBreakdown {
            gross: taxes.gross,
            net: taxes.net,
            opv: taxes.opv,
            vosms: taxes.vosms,
            ipn: taxes.ipn,
            osms: employer.osms,
            so: employer.so,
            sn: employer.sn,
            opvr: employer.opvr,
            deduction_applied: round_whole(deduction),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::DEFAULT_SALARY_CONFIG;

    fn test_calculator() -> PayrollCalculator {
        PayrollCalculator::new(DEFAULT_SALARY_CONFIG).expect("default config is valid")
    }

    // =========================================================================
    // AmountKind
    // =========================================================================

    #[test]
    fn amount_kind_parses_case_insensitively() {
        assert_eq!("net".parse::<AmountKind>(), Ok(AmountKind::Net));
        assert_eq!("GROSS".parse::<AmountKind>(), Ok(AmountKind::Gross));
        assert_eq!(" Net ".parse::<AmountKind>(), Ok(AmountKind::Net));
    }

    #[test]
    fn amount_kind_rejects_unknown_value() {
        let result: Result<AmountKind, _> = "take-home".parse();

        assert_eq!(result, Err(ParseAmountKindError("take-home".to_string())));
    }

    #[test]
    fn amount_kind_displays_lowercase() {
        assert_eq!(AmountKind::Gross.to_string(), "gross");
    }

    // =========================================================================
    // calculate_salary
    // =========================================================================

    #[test]
    fn gross_request_includes_employer_side() {
        let breakdown = test_calculator()
            .calculate_salary(&SalaryRequest::gross(dec!(300000)), &SolverOptions::default());

        assert_eq!(
            breakdown,
            SalaryBreakdown {
                gross: dec!(300000),
                net: dec!(243655),
                opv: dec!(30000),
                vosms: dec!(6000),
                ipn: dec!(20345),
                osms: dec!(9000),
                so: dec!(9450),
                sn: dec!(16200),
                opvr: dec!(7500),
                deduction_applied: dec!(60550),
            }
        );
        assert_eq!(breakdown.employer_cost(), dec!(342150));
    }

    #[test]
    fn net_request_solves_gross_first() {
        let breakdown = test_calculator()
            .calculate_salary(&SalaryRequest::net(dec!(243655)), &SolverOptions::default());

        assert_eq!(breakdown.gross, dec!(300000));
        assert_eq!(breakdown.net, dec!(243655));
    }

    #[test]
    fn request_without_deduction_reports_zero_deduction() {
        let request = SalaryRequest::gross(dec!(100000)).without_deduction();

        let breakdown = test_calculator().calculate_salary(&request, &SolverOptions::default());

        assert_eq!(breakdown.deduction_applied, Decimal::ZERO);
        assert_eq!(breakdown.ipn, dec!(8800));
        assert_eq!(breakdown.net, dec!(79200));
    }

    #[test]
    fn non_positive_request_yields_empty_breakdown() {
        let calculator = test_calculator();

        let from_gross =
            calculator.calculate_salary(&SalaryRequest::gross(dec!(-1)), &SolverOptions::default());
        let from_net =
            calculator.calculate_salary(&SalaryRequest::net(Decimal::ZERO), &SolverOptions::default());

        assert_eq!(from_gross, SalaryBreakdown::default());
        assert_eq!(from_net, SalaryBreakdown::default());
    }

    #[test]
    fn breakdown_display_lists_every_amount() {
        let breakdown = test_calculator().breakdown(dec!(300000), true);

        let text = breakdown.to_string();

        assert!(text.contains("243655"));
        assert!(text.contains("Social tax (SN)"));
        assert!(text.ends_with("342150"));
    }
}
