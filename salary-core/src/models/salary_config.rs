//! Salary tax configuration.
//!
//! A [`SalaryConfig`] holds every rate and limit the payroll calculations
//! need. It is a plain value: two configs with the same field values always
//! produce the same results, and there is no process-wide "current" config.
//! Callers pass it explicitly, starting from [`DEFAULT_SALARY_CONFIG`].
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `mrp` | Monthly calculation index, sizes the income-tax deduction |
//! | `mzp` | Minimum wage, sizes contribution caps |
//! | `opv_rate` | Employee pension contribution rate |
//! | `opvr_rate` | Employer pension contribution rate (unset means 0) |
//! | `vosms_rate` | Employee medical-insurance rate |
//! | `vosms_employer_rate` | Employer medical-insurance rate |
//! | `so_rate` | Social payment rate |
//! | `sn_rate` | Social tax rate |
//! | `ipn_rate` | Individual income tax rate |
//! | `opv_limit_mzp` | Pension cap in multiples of `mzp` |
//! | `opvr_limit_mzp` | Employer pension cap in multiples of `mzp` (unset means 50) |
//! | `vosms_limit_mzp` | Medical cap in multiples of `mzp` |
//! | `ipn_deduction_mrp` | Income-tax deduction in multiples of `mrp` |

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::FieldChange;

/// Employer pension cap used when `opvr_limit_mzp` is unset or zero.
pub const DEFAULT_OPVR_LIMIT_MZP: Decimal = dec!(50);

/// The stock configuration a fresh installation starts from.
pub const DEFAULT_SALARY_CONFIG: SalaryConfig = SalaryConfig {
    mrp: dec!(4325),
    mzp: dec!(85000),
    opv_rate: dec!(0.1),
    opvr_rate: Some(dec!(0.025)),
    vosms_rate: dec!(0.02),
    vosms_employer_rate: dec!(0.03),
    so_rate: dec!(0.035),
    sn_rate: dec!(0.095),
    ipn_rate: dec!(0.1),
    opv_limit_mzp: dec!(50),
    opvr_limit_mzp: Some(dec!(50)),
    vosms_limit_mzp: dec!(10),
    ipn_deduction_mrp: dec!(14),
};

/// Errors reported by [`SalaryConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SalaryConfigError {
    /// A rate fell outside [0, 1].
    #[error("{field} must be between 0 and 1, got {value}")]
    InvalidRate { field: &'static str, value: Decimal },

    /// A base unit or cap was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveAmount { field: &'static str, value: Decimal },

    /// An allowance was negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryConfig {
    pub mrp: Decimal,
    pub mzp: Decimal,
    pub opv_rate: Decimal,
    #[serde(default)]
    pub opvr_rate: Option<Decimal>,
    pub vosms_rate: Decimal,
    pub vosms_employer_rate: Decimal,
    pub so_rate: Decimal,
    pub sn_rate: Decimal,
    pub ipn_rate: Decimal,
    pub opv_limit_mzp: Decimal,
    #[serde(default)]
    pub opvr_limit_mzp: Option<Decimal>,
    pub vosms_limit_mzp: Decimal,
    pub ipn_deduction_mrp: Decimal,
}

impl Default for SalaryConfig {
    fn default() -> Self {
        DEFAULT_SALARY_CONFIG
    }
}

/// A partial edit of a [`SalaryConfig`]. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryConfigUpdate {
    pub mrp: Option<Decimal>,
    pub mzp: Option<Decimal>,
    pub opv_rate: Option<Decimal>,
    pub opvr_rate: Option<Decimal>,
    pub vosms_rate: Option<Decimal>,
    pub vosms_employer_rate: Option<Decimal>,
    pub so_rate: Option<Decimal>,
    pub sn_rate: Option<Decimal>,
    pub ipn_rate: Option<Decimal>,
    pub opv_limit_mzp: Option<Decimal>,
    pub opvr_limit_mzp: Option<Decimal>,
    pub vosms_limit_mzp: Option<Decimal>,
    pub ipn_deduction_mrp: Option<Decimal>,
}

impl SalaryConfigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl SalaryConfig {
    /// Employer pension rate, treating an unset rate as zero.
    pub fn effective_opvr_rate(&self) -> Decimal {
        self.opvr_rate.unwrap_or(Decimal::ZERO)
    }

    /// Employer pension cap in multiples of `mzp`. Unset or zero falls back
    /// to [`DEFAULT_OPVR_LIMIT_MZP`].
    pub fn effective_opvr_limit_mzp(&self) -> Decimal {
        match self.opvr_limit_mzp {
            Some(limit) if !limit.is_zero() => limit,
            _ => DEFAULT_OPVR_LIMIT_MZP,
        }
    }

    /// Pension contribution cap in currency. Saturates at [`Decimal::MAX`].
    pub fn opv_cap(&self) -> Decimal {
        self.opv_limit_mzp.saturating_mul(self.mzp)
    }

    /// Medical contribution cap in currency. Shared by the employee and
    /// employer medical contributions.
    pub fn vosms_cap(&self) -> Decimal {
        self.vosms_limit_mzp.saturating_mul(self.mzp)
    }

    /// Employer pension cap in currency.
    pub fn opvr_cap(&self) -> Decimal {
        self.effective_opvr_limit_mzp().saturating_mul(self.mzp)
    }

    /// Income-tax deduction allowance in currency. Saturates at
    /// [`Decimal::MAX`].
    pub fn ipn_deduction(&self) -> Decimal {
        self.ipn_deduction_mrp.saturating_mul(self.mrp)
    }

    /// Checks every field against its valid range.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in field order:
    /// - `mrp`, `mzp` and the `*_limit_mzp` caps must be positive
    /// - every rate must be in [0, 1]
    /// - `ipn_deduction_mrp` must be non-negative
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use salary_core::{DEFAULT_SALARY_CONFIG, SalaryConfig, SalaryConfigError};
    ///
    /// let config = SalaryConfig {
    ///     ipn_rate: dec!(1.2),
    ///     ..DEFAULT_SALARY_CONFIG
    /// };
    ///
    /// assert_eq!(
    ///     config.validate(),
    ///     Err(SalaryConfigError::InvalidRate { field: "ipn_rate", value: dec!(1.2) })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), SalaryConfigError> {
        positive("mrp", self.mrp)?;
        positive("mzp", self.mzp)?;

        rate("opv_rate", self.opv_rate)?;
        if let Some(opvr_rate) = self.opvr_rate {
            rate("opvr_rate", opvr_rate)?;
        }
        rate("vosms_rate", self.vosms_rate)?;
        rate("vosms_employer_rate", self.vosms_employer_rate)?;
        rate("so_rate", self.so_rate)?;
        rate("sn_rate", self.sn_rate)?;
        rate("ipn_rate", self.ipn_rate)?;

        positive("opv_limit_mzp", self.opv_limit_mzp)?;
        if let Some(opvr_limit) = self.opvr_limit_mzp {
            positive("opvr_limit_mzp", opvr_limit)?;
        }
        positive("vosms_limit_mzp", self.vosms_limit_mzp)?;

        if self.ipn_deduction_mrp < Decimal::ZERO {
            return Err(SalaryConfigError::NegativeAmount {
                field: "ipn_deduction_mrp",
                value: self.ipn_deduction_mrp,
            });
        }
        Ok(())
    }

    /// Returns a copy with rates forced into [0, 1] and negative amounts
    /// raised to zero.
    ///
    /// Calculations on a clamped config never panic. The net salary is
    /// non-decreasing in gross only while `opv_rate + vosms_rate` stays at or
    /// below 1; the inverse solver assumes it is.
    pub fn clamped(&self) -> Self {
        Self {
            mrp: self.mrp.max(Decimal::ZERO),
            mzp: self.mzp.max(Decimal::ZERO),
            opv_rate: clamp_rate(self.opv_rate),
            opvr_rate: self.opvr_rate.map(clamp_rate),
            vosms_rate: clamp_rate(self.vosms_rate),
            vosms_employer_rate: clamp_rate(self.vosms_employer_rate),
            so_rate: clamp_rate(self.so_rate),
            sn_rate: clamp_rate(self.sn_rate),
            ipn_rate: clamp_rate(self.ipn_rate),
            opv_limit_mzp: self.opv_limit_mzp.max(Decimal::ZERO),
            opvr_limit_mzp: self.opvr_limit_mzp.map(|limit| limit.max(Decimal::ZERO)),
            vosms_limit_mzp: self.vosms_limit_mzp.max(Decimal::ZERO),
            ipn_deduction_mrp: self.ipn_deduction_mrp.max(Decimal::ZERO),
        }
    }

    /// Applies a partial update and reports which fields actually changed.
    ///
    /// Fields present in `update` with the value they already hold are not
    /// reported. The result is not validated; see [`SalaryConfig::validate`].
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use salary_core::{DEFAULT_SALARY_CONFIG, SalaryConfigUpdate};
    ///
    /// let update = SalaryConfigUpdate {
    ///     mzp: Some(dec!(100000)),
    ///     ipn_rate: Some(dec!(0.1)), // unchanged
    ///     ..Default::default()
    /// };
    ///
    /// let (next, changes) = DEFAULT_SALARY_CONFIG.apply_update(&update);
    ///
    /// assert_eq!(next.mzp, dec!(100000));
    /// assert_eq!(changes.len(), 1);
    /// assert_eq!(changes[0].field, "mzp");
    /// ```
    pub fn apply_update(
        &self,
        update: &SalaryConfigUpdate,
    ) -> (Self, Vec<FieldChange>) {
        let mut next = *self;
        let mut changes = Vec::new();

        track(&mut changes, "mrp", &mut next.mrp, update.mrp);
        track(&mut changes, "mzp", &mut next.mzp, update.mzp);
        track(&mut changes, "opv_rate", &mut next.opv_rate, update.opv_rate);
        track_optional(&mut changes, "opvr_rate", &mut next.opvr_rate, update.opvr_rate);
        track(&mut changes, "vosms_rate", &mut next.vosms_rate, update.vosms_rate);
        track(
            &mut changes,
            "vosms_employer_rate",
            &mut next.vosms_employer_rate,
            update.vosms_employer_rate,
        );
        track(&mut changes, "so_rate", &mut next.so_rate, update.so_rate);
        track(&mut changes, "sn_rate", &mut next.sn_rate, update.sn_rate);
        track(&mut changes, "ipn_rate", &mut next.ipn_rate, update.ipn_rate);
        track(
            &mut changes,
            "opv_limit_mzp",
            &mut next.opv_limit_mzp,
            update.opv_limit_mzp,
        );
        track_optional(
            &mut changes,
            "opvr_limit_mzp",
            &mut next.opvr_limit_mzp,
            update.opvr_limit_mzp,
        );
        track(
            &mut changes,
            "vosms_limit_mzp",
            &mut next.vosms_limit_mzp,
            update.vosms_limit_mzp,
        );
        track(
            &mut changes,
            "ipn_deduction_mrp",
            &mut next.ipn_deduction_mrp,
            update.ipn_deduction_mrp,
        );

        (next, changes)
    }
}

impl fmt::Display for SalaryConfig {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let unset = |value: Option<Decimal>| {
            value.map_or_else(|| "(unset)".to_string(), |v| v.to_string())
        };
        writeln!(f, "mrp                  {}", self.mrp)?;
        writeln!(f, "mzp                  {}", self.mzp)?;
        writeln!(f, "opv_rate             {}", self.opv_rate)?;
        writeln!(f, "opvr_rate            {}", unset(self.opvr_rate))?;
        writeln!(f, "vosms_rate           {}", self.vosms_rate)?;
        writeln!(f, "vosms_employer_rate  {}", self.vosms_employer_rate)?;
        writeln!(f, "so_rate              {}", self.so_rate)?;
        writeln!(f, "sn_rate              {}", self.sn_rate)?;
        writeln!(f, "ipn_rate             {}", self.ipn_rate)?;
        writeln!(f, "opv_limit_mzp        {}", self.opv_limit_mzp)?;
        writeln!(f, "opvr_limit_mzp       {}", unset(self.opvr_limit_mzp))?;
        writeln!(f, "vosms_limit_mzp      {}", self.vosms_limit_mzp)?;
        write!(f, "ipn_deduction_mrp    {}", self.ipn_deduction_mrp)
    }
}

fn rate(
    field: &'static str,
    value: Decimal,
) -> Result<(), SalaryConfigError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(SalaryConfigError::InvalidRate { field, value });
    }
    Ok(())
}

fn positive(
    field: &'static str,
    value: Decimal,
) -> Result<(), SalaryConfigError> {
    if value <= Decimal::ZERO {
        return Err(SalaryConfigError::NonPositiveAmount { field, value });
    }
    Ok(())
}

fn clamp_rate(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE)
}

fn track(
    changes: &mut Vec<FieldChange>,
    field: &'static str,
    current: &mut Decimal,
    requested: Option<Decimal>,
) {
    if let Some(new) = requested {
        if *current != new {
            changes.push(FieldChange::new(field, Some(*current), Some(new)));
            *current = new;
        }
    }
}

fn track_optional(
    changes: &mut Vec<FieldChange>,
    field: &'static str,
    current: &mut Option<Decimal>,
    requested: Option<Decimal>,
) {
    if let Some(new) = requested {
        if *current != Some(new) {
            changes.push(FieldChange::new(field, *current, Some(new)));
            *current = Some(new);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // Defaults and derived amounts
    // =========================================================================

    #[test]
    fn default_config_is_valid() {
        assert_eq!(DEFAULT_SALARY_CONFIG.validate(), Ok(()));
    }

    #[test]
    fn default_trait_returns_named_constant() {
        assert_eq!(SalaryConfig::default(), DEFAULT_SALARY_CONFIG);
    }

    #[test]
    fn caps_are_expressed_in_currency() {
        let config = DEFAULT_SALARY_CONFIG;

        assert_eq!(config.opv_cap(), dec!(4250000));
        assert_eq!(config.vosms_cap(), dec!(850000));
        assert_eq!(config.opvr_cap(), dec!(4250000));
        assert_eq!(config.ipn_deduction(), dec!(60550));
    }

    #[test]
    fn caps_saturate_instead_of_overflowing() {
        let config = SalaryConfig {
            mrp: dec!(100000000000000000000),
            mzp: dec!(100000000000000000000),
            opv_limit_mzp: dec!(100000000000000000000),
            vosms_limit_mzp: dec!(100000000000000000000),
            opvr_limit_mzp: Some(dec!(100000000000000000000)),
            ipn_deduction_mrp: dec!(100000000000000000000),
            ..DEFAULT_SALARY_CONFIG
        };
        assert_eq!(config.validate(), Ok(()));

        assert_eq!(config.opv_cap(), Decimal::MAX);
        assert_eq!(config.vosms_cap(), Decimal::MAX);
        assert_eq!(config.opvr_cap(), Decimal::MAX);
        assert_eq!(config.ipn_deduction(), Decimal::MAX);
    }

    #[test]
    fn unset_employer_pension_fields_fall_back() {
        let config = SalaryConfig {
            opvr_rate: None,
            opvr_limit_mzp: None,
            ..DEFAULT_SALARY_CONFIG
        };

        assert_eq!(config.effective_opvr_rate(), Decimal::ZERO);
        assert_eq!(config.effective_opvr_limit_mzp(), dec!(50));
    }

    #[test]
    fn zero_employer_pension_limit_falls_back_to_default() {
        let config = SalaryConfig {
            opvr_limit_mzp: Some(Decimal::ZERO),
            ..DEFAULT_SALARY_CONFIG
        };

        assert_eq!(config.effective_opvr_limit_mzp(), DEFAULT_OPVR_LIMIT_MZP);
    }

    // =========================================================================
    // validate
    // =========================================================================

    #[test]
    fn validate_rejects_zero_mrp() {
        let config = SalaryConfig {
            mrp: Decimal::ZERO,
            ..DEFAULT_SALARY_CONFIG
        };

        assert_eq!(
            config.validate(),
            Err(SalaryConfigError::NonPositiveAmount {
                field: "mrp",
                value: Decimal::ZERO,
            })
        );
    }

    #[test]
    fn validate_rejects_negative_mzp() {
        let config = SalaryConfig {
            mzp: dec!(-1),
            ..DEFAULT_SALARY_CONFIG
        };

        assert_eq!(
            config.validate(),
            Err(SalaryConfigError::NonPositiveAmount {
                field: "mzp",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let config = SalaryConfig {
            vosms_rate: dec!(1.01),
            ..DEFAULT_SALARY_CONFIG
        };

        assert_eq!(
            config.validate(),
            Err(SalaryConfigError::InvalidRate {
                field: "vosms_rate",
                value: dec!(1.01),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_rate() {
        let config = SalaryConfig {
            sn_rate: dec!(-0.05),
            ..DEFAULT_SALARY_CONFIG
        };

        assert_eq!(
            config.validate(),
            Err(SalaryConfigError::InvalidRate {
                field: "sn_rate",
                value: dec!(-0.05),
            })
        );
    }

    #[test]
    fn validate_accepts_boundary_rates() {
        let config = SalaryConfig {
            opv_rate: Decimal::ZERO,
            ipn_rate: Decimal::ONE,
            ..DEFAULT_SALARY_CONFIG
        };

        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_checks_optional_employer_rate_when_present() {
        let config = SalaryConfig {
            opvr_rate: Some(dec!(2)),
            ..DEFAULT_SALARY_CONFIG
        };

        assert_eq!(
            config.validate(),
            Err(SalaryConfigError::InvalidRate {
                field: "opvr_rate",
                value: dec!(2),
            })
        );
    }

    #[test]
    fn validate_skips_unset_optional_fields() {
        let config = SalaryConfig {
            opvr_rate: None,
            opvr_limit_mzp: None,
            ..DEFAULT_SALARY_CONFIG
        };

        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_zero_limit() {
        let config = SalaryConfig {
            vosms_limit_mzp: Decimal::ZERO,
            ..DEFAULT_SALARY_CONFIG
        };

        assert_eq!(
            config.validate(),
            Err(SalaryConfigError::NonPositiveAmount {
                field: "vosms_limit_mzp",
                value: Decimal::ZERO,
            })
        );
    }

    #[test]
    fn validate_allows_zero_deduction_but_not_negative() {
        let zero = SalaryConfig {
            ipn_deduction_mrp: Decimal::ZERO,
            ..DEFAULT_SALARY_CONFIG
        };
        let negative = SalaryConfig {
            ipn_deduction_mrp: dec!(-14),
            ..DEFAULT_SALARY_CONFIG
        };

        assert_eq!(zero.validate(), Ok(()));
        assert_eq!(
            negative.validate(),
            Err(SalaryConfigError::NegativeAmount {
                field: "ipn_deduction_mrp",
                value: dec!(-14),
            })
        );
    }

    #[test]
    fn validate_error_message_names_field() {
        let err = SalaryConfig {
            ipn_rate: dec!(1.5),
            ..DEFAULT_SALARY_CONFIG
        }
        .validate()
        .unwrap_err();

        assert_eq!(err.to_string(), "ipn_rate must be between 0 and 1, got 1.5");
    }

    // =========================================================================
    // clamped
    // =========================================================================

    #[test]
    fn clamped_leaves_valid_config_untouched() {
        assert_eq!(DEFAULT_SALARY_CONFIG.clamped(), DEFAULT_SALARY_CONFIG);
    }

    #[test]
    fn clamped_forces_rates_into_unit_interval() {
        let config = SalaryConfig {
            opv_rate: dec!(-0.1),
            ipn_rate: dec!(3),
            opvr_rate: Some(dec!(1.5)),
            ..DEFAULT_SALARY_CONFIG
        };

        let clamped = config.clamped();

        assert_eq!(clamped.opv_rate, Decimal::ZERO);
        assert_eq!(clamped.ipn_rate, Decimal::ONE);
        assert_eq!(clamped.opvr_rate, Some(Decimal::ONE));
    }

    #[test]
    fn clamped_raises_negative_amounts_to_zero() {
        let config = SalaryConfig {
            mrp: dec!(-10),
            opv_limit_mzp: dec!(-50),
            ipn_deduction_mrp: dec!(-1),
            ..DEFAULT_SALARY_CONFIG
        };

        let clamped = config.clamped();

        assert_eq!(clamped.mrp, Decimal::ZERO);
        assert_eq!(clamped.opv_limit_mzp, Decimal::ZERO);
        assert_eq!(clamped.ipn_deduction_mrp, Decimal::ZERO);
    }

    // =========================================================================
    // apply_update
    // =========================================================================

    #[test]
    fn apply_update_with_empty_update_changes_nothing() {
        let update = SalaryConfigUpdate::default();

        let (next, changes) = DEFAULT_SALARY_CONFIG.apply_update(&update);

        assert!(update.is_empty());
        assert_eq!(next, DEFAULT_SALARY_CONFIG);
        assert!(changes.is_empty());
    }

    #[test]
    fn apply_update_records_old_and_new_values_in_field_order() {
        let update = SalaryConfigUpdate {
            ipn_deduction_mrp: Some(dec!(30)),
            mrp: Some(dec!(4615)),
            ..Default::default()
        };

        let (next, changes) = DEFAULT_SALARY_CONFIG.apply_update(&update);

        assert_eq!(next.mrp, dec!(4615));
        assert_eq!(next.ipn_deduction_mrp, dec!(30));
        assert_eq!(
            changes,
            vec![
                FieldChange::new("mrp", Some(dec!(4325)), Some(dec!(4615))),
                FieldChange::new("ipn_deduction_mrp", Some(dec!(14)), Some(dec!(30))),
            ]
        );
    }

    #[test]
    fn apply_update_ignores_values_equal_to_current() {
        let update = SalaryConfigUpdate {
            opv_rate: Some(dec!(0.10)),
            ..Default::default()
        };

        let (_, changes) = DEFAULT_SALARY_CONFIG.apply_update(&update);

        assert!(changes.is_empty());
    }

    #[test]
    fn apply_update_sets_previously_unset_optional_field() {
        let config = SalaryConfig {
            opvr_rate: None,
            ..DEFAULT_SALARY_CONFIG
        };
        let update = SalaryConfigUpdate {
            opvr_rate: Some(dec!(0.035)),
            ..Default::default()
        };

        let (next, changes) = config.apply_update(&update);

        assert_eq!(next.opvr_rate, Some(dec!(0.035)));
        assert_eq!(
            changes,
            vec![FieldChange::new("opvr_rate", None, Some(dec!(0.035)))]
        );
    }

    #[test]
    fn apply_update_does_not_validate() {
        let update = SalaryConfigUpdate {
            so_rate: Some(dec!(7)),
            ..Default::default()
        };

        let (next, changes) = DEFAULT_SALARY_CONFIG.apply_update(&update);

        assert_eq!(next.so_rate, dec!(7));
        assert_eq!(changes.len(), 1);
        assert!(next.validate().is_err());
    }

    // =========================================================================
    // serde
    // =========================================================================

    #[test]
    fn update_deserializes_missing_fields_as_none() {
        let update: SalaryConfigUpdate =
            toml::from_str(r#"mzp = "100000""#).expect("should deserialize");

        assert_eq!(update.mzp, Some(dec!(100000)));
        assert_eq!(update.mrp, None);
    }

    #[test]
    fn config_deserializes_without_optional_employer_fields() {
        let text = r#"
            mrp = "4325"
            mzp = "85000"
            opv_rate = "0.1"
            vosms_rate = "0.02"
            vosms_employer_rate = "0.03"
            so_rate = "0.035"
            sn_rate = "0.095"
            ipn_rate = "0.1"
            opv_limit_mzp = "50"
            vosms_limit_mzp = "10"
            ipn_deduction_mrp = "14"
        "#;

        let config: SalaryConfig = toml::from_str(text).expect("should deserialize");

        assert_eq!(config.opvr_rate, None);
        assert_eq!(config.opvr_limit_mzp, None);
        assert_eq!(config.mzp, dec!(85000));
    }
}
