//! The stored salary config, its change history, and the recalculation that
//! follows every change.

use salary_core::{
    ConfigAuditEntry, DEFAULT_SALARY_CONFIG, NewConfigAuditEntry, RepositoryError,
    SalaryConfig, SalaryConfigError, SalaryConfigUpdate, SalaryRepository,
};
use thiserror::Error;
use tracing::info;

use crate::recalculate::{PlanningRecalculator, RecalculationSummary};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid salary config: {0}")]
    InvalidConfig(#[from] SalaryConfigError),

    #[error("changed_by must not be empty")]
    MissingChangedBy,

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// What [`SalarySettings::update`] stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub config: SalaryConfig,
    pub audit: ConfigAuditEntry,
    pub recalculation: RecalculationSummary,
}

/// Reads and changes the single stored [`SalaryConfig`].
pub struct SalarySettings<'a, R: SalaryRepository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: SalaryRepository + ?Sized> SalarySettings<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// The stored config. A database without one gets
    /// [`DEFAULT_SALARY_CONFIG`] saved and returned.
    pub async fn current(&self) -> Result<SalaryConfig, SettingsError> {
        match self.repo.get_salary_config().await {
            Ok(config) => Ok(config),
            Err(RepositoryError::NotFound) => {
                info!("No salary config stored, saving defaults");
                self.repo.save_salary_config(&DEFAULT_SALARY_CONFIG).await?;
                Ok(DEFAULT_SALARY_CONFIG)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply `update` to the stored config.
    ///
    /// Returns `Ok(None)` when no field actually changes; nothing is written
    /// in that case. Otherwise the new config is validated, then saved
    /// together with its audit entry under `changed_by`, and every planning
    /// position is recalculated against it.
    ///
    /// # Errors
    ///
    /// * [`SettingsError::MissingChangedBy`] for a blank `changed_by`.
    /// * [`SettingsError::InvalidConfig`] when the updated config fails
    ///   [`SalaryConfig::validate`]. Nothing is stored.
    /// * [`SettingsError::Repository`] from any storage step. A failed save
    ///   leaves both the stored config and its history unchanged.
    pub async fn update(
        &self,
        update: &SalaryConfigUpdate,
        changed_by: &str,
    ) -> Result<Option<SettingsUpdate>, SettingsError> {
        let changed_by = changed_by.trim();
        if changed_by.is_empty() {
            return Err(SettingsError::MissingChangedBy);
        }

        let current = self.current().await?;
        let (config, changes) = current.apply_update(update);
        if changes.is_empty() {
            info!(changed_by = %changed_by, "Salary config update changes nothing");
            return Ok(None);
        }

        config.validate()?;

        let audit = self
            .repo
            .save_salary_config_with_audit(
                &config,
                NewConfigAuditEntry {
                    changed_by: changed_by.to_string(),
                    changes,
                },
            )
            .await?;
        info!(
            audit_id = audit.id,
            changed_by = %changed_by,
            fields = audit.changes.len(),
            "Salary config updated"
        );

        let recalculation = PlanningRecalculator::run(self.repo, &config).await?;

        Ok(Some(SettingsUpdate {
            config,
            audit,
            recalculation,
        }))
    }

    /// The most recent `limit` changes, newest first.
    pub async fn history(
        &self,
        limit: u32,
    ) -> Result<Vec<ConfigAuditEntry>, SettingsError> {
        Ok(self.repo.list_config_history(limit).await?)
    }
}
