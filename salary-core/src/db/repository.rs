use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    ConfigAuditEntry, NewConfigAuditEntry, NewPlanningPosition, PlanningPosition, SalaryConfig,
};

/// Number of audit entries returned when the caller does not ask for more.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[async_trait]
pub trait SalaryRepository: Send + Sync {
    // Salary config (a single row)
    async fn get_salary_config(&self) -> Result<SalaryConfig, RepositoryError>;
    async fn save_salary_config(
        &self,
        config: &SalaryConfig,
    ) -> Result<(), RepositoryError>;

    // Config audit history
    async fn record_config_change(
        &self,
        entry: NewConfigAuditEntry,
    ) -> Result<ConfigAuditEntry, RepositoryError>;

    /// Saves `config` and records `entry` together. If either write fails,
    /// neither is stored.
    async fn save_salary_config_with_audit(
        &self,
        config: &SalaryConfig,
        entry: NewConfigAuditEntry,
    ) -> Result<ConfigAuditEntry, RepositoryError>;

    /// Newest first.
    async fn list_config_history(
        &self,
        limit: u32,
    ) -> Result<Vec<ConfigAuditEntry>, RepositoryError>;

    // Planning positions
    async fn create_planning_position(
        &self,
        position: NewPlanningPosition,
    ) -> Result<PlanningPosition, RepositoryError>;

    async fn get_planning_position(
        &self,
        id: i64,
    ) -> Result<PlanningPosition, RepositoryError>;

    async fn list_planning_positions(&self) -> Result<Vec<PlanningPosition>, RepositoryError>;

    async fn update_planning_position(
        &self,
        position: &PlanningPosition,
    ) -> Result<(), RepositoryError>;

    async fn delete_planning_position(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError>;
}
