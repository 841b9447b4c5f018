mod config_audit;
mod planning_position;
mod salary_config;

pub use config_audit::{ConfigAuditEntry, FieldChange, NewConfigAuditEntry};
pub use planning_position::{NewPlanningPosition, PlanningPosition};
pub use salary_config::{
    DEFAULT_OPVR_LIMIT_MZP, DEFAULT_SALARY_CONFIG, SalaryConfig, SalaryConfigError,
    SalaryConfigUpdate,
};
