use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One field of a [`SalaryConfig`](super::SalaryConfig) that changed in an
/// update. `None` means the field was unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old: Option<Decimal>,
    pub new: Option<Decimal>,
}

impl FieldChange {
    pub fn new(
        field: impl Into<String>,
        old: Option<Decimal>,
        new: Option<Decimal>,
    ) -> Self {
        Self {
            field: field.into(),
            old,
            new,
        }
    }
}

/// A recorded configuration update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigAuditEntry {
    pub id: i64,
    pub changed_at: DateTime<Utc>,
    pub changed_by: String,
    pub changes: Vec<FieldChange>,
}

/// An audit entry that has not been stored yet. The repository assigns the
/// id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConfigAuditEntry {
    pub changed_by: String,
    pub changes: Vec<FieldChange>,
}
