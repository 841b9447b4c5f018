use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use salary_core::{
    ConfigAuditEntry, FieldChange, NewConfigAuditEntry, NewPlanningPosition, PlanningPosition,
    RepositoryError, SalaryConfig, SalaryRepository,
};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::decimal::{decimal_to_text, get_decimal, get_optional_decimal};

const MAX_FILE_CONNECTIONS: u32 = 5;

/// Turns a [`DbConfig`](salary_core::DbConfig) connection string into a sqlx
/// URL.
///
/// * `:memory:` becomes `sqlite::memory:`
/// * anything starting with `sqlite:` is passed through
/// * anything else is a file path, created on first use
pub fn database_url(connection_string: &str) -> String {
    let trimmed = connection_string.trim();
    if trimmed == ":memory:" {
        "sqlite::memory:".to_string()
    } else if trimmed.starts_with("sqlite:") {
        trimmed.to_string()
    } else {
        format!("sqlite:{}?mode=rwc", trimmed)
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .foreign_keys(true);

        // Every connection to an in-memory database sees its own empty
        // database, so those pools hold exactly one connection for life.
        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_FILE_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn get_audit_entry(
        &self,
        id: i64,
    ) -> Result<ConfigAuditEntry, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, changed_at, changed_by FROM salary_config_audit WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        self.row_to_audit_entry(&row).await
    }

    async fn row_to_audit_entry(
        &self,
        row: &sqlx::sqlite::SqliteRow,
    ) -> Result<ConfigAuditEntry, RepositoryError> {
        let id: i64 = row
            .try_get("id")
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let change_rows = sqlx::query(
            "SELECT field, old_value, new_value
             FROM salary_config_audit_change
             WHERE audit_id = ?
             ORDER BY seq",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let changes = change_rows
            .iter()
            .map(|change| -> Result<FieldChange, RepositoryError> {
                Ok(FieldChange {
                    field: change
                        .try_get("field")
                        .map_err(|e| RepositoryError::Database(e.to_string()))?,
                    old: get_optional_decimal(change, "old_value")?,
                    new: get_optional_decimal(change, "new_value")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ConfigAuditEntry {
            id,
            changed_at: row
                .try_get::<DateTime<Utc>, _>("changed_at")
                .map_err(|e| {
                    RepositoryError::Database(format!("Failed to get changed_at: {}", e))
                })?,
            changed_by: row
                .try_get("changed_by")
                .map_err(|e| RepositoryError::Database(e.to_string()))?,
            changes,
        })
    }
}

async fn upsert_salary_config(
    conn: &mut SqliteConnection,
    config: &SalaryConfig,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "INSERT INTO salary_config (
            id, mrp, mzp, opv_rate, opvr_rate, vosms_rate, vosms_employer_rate,
            so_rate, sn_rate, ipn_rate, opv_limit_mzp, opvr_limit_mzp,
            vosms_limit_mzp, ipn_deduction_mrp, updated_at
        ) VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (id) DO UPDATE SET
            mrp = excluded.mrp,
            mzp = excluded.mzp,
            opv_rate = excluded.opv_rate,
            opvr_rate = excluded.opvr_rate,
            vosms_rate = excluded.vosms_rate,
            vosms_employer_rate = excluded.vosms_employer_rate,
            so_rate = excluded.so_rate,
            sn_rate = excluded.sn_rate,
            ipn_rate = excluded.ipn_rate,
            opv_limit_mzp = excluded.opv_limit_mzp,
            opvr_limit_mzp = excluded.opvr_limit_mzp,
            vosms_limit_mzp = excluded.vosms_limit_mzp,
            ipn_deduction_mrp = excluded.ipn_deduction_mrp,
            updated_at = excluded.updated_at",
    )
    .bind(decimal_to_text(config.mrp))
    .bind(decimal_to_text(config.mzp))
    .bind(decimal_to_text(config.opv_rate))
    .bind(config.opvr_rate.map(decimal_to_text))
    .bind(decimal_to_text(config.vosms_rate))
    .bind(decimal_to_text(config.vosms_employer_rate))
    .bind(decimal_to_text(config.so_rate))
    .bind(decimal_to_text(config.sn_rate))
    .bind(decimal_to_text(config.ipn_rate))
    .bind(decimal_to_text(config.opv_limit_mzp))
    .bind(config.opvr_limit_mzp.map(decimal_to_text))
    .bind(decimal_to_text(config.vosms_limit_mzp))
    .bind(decimal_to_text(config.ipn_deduction_mrp))
    .bind(Utc::now())
    .execute(&mut *conn)
    .await
    .map_err(|e| RepositoryError::Database(e.to_string()))?;

    Ok(())
}

/// Inserts an audit entry and its field changes, returning the new id.
async fn insert_audit_entry(
    conn: &mut SqliteConnection,
    entry: &NewConfigAuditEntry,
) -> Result<i64, RepositoryError> {
    let result = sqlx::query(
        "INSERT INTO salary_config_audit (changed_at, changed_by) VALUES (?, ?)",
    )
    .bind(Utc::now())
    .bind(&entry.changed_by)
    .execute(&mut *conn)
    .await
    .map_err(|e| RepositoryError::Database(e.to_string()))?;

    let id = result.last_insert_rowid();

    for (seq, change) in entry.changes.iter().enumerate() {
        sqlx::query(
            "INSERT INTO salary_config_audit_change (audit_id, seq, field, old_value, new_value)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(seq as i64)
        .bind(&change.field)
        .bind(change.old.map(decimal_to_text))
        .bind(change.new.map(decimal_to_text))
        .execute(&mut *conn)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;
    }

    Ok(id)
}

fn row_to_salary_config(row: &sqlx::sqlite::SqliteRow) -> Result<SalaryConfig, RepositoryError> {
    Ok(SalaryConfig {
        mrp: get_decimal(row, "mrp")?,
        mzp: get_decimal(row, "mzp")?,
        opv_rate: get_decimal(row, "opv_rate")?,
        opvr_rate: get_optional_decimal(row, "opvr_rate")?,
        vosms_rate: get_decimal(row, "vosms_rate")?,
        vosms_employer_rate: get_decimal(row, "vosms_employer_rate")?,
        so_rate: get_decimal(row, "so_rate")?,
        sn_rate: get_decimal(row, "sn_rate")?,
        ipn_rate: get_decimal(row, "ipn_rate")?,
        opv_limit_mzp: get_decimal(row, "opv_limit_mzp")?,
        opvr_limit_mzp: get_optional_decimal(row, "opvr_limit_mzp")?,
        vosms_limit_mzp: get_decimal(row, "vosms_limit_mzp")?,
        ipn_deduction_mrp: get_decimal(row, "ipn_deduction_mrp")?,
    })
}

fn row_to_planning_position(
    row: &sqlx::sqlite::SqliteRow
) -> Result<PlanningPosition, RepositoryError> {
    Ok(PlanningPosition {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        position_title: row
            .try_get("position_title")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        department: row
            .try_get("department")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        base_net: get_decimal(row, "base_net")?,
        kpi_net: get_decimal(row, "kpi_net")?,
        bonus_net: get_decimal(row, "bonus_net")?,
        base_gross: get_decimal(row, "base_gross")?,
        kpi_gross: get_decimal(row, "kpi_gross")?,
        bonus_gross: get_decimal(row, "bonus_gross")?,
    })
}

#[async_trait]
impl SalaryRepository for SqliteRepository {
    async fn get_salary_config(&self) -> Result<SalaryConfig, RepositoryError> {
        let row = sqlx::query(
            "SELECT mrp, mzp, opv_rate, opvr_rate, vosms_rate, vosms_employer_rate,
                    so_rate, sn_rate, ipn_rate, opv_limit_mzp, opvr_limit_mzp,
                    vosms_limit_mzp, ipn_deduction_mrp
             FROM salary_config WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        row_to_salary_config(&row)
    }

    async fn save_salary_config(
        &self,
        config: &SalaryConfig,
    ) -> Result<(), RepositoryError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        upsert_salary_config(&mut *conn, config).await?;

        debug!("Saved salary config");
        Ok(())
    }

    async fn record_config_change(
        &self,
        entry: NewConfigAuditEntry,
    ) -> Result<ConfigAuditEntry, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let id = insert_audit_entry(&mut *tx, &entry).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        debug!(
            audit_id = id,
            changed_by = %entry.changed_by,
            fields = entry.changes.len(),
            "Recorded salary config change"
        );
        self.get_audit_entry(id).await
    }

    async fn save_salary_config_with_audit(
        &self,
        config: &SalaryConfig,
        entry: NewConfigAuditEntry,
    ) -> Result<ConfigAuditEntry, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        upsert_salary_config(&mut *tx, config).await?;
        let id = insert_audit_entry(&mut *tx, &entry).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        debug!(
            audit_id = id,
            changed_by = %entry.changed_by,
            fields = entry.changes.len(),
            "Saved salary config with audit entry"
        );
        self.get_audit_entry(id).await
    }

    async fn list_config_history(
        &self,
        limit: u32,
    ) -> Result<Vec<ConfigAuditEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, changed_at, changed_by FROM salary_config_audit
             ORDER BY id DESC
             LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            entries.push(self.row_to_audit_entry(row).await?);
        }
        Ok(entries)
    }

    async fn create_planning_position(
        &self,
        position: NewPlanningPosition,
    ) -> Result<PlanningPosition, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO planning_position (
                position_title, department, base_net, kpi_net, bonus_net, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&position.position_title)
        .bind(&position.department)
        .bind(decimal_to_text(position.base_net))
        .bind(decimal_to_text(position.kpi_net))
        .bind(decimal_to_text(position.bonus_net))
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_planning_position(id).await
    }

    async fn get_planning_position(
        &self,
        id: i64,
    ) -> Result<PlanningPosition, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, position_title, department, base_net, kpi_net, bonus_net,
                    base_gross, kpi_gross, bonus_gross
             FROM planning_position WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        row_to_planning_position(&row)
    }

    async fn list_planning_positions(&self) -> Result<Vec<PlanningPosition>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, position_title, department, base_net, kpi_net, bonus_net,
                    base_gross, kpi_gross, bonus_gross
             FROM planning_position ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_planning_position).collect()
    }

    async fn update_planning_position(
        &self,
        position: &PlanningPosition,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE planning_position SET
                position_title = ?, department = ?,
                base_net = ?, kpi_net = ?, bonus_net = ?,
                base_gross = ?, kpi_gross = ?, bonus_gross = ?,
                updated_at = ?
             WHERE id = ?",
        )
        .bind(&position.position_title)
        .bind(&position.department)
        .bind(decimal_to_text(position.base_net))
        .bind(decimal_to_text(position.kpi_net))
        .bind(decimal_to_text(position.bonus_net))
        .bind(decimal_to_text(position.base_gross))
        .bind(decimal_to_text(position.kpi_gross))
        .bind(decimal_to_text(position.bonus_gross))
        .bind(now)
        .bind(position.id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_planning_position(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM planning_position WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
