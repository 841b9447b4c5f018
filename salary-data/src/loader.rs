use std::io::Read;

use rust_decimal::Decimal;
use salary_core::calculations::recalculate_position;
use salary_core::{NewPlanningPosition, PayrollCalculator, RepositoryError, SalaryRepository};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading planning positions.
#[derive(Debug, Error)]
pub enum PlanningLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid record {record}: {reason}")]
    InvalidRecord { record: usize, reason: String },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for PlanningLoaderError {
    fn from(err: csv::Error) -> Self {
        PlanningLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the planning positions CSV file.
///
/// - `position_title`: Name of the position
/// - `department`: Owning department (empty for none)
/// - `base_net`: Planned monthly base salary, net
/// - `kpi_net`: Planned KPI payment, net (empty for none)
/// - `bonus_net`: Planned bonus, net (empty for none)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlanningPositionRecord {
    pub position_title: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub department: Option<String>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub base_net: Decimal,
    #[serde(default, deserialize_with = "deserialize_amount_or_zero")]
    pub kpi_net: Decimal,
    #[serde(default, deserialize_with = "deserialize_amount_or_zero")]
    pub bonus_net: Decimal,
}

impl From<&PlanningPositionRecord> for NewPlanningPosition {
    fn from(record: &PlanningPositionRecord) -> Self {
        NewPlanningPosition {
            position_title: record.position_title.trim().to_string(),
            department: record.department.clone(),
            base_net: record.base_net,
            kpi_net: record.kpi_net,
            bonus_net: record.bonus_net,
        }
    }
}

fn parse_amount<E: serde::de::Error>(s: &str) -> Result<Decimal, E> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|e| E::custom(format!("invalid amount '{}': {}", s.trim(), e)))
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_amount(&s)
}

fn deserialize_amount_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(Decimal::ZERO),
        Some(s) => parse_amount(&s),
        None => Ok(Decimal::ZERO),
    }
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

fn validate_record(
    index: usize,
    record: &PlanningPositionRecord,
) -> Result<(), PlanningLoaderError> {
    let invalid = |reason: String| PlanningLoaderError::InvalidRecord {
        record: index + 1,
        reason,
    };

    if record.position_title.trim().is_empty() {
        return Err(invalid("position_title must not be empty".to_string()));
    }

    for (field, value) in [
        ("base_net", record.base_net),
        ("kpi_net", record.kpi_net),
        ("bonus_net", record.bonus_net),
    ] {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(invalid(format!("{field} must not be negative, got {value}")));
        }
    }

    Ok(())
}

/// Loader for planning positions from CSV files.
///
/// Positions are stored through the `SalaryRepository` trait, so any backend
/// works. Gross amounts are derived while loading.
pub struct PlanningPositionLoader;

impl PlanningPositionLoader {
    /// Parse and validate planning position records from a CSV reader.
    ///
    /// Record numbers in errors count data rows from 1, not counting the
    /// header.
    pub fn parse<R: Read>(
        reader: R
    ) -> Result<Vec<PlanningPositionRecord>, PlanningLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for (index, result) in csv_reader.deserialize().enumerate() {
            let record: PlanningPositionRecord = result?;
            validate_record(index, &record)?;
            records.push(record);
        }

        Ok(records)
    }

    /// Insert one planning position per record, with gross amounts solved
    /// under `calculator`'s config.
    ///
    /// Loading is not idempotent: every call inserts new positions.
    pub async fn load<R: SalaryRepository + ?Sized>(
        repo: &R,
        records: &[PlanningPositionRecord],
        calculator: &PayrollCalculator,
    ) -> Result<usize, PlanningLoaderError> {
        let mut inserted = 0;

        for record in records {
            let created = repo.create_planning_position(record.into()).await?;
            let recalculated = recalculate_position(calculator, &created);
            repo.update_planning_position(&recalculated.position).await?;

            debug!(
                position_id = created.id,
                title = %created.position_title,
                total_gross = %recalculated.position.total_gross(),
                "Loaded planning position"
            );
            inserted += 1;
        }

        Ok(inserted)
    }
}
