//! Reading and writing [`Decimal`] columns.
//!
//! Amounts are written as TEXT so they survive exactly. Reads also accept
//! INTEGER and REAL values, which appear when rows are edited by hand.

use rust_decimal::Decimal;
use salary_core::RepositoryError;
use sqlx::{Row, TypeInfo, ValueRef};

/// Get a decimal value from a row, handling TEXT, INTEGER and REAL SQLite
/// values.
///
/// # Errors
///
/// [`RepositoryError::Database`] when the column is missing, NULL, or holds
/// something that is not a number.
pub fn get_decimal(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    get_optional_decimal(row, column)?.ok_or_else(|| {
        RepositoryError::Database(format!("Column '{}' is NULL", column))
    })
}

/// Get an optional decimal value from a row, returning None for NULL values.
pub fn get_optional_decimal(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<Option<Decimal>, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{}' not found: {}", column, e)))?;

    if value_ref.is_null() {
        return Ok(None);
    }

    let type_info = value_ref.type_info();
    let type_name = type_info.name();

    match type_name {
        "TEXT" => {
            let val: String = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to get TEXT from '{}': {}", column, e))
            })?;
            parse_decimal(&val).map(Some)
        }
        "INTEGER" => {
            let val: i64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!(
                    "Failed to get INTEGER from '{}': {}",
                    column, e
                ))
            })?;
            Ok(Some(Decimal::from(val)))
        }
        "REAL" => {
            let val: f64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to get REAL from '{}': {}", column, e))
            })?;
            Decimal::try_from(val).map(Some).map_err(|e| {
                RepositoryError::Database(format!("Failed to convert {} to Decimal: {}", val, e))
            })
        }
        _ => Err(RepositoryError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            type_name, column
        ))),
    }
}

/// Parse a stored decimal string.
pub fn parse_decimal(s: &str) -> Result<Decimal, RepositoryError> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|e| RepositoryError::Database(format!("Failed to parse decimal '{}': {}", s, e)))
}

/// Convert a Decimal to its exact TEXT form for storage.
pub fn decimal_to_text(d: Decimal) -> String {
    d.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn setup_test_db() -> sqlx::sqlite::SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        sqlx::query(
            "CREATE TABLE test_decimals (
                id INTEGER PRIMARY KEY,
                int_value INTEGER,
                real_value REAL,
                text_value TEXT,
                blob_value BLOB
            )",
        )
        .execute(&pool)
        .await
        .expect("Failed to create test table");
        pool
    }

    async fn fetch_row(
        pool: &sqlx::sqlite::SqlitePool,
        insert: &str,
    ) -> sqlx::sqlite::SqliteRow {
        sqlx::query(insert)
            .execute(pool)
            .await
            .expect("Failed to insert test data");

        sqlx::query("SELECT * FROM test_decimals WHERE id = 1")
            .fetch_one(pool)
            .await
            .expect("Failed to fetch row")
    }

    // get_decimal tests

    #[tokio::test]
    async fn test_get_decimal_from_text() {
        let pool = setup_test_db().await;
        let row = fetch_row(
            &pool,
            "INSERT INTO test_decimals (id, text_value) VALUES (1, '0.035')",
        )
        .await;

        let result = get_decimal(&row, "text_value");

        assert_eq!(result, Ok(dec!(0.035)));
    }

    #[tokio::test]
    async fn test_get_decimal_from_integer() {
        let pool = setup_test_db().await;
        let row = fetch_row(
            &pool,
            "INSERT INTO test_decimals (id, int_value) VALUES (1, 85000)",
        )
        .await;

        let result = get_decimal(&row, "int_value");

        assert_eq!(result, Ok(dec!(85000)));
    }

    #[tokio::test]
    async fn test_get_decimal_from_real() {
        let pool = setup_test_db().await;
        let row = fetch_row(
            &pool,
            "INSERT INTO test_decimals (id, real_value) VALUES (1, 0.5)",
        )
        .await;

        let result = get_decimal(&row, "real_value");

        assert_eq!(result, Ok(dec!(0.5)));
    }

    #[tokio::test]
    async fn test_get_decimal_from_null_is_error() {
        let pool = setup_test_db().await;
        let row = fetch_row(&pool, "INSERT INTO test_decimals (id) VALUES (1)").await;

        let result = get_decimal(&row, "text_value");

        assert_eq!(
            result,
            Err(RepositoryError::Database(
                "Column 'text_value' is NULL".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_get_decimal_from_malformed_text() {
        let pool = setup_test_db().await;
        let row = fetch_row(
            &pool,
            "INSERT INTO test_decimals (id, text_value) VALUES (1, 'ten')",
        )
        .await;

        let result = get_decimal(&row, "text_value");

        assert!(matches!(result, Err(RepositoryError::Database(msg)) if msg.starts_with("Failed to parse decimal 'ten'")));
    }

    #[tokio::test]
    async fn test_get_decimal_column_not_found() {
        let pool = setup_test_db().await;
        let row = fetch_row(&pool, "INSERT INTO test_decimals (id) VALUES (1)").await;

        let result = get_decimal(&row, "nonexistent_column");

        assert!(matches!(result, Err(RepositoryError::Database(msg)) if msg.starts_with("Column 'nonexistent_column' not found:")));
    }

    #[tokio::test]
    async fn test_get_decimal_unexpected_type() {
        let pool = setup_test_db().await;
        let row = fetch_row(
            &pool,
            "INSERT INTO test_decimals (id, blob_value) VALUES (1, x'0102')",
        )
        .await;

        let result = get_decimal(&row, "blob_value");

        assert_eq!(
            result,
            Err(RepositoryError::Database(
                "Unexpected type 'BLOB' for column 'blob_value'".to_string()
            ))
        );
    }

    // get_optional_decimal tests

    #[tokio::test]
    async fn test_get_optional_decimal_from_text() {
        let pool = setup_test_db().await;
        let row = fetch_row(
            &pool,
            "INSERT INTO test_decimals (id, text_value) VALUES (1, '50')",
        )
        .await;

        let result = get_optional_decimal(&row, "text_value");

        assert_eq!(result, Ok(Some(dec!(50))));
    }

    #[tokio::test]
    async fn test_get_optional_decimal_from_null_returns_none() {
        let pool = setup_test_db().await;
        let row = fetch_row(&pool, "INSERT INTO test_decimals (id) VALUES (1)").await;

        let result = get_optional_decimal(&row, "text_value");

        assert_eq!(result, Ok(None));
    }

    // decimal_to_text tests

    #[test]
    fn test_decimal_to_text_drops_trailing_zeros() {
        assert_eq!(decimal_to_text(dec!(0.100)), "0.1");
        assert_eq!(decimal_to_text(dec!(85000)), "85000");
    }

    #[test]
    fn test_decimal_to_text_keeps_full_precision() {
        let value = dec!(1234567.891011121314);

        assert_eq!(parse_decimal(&decimal_to_text(value)), Ok(value));
    }

    #[test]
    fn test_parse_decimal_trims_whitespace() {
        assert_eq!(parse_decimal(" 4325 "), Ok(dec!(4325)));
    }
}
