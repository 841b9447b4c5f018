use async_trait::async_trait;

use salary_core::db::repository::{RepositoryError, SalaryRepository};
use salary_core::db::{DbConfig, RepositoryFactory};

use crate::repository::{SqliteRepository, database_url};

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`salary_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use salary_core::db::RepositoryRegistry;
/// use salary_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string`.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"salary.db"`. The file is created if it
    ///   does not exist.
    /// * `":memory:"`, an ephemeral in-memory database.
    /// * A sqlx URL such as `"sqlite://salary.db"`, used as given.
    ///
    /// The salary config table starts empty; callers create the default row
    /// on first read.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SalaryRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&database_url(&config.connection_string))
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        Ok(Box::new(repo))
    }
}
