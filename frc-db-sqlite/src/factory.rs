use async_trait::async_trait;

use frc_core::db::repository::{FundRepository, RepositoryError};
use frc_core::db::{DbConfig, RepositoryFactory};

use crate::repository::SqliteRepository;

/// Registers SQLite as a storage backend under the name `"sqlite"`.
///
/// The connection string is a database file path (created when missing) or
/// `":memory:"` for an ephemeral database. Every repository produced here
/// has migrations applied and the bundled IRRF tables seeded, so callers
/// can compute withholding immediately.
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn FundRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string).await?;
        repo.run_migrations().await?;
        repo.run_default_seeds().await?;
        Ok(Box::new(repo))
    }
}

#[cfg(test)]
mod tests {
    use frc_core::db::{DbConfig, FundRepository as _, RepositoryFactory};

    use super::SqliteRepositoryFactory;

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteRepositoryFactory.backend_name(), "sqlite");
    }

    // Runs migrations and seeds against an in-memory database; the seed
    // directory resolves to this crate's own `seeds/`.
    #[tokio::test]
    async fn creates_seeded_in_memory_repository() {
        let config = DbConfig::new("sqlite", ":memory:");

        let repo = SqliteRepositoryFactory
            .create(&config)
            .await
            .expect("failed to create in-memory repository");

        let brackets = repo.get_brackets(2025).await.expect("Should fetch brackets");
        assert_eq!(brackets.len(), 5);
    }
}
