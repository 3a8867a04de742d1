use async_trait::async_trait;
use tracing::debug;

use super::repository::{FundRepository, RepositoryError};

/// Selects a storage backend and tells it where its data lives.
///
/// The `connection_string` is opaque to this crate; each backend documents
/// what it accepts (the sqlite backend takes a file path or `":memory:"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl DbConfig {
    pub fn new(backend: impl Into<String>, connection_string: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            connection_string: connection_string.into(),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::new("sqlite", ":memory:")
    }
}

/// Constructor for one storage backend. Backend crates export a unit struct
/// implementing this and register it in a [`RepositoryRegistry`].
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Lowercase name used to select this backend from a [`DbConfig`].
    fn backend_name(&self) -> &'static str;

    /// Build a working repository for `config`. Setup steps such as
    /// migrations or seed loading happen here, before the repository is
    /// handed out.
    async fn create(&self, config: &DbConfig) -> Result<Box<dyn FundRepository>, RepositoryError>;
}

/// Maps backend names to their factories. The set of backends is small and
/// fixed at startup, so a plain list with linear lookup is enough.
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: Vec<Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a factory. A later registration under the same name wins.
    pub fn register(&mut self, factory: Box<dyn RepositoryFactory>) {
        self.factories
            .retain(|existing| existing.backend_name() != factory.backend_name());
        self.factories.push(factory);
    }

    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.iter().map(|f| f.backend_name()).collect();
        names.sort_unstable();
        names
    }

    fn find(&self, backend: &str) -> Option<&dyn RepositoryFactory> {
        self.factories
            .iter()
            .find(|f| f.backend_name() == backend)
            .map(Box::as_ref)
    }

    /// Build a repository using the factory named by `config.backend`.
    ///
    /// Returns [`RepositoryError::Configuration`] when no such backend is
    /// registered; setup failures come back from the factory itself.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn FundRepository>, RepositoryError> {
        let factory = self.find(&config.backend).ok_or_else(|| {
            RepositoryError::Configuration(format!(
                "no registered backend named '{}' (available: {:?})",
                config.backend,
                self.available_backends()
            ))
        })?;

        debug!(backend = %config.backend, "opening repository");
        factory.create(config).await
    }
}
