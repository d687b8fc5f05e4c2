//! Builder pattern for PolicyEngine

use crate::engine::PolicyEngine;
use crate::error::Result;
use inkgate_store::{MemoryStore, PolicyStore, SeedLoader};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for [`PolicyEngine`]
///
/// # Example
///
/// ```rust,ignore
/// use inkgate_sdk::PolicyEngineBuilder;
///
/// // In-memory store seeded from a directory of YAML files
/// let engine = PolicyEngineBuilder::new()
///     .with_seed_dir("seed")
///     .build()
///     .await?;
///
/// // Over an existing store (e.g. PostgresStore behind the `postgres`
/// // feature)
/// let engine = PolicyEngineBuilder::new()
///     .with_store(store)
///     .build()
///     .await?;
/// ```
pub struct PolicyEngineBuilder {
    store: Option<Arc<dyn PolicyStore>>,
    seed_path: Option<PathBuf>,
}

impl PolicyEngineBuilder {
    /// Create a new builder; defaults to an empty in-memory store
    pub fn new() -> Self {
        Self {
            store: None,
            seed_path: None,
        }
    }

    /// Use a specific store implementation
    pub fn with_store(mut self, store: Arc<dyn PolicyStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Load rule and warning-template seeds from a directory before the
    /// engine is handed out
    pub fn with_seed_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_path = Some(path.into());
        self
    }

    /// Build the engine
    pub async fn build(self) -> Result<PolicyEngine> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn PolicyStore>);

        if let Some(path) = self.seed_path {
            let report = SeedLoader::new(path).load_into(store.as_ref()).await?;
            tracing::info!(
                rules = report.rules_loaded,
                warnings = report.warnings_loaded,
                skipped = report.skipped,
                "engine seeded"
            );
        }

        Ok(PolicyEngine::new(store))
    }
}

impl Default for PolicyEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
