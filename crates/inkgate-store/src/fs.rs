//! YAML seed loader
//!
//! Bootstraps a store from a directory of YAML files:
//!
//! ```text
//! seed/
//!   rules/
//!     block_color.yaml        # a RuleDraft
//!   warnings/
//!     first_tattoo.yaml       # a WarningTemplate
//! ```
//!
//! Every rule is validated against the condition variant set before it is
//! accepted; files that fail to parse or validate are skipped with a
//! warning so one bad file cannot block the rest of the seed.

use inkgate_core::WarningTemplate;
use std::path::{Path, PathBuf};

use crate::audit::Actor;
use crate::error::StoreResult;
use crate::models::RuleDraft;
use crate::traits::PolicyStore;

/// What a seed run did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    pub rules_loaded: usize,
    pub warnings_loaded: usize,
    pub skipped: usize,
}

/// Loads rule and warning-template seeds from a directory tree
pub struct SeedLoader {
    root: PathBuf,
}

impl SeedLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load all seeds into the store
    pub async fn load_into(&self, store: &dyn PolicyStore) -> StoreResult<SeedReport> {
        let actor = Actor::seed();
        let mut report = SeedReport::default();

        for path in yaml_files(&self.root.join("warnings")).await? {
            match read_yaml::<WarningTemplate>(&path).await {
                Ok(template) => {
                    store.put_warning(template, &actor).await?;
                    report.warnings_loaded += 1;
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping warning seed");
                    report.skipped += 1;
                }
            }
        }

        for path in yaml_files(&self.root.join("rules")).await? {
            let draft = match read_yaml::<RuleDraft>(&path).await {
                Ok(draft) => draft,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping rule seed");
                    report.skipped += 1;
                    continue;
                }
            };

            match store.create_rule(draft, &actor).await {
                Ok(rule) => {
                    tracing::debug!(
                        path = %path.display(),
                        rule_key = rule.rule_key.as_str(),
                        "seeded rule"
                    );
                    report.rules_loaded += 1;
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping rule seed");
                    report.skipped += 1;
                }
            }
        }

        tracing::info!(
            rules = report.rules_loaded,
            warnings = report.warnings_loaded,
            skipped = report.skipped,
            "seed load finished"
        );
        Ok(report)
    }
}

/// YAML files directly under `dir`, sorted for deterministic load order
async fn yaml_files(dir: &Path) -> StoreResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == "yaml" || ext == "yml")
            .unwrap_or(false);
        if is_yaml {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

async fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_yaml::from_str(&raw)?)
}
