//! Actor baseline loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::BaselineSpec;
use crate::loaders::{LoadResult, read_file};

/// Baseline catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineCatalog {
    pub actors: Vec<BaselineSpec>,
}

/// Loader for actor baselines from RON files.
pub struct BaselineLoader;

impl BaselineLoader {
    /// Load actor baselines from a RON file.
    ///
    /// # Errors
    ///
    /// Fails on unreadable files, malformed RON, unknown stat names and
    /// duplicate actor names.
    pub fn load(path: &Path) -> LoadResult<Vec<BaselineSpec>> {
        let content = read_file(path)?;
        let actors = Self::parse(&content)?;
        debug!(
            target: "stat_content::loaders",
            path = %path.display(),
            actors = actors.len(),
            "loaded baselines"
        );
        Ok(actors)
    }

    /// Parse actor baselines from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<BaselineSpec>> {
        let catalog: BaselineCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse baseline catalog RON: {}", e))?;

        for (index, actor) in catalog.actors.iter().enumerate() {
            if catalog.actors[..index].iter().any(|a| a.name == actor.name) {
                anyhow::bail!("Duplicate baseline name: {}", actor.name);
            }
        }

        Ok(catalog.actors)
    }
}
