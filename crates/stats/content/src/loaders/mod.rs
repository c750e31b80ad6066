//! Content loaders for reading stat data from files.
//!
//! Baselines and modifier templates are stored as RON, engine tuning as TOML.

pub mod baseline;
pub mod config;
pub mod factory;
pub mod modifiers;

pub use baseline::{BaselineCatalog, BaselineLoader};
pub use config::ConfigLoader;
pub use factory::{ContentFactory, StatContent};
pub use modifiers::{ModifierCatalog, ModifierLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
