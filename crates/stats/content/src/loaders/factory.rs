//! Content factory for building stat sheets from data files.

use std::path::{Path, PathBuf};

use stat_core::{Currency, ModifierStack, StatConfig, StatType, Wallet};
use tracing::debug;

use crate::catalog::{BaselineSpec, ContentModifierHandle, ModifierSpec};
use crate::loaders::{BaselineLoader, ConfigLoader, LoadResult, ModifierLoader};

/// Content factory that loads all stat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── baselines.ron
/// └── modifiers.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Loads everything in `dir` at once.
    pub fn load_dir(dir: impl Into<PathBuf>) -> LoadResult<StatContent> {
        Self::new(dir).load_all()
    }

    /// Load engine configuration from `config.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<StatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            debug!(
                target: "stat_content::loaders",
                path = %path.display(),
                "no config file, using defaults"
            );
            return Ok(StatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load actor baselines from `baselines.ron`.
    pub fn load_baselines(&self) -> LoadResult<Vec<BaselineSpec>> {
        let path = self.data_dir.join("baselines.ron");
        BaselineLoader::load(&path)
    }

    /// Load modifier templates from `modifiers.ron`.
    pub fn load_modifiers(&self) -> LoadResult<Vec<ModifierSpec>> {
        let path = self.data_dir.join("modifiers.ron");
        ModifierLoader::load(&path)
    }

    /// Loads config, baselines and modifier templates.
    pub fn load_all(&self) -> LoadResult<StatContent> {
        Ok(StatContent {
            config: self.load_config()?,
            baselines: self.load_baselines()?,
            modifiers: self.load_modifiers()?,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Loaded stat content, ready to build runtime objects from.
#[derive(Clone, Debug)]
pub struct StatContent {
    pub config: StatConfig,
    pub baselines: Vec<BaselineSpec>,
    pub modifiers: Vec<ModifierSpec>,
}

impl StatContent {
    pub fn baseline(&self, name: &str) -> Option<&BaselineSpec> {
        self.baselines.iter().find(|b| b.name == name)
    }

    pub fn modifier_spec(&self, name: &str) -> Option<&ModifierSpec> {
        self.modifiers.iter().find(|m| m.name == name)
    }

    /// Fresh stack seeded with the named baseline.
    pub fn stack_for(&self, name: &str) -> LoadResult<ModifierStack<StatType>> {
        self.baseline(name)
            .map(BaselineSpec::stack)
            .ok_or_else(|| anyhow::anyhow!("Unknown baseline: {}", name))
    }

    /// Fresh wallet holding the named baseline's starting balances, checking
    /// costs with the configured float tolerance.
    pub fn wallet_for(&self, name: &str) -> LoadResult<Wallet<Currency>> {
        self.baseline(name)
            .map(|baseline| baseline.wallet().with_config(&self.config))
            .ok_or_else(|| anyhow::anyhow!("Unknown baseline: {}", name))
    }

    /// Fresh instance of the named modifier template.
    ///
    /// Templates without their own match mode use the configured one.
    pub fn modifier(&self, name: &str) -> LoadResult<ContentModifierHandle> {
        let spec = self
            .modifier_spec(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown modifier: {}", name))?;
        spec.build(self.config.condition_match)
            .map_err(|e| anyhow::anyhow!("Failed to build modifier {}: {}", name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn unknown_names_are_errors() {
        let content = StatContent {
            config: StatConfig::default(),
            baselines: Vec::new(),
            modifiers: Vec::new(),
        };
        assert!(content.stack_for("ghost").is_err());
        assert!(content.wallet_for("ghost").is_err());
        match content.modifier("sword") {
            Err(err) => assert_eq!(err.to_string(), "Unknown modifier: sword"),
            Ok(_) => panic!("unknown modifier was built"),
        }
    }
}
