//! Modifier template loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::ModifierSpec;
use crate::loaders::{LoadResult, read_file};

/// Modifier catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierCatalog {
    pub modifiers: Vec<ModifierSpec>,
}

/// Loader for modifier templates from RON files.
pub struct ModifierLoader;

impl ModifierLoader {
    /// Load modifier templates from a RON file.
    ///
    /// Condition ids are validated here so that a broken template fails at
    /// load time instead of the first time an actor equips it.
    pub fn load(path: &Path) -> LoadResult<Vec<ModifierSpec>> {
        let content = read_file(path)?;
        let modifiers = Self::parse(&content)?;
        debug!(
            target: "stat_content::loaders",
            path = %path.display(),
            modifiers = modifiers.len(),
            "loaded modifier templates"
        );
        Ok(modifiers)
    }

    /// Parse modifier templates from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<ModifierSpec>> {
        let catalog: ModifierCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse modifier catalog RON: {}", e))?;

        for (index, spec) in catalog.modifiers.iter().enumerate() {
            if catalog.modifiers[..index].iter().any(|m| m.name == spec.name) {
                anyhow::bail!("Duplicate modifier name: {}", spec.name);
            }
            spec.query()
                .map_err(|e| anyhow::anyhow!("Invalid conditions for modifier {}: {}", spec.name, e))?;
        }

        Ok(catalog.modifiers)
    }
}

#[cfg(test)]
mod tests {
    use stat_core::{MatchMode, StatType};

    use super::*;
    use crate::catalog::ModifierKindSpec;

    #[test]
    fn parses_flat_scale_and_gated_templates() {
        let modifiers = ModifierLoader::parse(
            r#"(
                modifiers: [
                    (name: "iron_sword", kind: Flat({ Attack: 4.0 })),
                    (name: "toughness", order: 10, kind: Scale(stats: [Hp, Armor], percent: 50.0)),
                    (name: "berserk", order: 5, kind: Flat({ Attack: 5.0 }), conditions: [4, 9], match_mode: Some(Any)),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(modifiers.len(), 3);
        assert_eq!(modifiers[0].order, 0);
        assert!(matches!(
            &modifiers[1].kind,
            ModifierKindSpec::Scale { stats, percent } if stats == &vec![StatType::Hp, StatType::Armor] && *percent == 50.0
        ));
        assert_eq!(modifiers[2].conditions, vec![4, 9]);
        assert_eq!(modifiers[2].match_mode, Some(MatchMode::Any));
    }

    #[test]
    fn rejects_out_of_domain_conditions() {
        let err = ModifierLoader::parse(
            r#"(modifiers: [(name: "x", kind: Flat({ Hp: 1.0 }), conditions: [64])])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid conditions for modifier x"));
    }
}
