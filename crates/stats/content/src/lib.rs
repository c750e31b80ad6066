//! Data-driven stat content and loaders.
//!
//! This crate houses static stat definitions and provides loaders for RON/TOML data files:
//! - Actor baselines and starting wallets (data-driven via RON)
//! - Modifier templates, optionally gated by conditions (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//!
//! Definitions are templates. Every actor builds its own stack, wallet and
//! modifier instances from them.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{
    BaselineSpec, ContentModifier, ContentModifierHandle, ModifierKindSpec, ModifierSpec,
};

#[cfg(feature = "loaders")]
pub use loaders::{
    BaselineCatalog, BaselineLoader, ConfigLoader, ContentFactory, LoadResult, ModifierCatalog,
    ModifierLoader, StatContent,
};
