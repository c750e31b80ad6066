//! Sparse stat aggregation shared by the actor, combat and research layers.
//!
//! `stat-core` owns the numeric kernel of the game: bit-flag key sets, sparse
//! value vectors indexed by those sets, the ordered modifier stack that turns a
//! baseline into aggregated stats, and the condition queries that gate passive
//! and ability activation. Everything here is synchronous and deterministic;
//! engine objects only reach it as plain floats, masks and ordering numbers.
pub mod condition;
pub mod config;
pub mod error;
pub mod flags;
pub mod keys;
pub mod modifier;
pub mod vector;
pub mod wallet;

pub use condition::{ConditionId, ConditionQuery, ConditionResolver, MatchMode};
pub use config::StatConfig;
pub use error::{CoreError, ErrorSeverity, StatError, StatResult};
pub use flags::{BitFlagSet, FlagKey, Flags};
pub use keys::{Currency, StatType};
pub use modifier::{
    FlatModifier, GatedModifier, Modifier, ModifierHandle, ModifierStack, ScaleModifier,
};
pub use vector::{Accessor, AccessorCache, SparseValueVector};
pub use wallet::Wallet;
