use crate::condition::MatchMode;

/// Stat engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatConfig {
    /// Absolute tolerance used when comparing aggregated float values.
    pub float_tolerance: f32,

    /// How a multi-flag condition query is matched against a resolver.
    pub condition_match: MatchMode,
}

impl StatConfig {
    // ===== compile-time constants =====
    /// Width of every flag mask. Keys, stat types and condition ids live in `0..MAX_FLAGS`.
    pub const MAX_FLAGS: usize = 64;
    /// Number of distinct condition ids.
    pub const CONDITION_DOMAIN: u32 = 64;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FLOAT_TOLERANCE: f32 = 1e-4;

    pub fn new() -> Self {
        Self {
            float_tolerance: Self::DEFAULT_FLOAT_TOLERANCE,
            condition_match: MatchMode::All,
        }
    }

    pub fn with_float_tolerance(mut self, float_tolerance: f32) -> Self {
        self.float_tolerance = float_tolerance;
        self
    }

    pub fn with_condition_match(mut self, condition_match: MatchMode) -> Self {
        self.condition_match = condition_match;
        self
    }
}

impl Default for StatConfig {
    fn default() -> Self {
        Self::new()
    }
}
