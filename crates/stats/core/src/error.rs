//! Common error infrastructure for stat-core.
//!
//! Every fallible operation in this crate reports a [`StatError`]. The variants
//! describe domain violations made by the calling layer (writing a key the
//! vector does not track, registering a modifier twice, addressing a condition
//! outside the 64-id domain). Absence is never an error: reads of untracked keys
//! return `0.0` and unset conditions answer `false`.
//!
//! # Design Principles
//!
//! - **Loud failures**: violations surface immediately and are never corrected
//! - **Severity Classification**: errors are categorized for logging and recovery
//! - **Stable codes**: each variant exposes a static identifier for tests/metrics

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller may retry later or choose another action
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: an invariant of the calling layer was broken
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry once the game state changes.
    ///
    /// Examples: not enough currency to pay a cost
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: condition id outside the 0..63 domain, unknown flag bits
    Validation,

    /// Internal error - the calling layer broke an ownership invariant.
    ///
    /// Examples: modifier registered twice, writing an untracked key
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug in the caller.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for stat-core errors.
///
/// Provides a uniform interface for error classification across the crate and
/// for downstream crates that wrap these errors.
pub trait CoreError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised by stat-core operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StatError {
    /// `set` was called for a key whose bit is not part of the vector's mask.
    #[error("key at bit {bit} is not present in mask {mask:#018x}")]
    KeyNotPresent { bit: u8, mask: u64 },

    /// A condition id outside the 0..63 domain was combined into a query.
    #[error("condition id {id} exceeds the 64-flag condition domain")]
    ConditionOutOfRange { id: u32 },

    /// Raw mask bits that do not name a key of the target key space.
    #[error("bits {bits:#018x} do not map to keys of this flag set")]
    InvalidFlagBits { bits: u64 },

    /// The same modifier handle was added to a stack twice.
    #[error("modifier `{name}` is already registered on this stack")]
    ModifierAlreadyRegistered { name: String },

    /// A modifier handle that was never added (or already removed) was removed.
    #[error("modifier `{name}` is not registered on this stack")]
    ModifierNotRegistered { name: String },

    /// A wallet could not cover a cost.
    #[error("insufficient funds at bit {bit}: required {required}, available {available}")]
    InsufficientFunds {
        bit: u8,
        required: f32,
        available: f32,
    },
}

impl CoreError for StatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientFunds { .. } => ErrorSeverity::Recoverable,
            Self::ConditionOutOfRange { .. } | Self::InvalidFlagBits { .. } => {
                ErrorSeverity::Validation
            }
            Self::KeyNotPresent { .. }
            | Self::ModifierAlreadyRegistered { .. }
            | Self::ModifierNotRegistered { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::KeyNotPresent { .. } => "KEY_NOT_PRESENT",
            Self::ConditionOutOfRange { .. } => "CONDITION_OUT_OF_RANGE",
            Self::InvalidFlagBits { .. } => "INVALID_FLAG_BITS",
            Self::ModifierAlreadyRegistered { .. } => "MODIFIER_ALREADY_REGISTERED",
            Self::ModifierNotRegistered { .. } => "MODIFIER_NOT_REGISTERED",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
        }
    }
}

/// Result alias used throughout stat-core.
pub type StatResult<T> = Result<T, StatError>;
