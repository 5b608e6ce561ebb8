//! # Economy Error Types
//!
//! Two families:
//! - [`Rejection`]: a transaction that was refused. The caller keeps its old
//!   state; nothing was mutated and no randomness was consumed.
//! - [`EconomyError`]: configuration or persistence input that cannot be used.

use thiserror::Error;

/// Why a transaction turned into a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Balance below the price of a pull or buff.
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance {
        /// Price of the attempted transaction.
        needed: u64,
        /// Balance at the time of the attempt.
        available: u64,
    },

    /// A pull is already waiting to be committed.
    #[error("a pull is already in flight")]
    PullInFlight,

    /// `commit_pull` without a prior `request_pull`.
    #[error("no pull is pending")]
    NothingPending,

    /// Pull request for zero pulls.
    #[error("pull count must be at least 1")]
    EmptyPull,

    /// Speed upgrade already at its cap.
    #[error("speed level already at cap {cap}")]
    SpeedCapReached {
        /// The configured cap.
        cap: u32,
    },

    /// Catalog has no buff with this identifier.
    #[error("unknown buff: {0}")]
    UnknownBuff(String),
}

/// Errors raised while loading configuration or saved state.
#[derive(Error, Debug)]
pub enum EconomyError {
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Save payload is not valid JSON for the state record.
    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),

    /// Save payload written by an unsupported format version.
    #[error("incompatible save version {found} (supported {min}..={max})")]
    IncompatibleSave {
        /// Version found in the payload.
        found: u32,
        /// Oldest readable version.
        min: u32,
        /// Current version.
        max: u32,
    },

    /// Configuration file is not valid TOML.
    #[cfg(feature = "config-toml")]
    #[error("malformed config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for configuration and persistence operations.
pub type EconomyResult<T> = Result<T, EconomyError>;
