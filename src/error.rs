//! Error types for key pool operations.

use thiserror::Error;

/// Errors that can occur while deriving, storing, or issuing keys.
#[derive(Debug, Error)]
pub enum KeyPoolError {
    /// The platform could not supply cryptographically secure randomness.
    #[error("entropy source unavailable: {0}")]
    EntropySourceUnavailable(String),

    /// A token with the same value already exists in the pool.
    #[error("duplicate key rejected by store")]
    DuplicateKey,

    /// No unused token remained at claim time. Recoverable by
    /// re-populating the pool.
    #[error("key pool exhausted")]
    PoolExhausted,

    /// Population aborted because a derivation or insert failed.
    #[error("pool initialization failed after {inserted} keys")]
    PoolInitializationFailed {
        /// Keys successfully inserted before the abort.
        inserted: usize,
        /// The derivation or storage failure that caused the abort.
        #[source]
        source: Box<KeyPoolError>,
    },

    /// The backing store is unreachable, locked past its timeout, or
    /// otherwise failing.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Result type alias for key pool operations.
pub type Result<T> = std::result::Result<T, KeyPoolError>;
