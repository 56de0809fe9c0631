//! Pre-generated API key pools with a single-issuance guarantee.
//!
//! This crate provides functionality for:
//! - Deriving opaque tokens from 256 bits of OS entropy (SHA-256, unpadded base64)
//! - Persisting the pool behind a pluggable [`KeyStore`] contract
//! - Issuing each token to at most one caller via an atomic claim
//!
//! # Token Format
//!
//! A token is the SHA-256 digest of 32 freshly drawn random bytes, encoded
//! with the standard base64 alphabet and the trailing padding stripped:
//! always 43 characters.
//!
//! Example: `2Drp8fUm8LIUhkRqvqgKX0QgCzyeWf04oAh0Q5mk5r0`
//!
//! # Security Features
//!
//! - Entropy comes from the operating system CSPRNG; failure to obtain it
//!   is a hard error, never silently degraded
//! - A token is never handed to more than one caller: claiming is a single
//!   conditional update, safe under concurrent issuance
//! - The random preimage is zeroized after hashing
//!
//! # Example
//!
//! ```rust
//! use key_pool::{MemoryStore, PoolManager};
//!
//! # fn main() -> key_pool::Result<()> {
//! let pool = PoolManager::new(MemoryStore::new());
//! pool.create_pool(10)?;
//!
//! // Each call hands out a distinct token, exactly once.
//! let key = pool.issue_key()?;
//! assert_eq!(key.len(), 43);
//!
//! // Audit view of the whole pool.
//! let records = pool.snapshot()?;
//! assert_eq!(records.iter().filter(|r| r.used).count(), 1);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod memory;
mod pool;
mod sqlite;
mod store;
mod token;

// Public re-exports
pub use config::SqliteConfig;
pub use error::{KeyPoolError, Result};
pub use memory::MemoryStore;
pub use pool::PoolManager;
pub use sqlite::SqliteStore;
pub use store::{KeyStore, TokenRecord};
pub use token::{ENTROPY_LEN, TOKEN_LEN, derive_token};
