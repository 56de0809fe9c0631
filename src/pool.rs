//! Pool population and single-issuance orchestration.

use crate::error::{KeyPoolError, Result};
use crate::store::{KeyStore, TokenRecord};
use crate::token::derive_token;

/// Orchestrates a token pool over an injected [`KeyStore`].
///
/// Issuance may happen from any number of threads sharing the manager.
/// Population is not concurrency-safe with itself or with in-flight
/// issuance; callers must serialize pool (re)population.
pub struct PoolManager<S> {
    store: S,
}

impl<S: KeyStore> PoolManager<S> {
    /// Create a manager over a caller-constructed store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Discard any existing pool and populate `size` fresh tokens.
    ///
    /// Aborts on the first derivation or insert failure, reporting how
    /// many keys made it in. A derivation collision surfaces here as
    /// `DuplicateKey` rather than shrinking the pool silently.
    pub fn create_pool(&self, size: usize) -> Result<()> {
        self.store.clear()?;

        for inserted in 0..size {
            let result = derive_token().and_then(|token| self.store.insert(&token));
            if let Err(source) = result {
                return Err(KeyPoolError::PoolInitializationFailed {
                    inserted,
                    source: Box::new(source),
                });
            }
        }

        log::info!("key pool populated with {size} tokens");
        Ok(())
    }

    /// Claim one unused token, marking it used, and return it.
    ///
    /// # Errors
    /// `PoolExhausted` when no unused token remains. Not retried
    /// internally; the caller recovers by re-populating the pool.
    pub fn issue_key(&self) -> Result<String> {
        match self.store.claim_unused()? {
            Some(value) => Ok(value),
            None => {
                log::warn!("key pool exhausted");
                Err(KeyPoolError::PoolExhausted)
            }
        }
    }

    /// Audit view: every record in the pool at call time.
    pub fn snapshot(&self) -> Result<Vec<TokenRecord>> {
        self.store.list()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::memory::MemoryStore;

    #[test]
    fn create_pool_fills_store_with_unused_tokens() {
        let pool = PoolManager::new(MemoryStore::new());
        pool.create_pool(5).unwrap();

        let records = pool.snapshot().unwrap();
        assert_eq!(records.len(), 5);
        assert!(records.iter().all(|r| !r.used));
    }

    #[test]
    fn issue_key_returns_tokens_present_in_snapshot() {
        let pool = PoolManager::new(MemoryStore::new());
        pool.create_pool(3).unwrap();

        let before = pool.snapshot().unwrap();
        let key = pool.issue_key().unwrap();
        assert!(before.iter().any(|r| r.value == key && !r.used));
    }

    #[test]
    fn issue_key_fails_once_exhausted() {
        let pool = PoolManager::new(MemoryStore::new());
        pool.create_pool(2).unwrap();

        pool.issue_key().unwrap();
        pool.issue_key().unwrap();
        assert!(matches!(pool.issue_key(), Err(KeyPoolError::PoolExhausted)));
    }

    #[test]
    fn create_pool_replaces_previous_pool() {
        let pool = PoolManager::new(MemoryStore::new());
        pool.create_pool(3).unwrap();
        pool.create_pool(2).unwrap();

        let records = pool.snapshot().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| !r.used));
    }

    #[test]
    fn empty_pool_is_exhausted_immediately() {
        let pool = PoolManager::new(MemoryStore::new());
        pool.create_pool(0).unwrap();

        assert!(pool.snapshot().unwrap().is_empty());
        assert!(matches!(pool.issue_key(), Err(KeyPoolError::PoolExhausted)));
    }

    /// Store whose inserts start failing after a set number of successes.
    struct FlakyStore {
        inner: MemoryStore,
        accept: usize,
        seen: AtomicUsize,
    }

    impl KeyStore for FlakyStore {
        fn insert(&self, value: &str) -> Result<()> {
            if self.seen.fetch_add(1, Ordering::SeqCst) >= self.accept {
                return Err(KeyPoolError::DuplicateKey);
            }
            self.inner.insert(value)
        }

        fn list(&self) -> Result<Vec<TokenRecord>> {
            self.inner.list()
        }

        fn claim_unused(&self) -> Result<Option<String>> {
            self.inner.claim_unused()
        }

        fn clear(&self) -> Result<()> {
            self.inner.clear()
        }
    }

    #[test]
    fn insert_failure_aborts_population() {
        let pool = PoolManager::new(FlakyStore {
            inner: MemoryStore::new(),
            accept: 2,
            seen: AtomicUsize::new(0),
        });

        let err = pool.create_pool(5).unwrap_err();
        match err {
            KeyPoolError::PoolInitializationFailed { inserted, source } => {
                assert_eq!(inserted, 2);
                assert!(matches!(*source, KeyPoolError::DuplicateKey));
            }
            other => panic!("expected PoolInitializationFailed, got {other:?}"),
        }

        // Population stopped at the failure, nothing more was inserted.
        assert_eq!(pool.snapshot().unwrap().len(), 2);
    }
}
