//! In-memory reference implementation of the key store.

use std::sync::Mutex;

use crate::error::{KeyPoolError, Result};
use crate::store::{KeyStore, TokenRecord};

/// Thread-safe in-memory key store.
///
/// Every operation runs inside one mutex-guarded critical section, so the
/// claim's scan-and-flip is indivisible and issuance stays linearizable
/// without any storage-level primitive.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<TokenRecord>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryStore {
    fn insert(&self, value: &str) -> Result<()> {
        let mut records = self.records.lock().expect("key store poisoned");
        if records.iter().any(|r| r.value == value) {
            return Err(KeyPoolError::DuplicateKey);
        }
        records.push(TokenRecord::new(value));
        Ok(())
    }

    fn list(&self) -> Result<Vec<TokenRecord>> {
        Ok(self.records.lock().expect("key store poisoned").clone())
    }

    fn claim_unused(&self) -> Result<Option<String>> {
        let mut records = self.records.lock().expect("key store poisoned");
        match records.iter_mut().find(|r| !r.used) {
            Some(record) => {
                record.used = true;
                Ok(Some(record.value.clone()))
            }
            None => Ok(None),
        }
    }

    fn clear(&self) -> Result<()> {
        self.records.lock().expect("key store poisoned").clear();
        Ok(())
    }
}
