//! Key-value storage adapter
//!
//! Values are opaque strings under well-known keys (see
//! [`vaultkeep_params::StorageField`]). Durability is per key; there are no
//! multi-key transactions.

use crate::{Error, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use vaultkeep_params::StorageField;

/// Persistent string store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; deleting an absent key is not an error
    async fn remove(&self, key: &str) -> Result<()>;

    /// Read a well-known field
    async fn get_field(&self, field: StorageField) -> Result<Option<String>> {
        self.get(field.key()).await
    }

    /// Write a well-known field
    async fn set_field(&self, field: StorageField, value: &str) -> Result<()> {
        self.set(field.key(), value).await
    }

    /// Delete a well-known field
    async fn remove_field(&self, field: StorageField) -> Result<()> {
        self.remove(field.key()).await
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(Error::Validation("empty storage key".to_string()));
        }
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.write().remove(key);
        Ok(())
    }
}

/// Stores with injectable failures
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// [`MemoryStore`] whose writes can be made to fail
    #[derive(Debug, Default)]
    pub struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
        fail_reads: AtomicBool,
        writes: AtomicUsize,
    }

    impl FlakyStore {
        /// Create empty store with no failures armed
        pub fn new() -> Self {
            Self::default()
        }

        /// Make `set` and `remove` fail until disarmed
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Make `get` fail until disarmed
        pub fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        /// Successful writes so far
        pub fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(Error::Storage("injected read failure".to_string()));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Error::Storage("injected write failure".to_string()));
            }
            self.inner.set(key, value).await?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Error::Storage("injected write failure".to_string()));
            }
            self.inner.remove(key).await?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
