//! Display currency preference

use crate::error::{Error, Result, StorageResultExt};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};
use vaultkeep_params::{is_supported_currency, StorageField};
use vaultkeep_storage_sqlite::KeyValueStore;

/// Persisted display currency with an in-memory copy
pub struct CurrencySettings {
    store: Arc<dyn KeyValueStore>,
    default: String,
    current: RwLock<String>,
}

impl CurrencySettings {
    /// Create with `default` as the fallback code
    pub fn new(store: Arc<dyn KeyValueStore>, default: &str) -> Result<Self> {
        let default = normalize(default)?;
        Ok(Self {
            store,
            current: RwLock::new(default.clone()),
            default,
        })
    }

    /// Current code
    pub fn currency(&self) -> String {
        self.current.read().clone()
    }

    /// Fallback code
    pub fn default_currency(&self) -> &str {
        &self.default
    }

    /// Persist a new code; codes are case-insensitive
    pub async fn set_currency(&self, code: &str) -> Result<()> {
        let code = normalize(code)?;
        self.store
            .set_field(StorageField::Currency, &code)
            .await
            .or_storage()?;
        debug!("Currency set to {}", code);
        *self.current.write() = code;
        Ok(())
    }

    /// Forget the stored code and fall back to the default
    pub async fn reset_currency(&self) -> Result<()> {
        self.store
            .remove_field(StorageField::Currency)
            .await
            .or_storage()?;
        *self.current.write() = self.default.clone();
        Ok(())
    }

    /// Load the stored code; unknown codes fall back to the default
    pub async fn sync(&self) -> Result<()> {
        let stored = self
            .store
            .get_field(StorageField::Currency)
            .await
            .or_storage()?;
        let code = match stored {
            Some(code) => match normalize(&code) {
                Ok(code) => code,
                Err(_) => {
                    warn!("Ignoring unsupported stored currency {:?}", code);
                    self.default.clone()
                }
            },
            None => self.default.clone(),
        };
        *self.current.write() = code;
        Ok(())
    }
}

fn normalize(code: &str) -> Result<String> {
    let code = code.trim().to_lowercase();
    if is_supported_currency(&code) {
        Ok(code)
    } else {
        Err(Error::Validation(format!("unsupported currency: {}", code)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultkeep_params::DEFAULT_CURRENCY;
    use vaultkeep_storage_sqlite::MemoryStore;

    fn settings(store: Arc<MemoryStore>) -> CurrencySettings {
        CurrencySettings::new(store, DEFAULT_CURRENCY).unwrap()
    }

    #[tokio::test]
    async fn test_default_until_set() {
        let store = Arc::new(MemoryStore::new());
        let currency = settings(store.clone());
        currency.sync().await.unwrap();
        assert_eq!(currency.currency(), "usd");

        currency.set_currency(" EUR ").await.unwrap();
        assert_eq!(currency.currency(), "eur");
        assert_eq!(store.get("currency").await.unwrap().as_deref(), Some("eur"));
    }

    #[tokio::test]
    async fn test_unsupported_rejected() {
        let store = Arc::new(MemoryStore::new());
        let currency = settings(store.clone());
        assert!(matches!(currency.set_currency("doge").await, Err(Error::Validation(_))));
        assert_eq!(currency.currency(), "usd");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_sync_and_reset() {
        let store = Arc::new(MemoryStore::new());
        store.set("currency", "jpy").await.unwrap();
        let currency = settings(store.clone());
        currency.sync().await.unwrap();
        assert_eq!(currency.currency(), "jpy");

        currency.reset_currency().await.unwrap();
        assert_eq!(currency.currency(), "usd");
        assert_eq!(store.get("currency").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sync_ignores_garbage() {
        let store = Arc::new(MemoryStore::new());
        store.set("currency", "???").await.unwrap();
        let currency = settings(store);
        currency.sync().await.unwrap();
        assert_eq!(currency.currency(), "usd");
    }

    #[test]
    fn test_bad_default_rejected() {
        assert!(CurrencySettings::new(Arc::new(MemoryStore::new()), "xyz").is_err());
    }
}
