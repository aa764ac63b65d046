//! Wallet service facade
//!
//! Owns one session guard, the keystore unlock helper and the currency
//! settings over a single storage adapter.

use crate::config::ServiceConfig;
use crate::currency::CurrencySettings;
use crate::error::Result;
use crate::guard::SessionGuard;
use crate::keychain::KeychainUnlock;
use crate::session::SessionStatus;
use std::sync::Arc;
use tracing::info;
use vaultkeep_core::{CryptoBackend, SoftwareBackend, VaultEncryptor};
use vaultkeep_storage_sqlite::{KeyValueStore, PlatformKeystore};

/// Wallet service
pub struct WalletService {
    guard: SessionGuard,
    keychain: KeychainUnlock,
    currency: CurrencySettings,
    config: ServiceConfig,
}

impl WalletService {
    /// Create with the software crypto backend
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        keystore: Arc<dyn PlatformKeystore>,
        config: ServiceConfig,
    ) -> Result<Self> {
        Self::with_backend(store, keystore, Arc::new(SoftwareBackend), config)
    }

    /// Create with an explicit crypto backend
    pub fn with_backend(
        store: Arc<dyn KeyValueStore>,
        keystore: Arc<dyn PlatformKeystore>,
        backend: Arc<dyn CryptoBackend>,
        config: ServiceConfig,
    ) -> Result<Self> {
        config.validate()?;
        let encryptor = VaultEncryptor::new(backend, config.vault_version);
        Ok(Self {
            guard: SessionGuard::new(Arc::clone(&store), encryptor),
            keychain: KeychainUnlock::new(Arc::clone(&store), keystore, config.keystore_key_id.clone()),
            currency: CurrencySettings::new(store, &config.default_currency)?,
            config,
        })
    }

    /// Session guard
    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    /// Keystore unlock
    pub fn keychain(&self) -> &KeychainUnlock {
        &self.keychain
    }

    /// Currency settings
    pub fn currency(&self) -> &CurrencySettings {
        &self.currency
    }

    /// Active configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Session status
    pub fn status(&self) -> SessionStatus {
        self.guard.status()
    }

    /// Reload everything from storage, guard first
    pub async fn sync(&self) -> Result<()> {
        self.guard.sync().await?;
        self.currency.sync().await?;
        Ok(())
    }

    /// Enable keystore unlock with `password`
    pub async fn enable_keystore_unlock(&self, password: &str) -> Result<()> {
        self.keychain.enable(&self.guard, password).await
    }

    /// Unlock with the password parked in the keystore
    pub async fn unlock_with_keystore(&self) -> Result<()> {
        self.keychain.unlock(&self.guard).await
    }

    /// Disable keystore unlock
    pub async fn disable_keystore_unlock(&self) -> Result<()> {
        self.keychain.disable().await
    }

    /// Remove the vault, the keystore password and the access-control
    /// marker. The display currency is kept.
    ///
    /// Keystore unlock goes first: a storage failure stops the wipe with the
    /// vault still present and the call can be repeated.
    pub async fn wipe(&self) -> Result<()> {
        self.keychain.disable().await?;
        self.guard.wipe().await?;
        info!("Wallet wiped");
        Ok(())
    }
}
