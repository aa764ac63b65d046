//! Keystore (biometric) unlock
//!
//! The wallet password can be parked in the platform keystore so the user
//! unlocks with a biometric prompt instead of typing it. The
//! `access-control` field records that this is enabled. The keystore copy
//! is a convenience only; the vault itself is unchanged.

use crate::error::{from_storage, Error, Result, StorageResultExt};
use crate::guard::SessionGuard;
use std::sync::Arc;
use tracing::{info, warn};
use vaultkeep_params::StorageField;
use vaultkeep_storage_sqlite::{BiometricType, KeyValueStore, KeystoreResult, PlatformKeystore};

/// Prompt shown by the platform when releasing the password
pub const UNLOCK_REASON: &str = "Unlock your wallet";

/// Keystore-backed unlock
pub struct KeychainUnlock {
    store: Arc<dyn KeyValueStore>,
    keystore: Arc<dyn PlatformKeystore>,
    key_id: String,
}

impl KeychainUnlock {
    /// Create with the keystore entry id `key_id`
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        keystore: Arc<dyn PlatformKeystore>,
        key_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            keystore,
            key_id: key_id.into(),
        }
    }

    /// Platform can release the password with a biometric prompt
    pub fn is_supported(&self) -> bool {
        self.keystore.has_biometrics()
    }

    /// Biometric type reported by the platform
    pub fn biometric_type(&self) -> BiometricType {
        self.keystore.biometric_type()
    }

    /// Keystore unlock has been enabled on this device
    pub async fn is_enabled(&self) -> Result<bool> {
        Ok(self
            .store
            .get_field(StorageField::AccessControl)
            .await
            .or_storage()?
            .is_some())
    }

    /// Verify `password` against the vault, then store it in the keystore
    pub async fn enable(&self, guard: &SessionGuard, password: &str) -> Result<()> {
        if !self.is_supported() {
            return Err(Error::Keystore("biometric unlock is not available".to_string()));
        }

        // Only a password that opens the vault may be parked
        guard.get_secret(password).await?;

        self.keystore
            .store_password(&self.key_id, password)
            .map_err(from_storage)?;

        let marker = access_control_marker(self.biometric_type());
        if let Err(e) = self
            .store
            .set_field(StorageField::AccessControl, marker)
            .await
            .or_storage()
        {
            // Do not leave an orphaned keystore entry behind
            if let Err(rollback) = self.keystore.delete_password(&self.key_id) {
                warn!("Failed to remove keystore entry after marker write failed: {}", rollback);
            }
            return Err(e);
        }

        info!(
            "Keystore unlock enabled ({}, secure hardware: {})",
            marker,
            self.keystore.capabilities().has_secure_hardware
        );
        Ok(())
    }

    /// Release the password from the keystore and unlock with it.
    ///
    /// A stored password that no longer opens the vault is removed and
    /// reported as `WrongPassword`.
    pub async fn unlock(&self, guard: &SessionGuard) -> Result<()> {
        if !self.is_enabled().await? {
            return Err(Error::Keystore("keystore unlock is not enabled".to_string()));
        }

        let password = match self.keystore.retrieve_password(&self.key_id, UNLOCK_REASON) {
            KeystoreResult::Success(password) => password,
            KeystoreResult::Cancelled => {
                return Err(Error::Keystore("authentication cancelled".to_string()))
            }
            KeystoreResult::AuthFailed => {
                return Err(Error::Keystore("authentication failed".to_string()))
            }
            KeystoreResult::NotAvailable => {
                return Err(Error::Keystore("keystore entry not available".to_string()))
            }
            KeystoreResult::Error(e) => return Err(from_storage(e)),
        };

        match guard.unlock(&password).await {
            Err(Error::WrongPassword) => {
                warn!("Keystore password no longer opens the vault; disabling keystore unlock");
                if let Err(e) = self.disable().await {
                    warn!("Failed to disable stale keystore unlock: {}", e);
                }
                Err(Error::WrongPassword)
            }
            other => other,
        }
    }

    /// Delete the access-control marker, then the keystore entry.
    ///
    /// If the marker cannot be removed nothing changes. Safe to repeat.
    pub async fn disable(&self) -> Result<()> {
        self.store
            .remove_field(StorageField::AccessControl)
            .await
            .or_storage()?;
        self.keystore
            .delete_password(&self.key_id)
            .map_err(from_storage)?;
        info!("Keystore unlock disabled");
        Ok(())
    }
}

fn access_control_marker(kind: BiometricType) -> &'static str {
    match kind {
        BiometricType::Fingerprint => "fingerprint",
        BiometricType::Face => "face",
        BiometricType::Iris => "iris",
        BiometricType::Multiple => "biometric",
        BiometricType::None => "device-passcode",
    }
}
