//! Service configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use vaultkeep_params::{is_supported_currency, VaultVersion, DEFAULT_CURRENCY};

/// Default keystore entry id for the parked password
pub const DEFAULT_KEYSTORE_KEY_ID: &str = "vaultkeep.wallet.password";

/// Wallet service settings, loadable from a JSON file.
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Format version for newly written vaults
    pub vault_version: VaultVersion,
    /// Keystore entry id used for biometric unlock
    pub keystore_key_id: String,
    /// Display currency until the user picks one
    pub default_currency: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            vault_version: VaultVersion::CURRENT,
            keystore_key_id: DEFAULT_KEYSTORE_KEY_ID.to_string(),
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load and validate a JSON config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Validation(format!("cannot read config {}: {}", path.display(), e))
        })?;
        let config: ServiceConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values
    pub fn validate(&self) -> Result<()> {
        if self.keystore_key_id.trim().is_empty() {
            return Err(Error::Validation("keystore_key_id must not be empty".to_string()));
        }
        if !is_supported_currency(&self.default_currency.to_lowercase()) {
            return Err(Error::Validation(format!(
                "unsupported default_currency: {}",
                self.default_currency
            )));
        }
        Ok(())
    }
}
