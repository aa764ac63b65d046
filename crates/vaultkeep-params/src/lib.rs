//! Vaultkeep parameters and constants
//!
//! This crate pins everything that must stay stable for the lifetime of a
//! stored vault: the vault format versions with their KDF and cipher
//! parameters, the storage field names, the signing derivation path and
//! the supported display currencies.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod currency;
pub mod derivation;
pub mod fields;
pub mod format;

pub use currency::{is_supported_currency, DEFAULT_CURRENCY, SUPPORTED_CURRENCIES};
pub use derivation::{DERIVATION_PATH_PREFIX, SLIP10_COIN_TYPE};
pub use fields::StorageField;
pub use format::{CipherSuite, KdfParams, PasswordPrehash, VaultVersion, IV_LEN, KEY_LEN};

/// Error types for parameter lookups
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Vault format version this build does not know
    #[error("Unsupported vault version: {0}")]
    UnsupportedVersion(u8),
}

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;
