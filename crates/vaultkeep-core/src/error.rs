//! Error types for Vaultkeep Core
//!
//! Error taxonomy for vault encryption, session transitions and signing.

use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Vaultkeep Core errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Password did not decrypt the stored vault
    #[error("Wrong password")]
    WrongPassword,

    /// Stored vault field exists but is not a valid record
    #[error("Corrupt vault: {0}")]
    CorruptVault(String),

    /// No vault has been set up
    #[error("Vault not found")]
    VaultNotFound,

    /// Operation requires an unlocked session
    #[error("Session is locked")]
    Locked,

    /// Ciphertext was not produced under this key and IV
    #[error("Decryption failed")]
    Decryption,

    /// Encryption primitive failed
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Malformed signing key material
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Signature does not verify under the given public key
    #[error("Invalid signature")]
    InvalidSignature,

    /// Unsupported cryptographic parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Random source failure
    #[error("Random source error: {0}")]
    Random(String),

    /// Persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Platform keystore failure or refusal
    #[error("Keystore error: {0}")]
    Keystore(String),

    /// Input rejected
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<vaultkeep_params::Error> for Error {
    fn from(err: vaultkeep_params::Error) -> Self {
        match err {
            vaultkeep_params::Error::UnsupportedVersion(v) => {
                Error::CorruptVault(format!("unsupported vault version {}", v))
            }
            other => Error::Validation(other.to_string()),
        }
    }
}

impl Error {
    /// Check if error is a user-facing error (vs internal error)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::WrongPassword
                | Error::CorruptVault(_)
                | Error::VaultNotFound
                | Error::Locked
                | Error::Validation(_)
        )
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            // Corruption is indistinguishable from a bad password for the user;
            // it is logged separately where it is detected.
            Error::WrongPassword | Error::CorruptVault(_) => {
                "Incorrect password. Please try again.".to_string()
            }
            Error::VaultNotFound => {
                "No wallet has been set up on this device yet.".to_string()
            }
            Error::Locked => "The wallet is locked. Unlock it to continue.".to_string(),
            Error::Storage(_) => {
                "Could not save wallet data. Please check free space and try again.".to_string()
            }
            Error::Keystore(_) => {
                "Biometric unlock is unavailable. Please use your password.".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::WrongPassword | Error::Locked | Error::Keystore(_) => ErrorCategory::Auth,
            Error::CorruptVault(_) | Error::VaultNotFound => ErrorCategory::Vault,
            Error::Decryption
            | Error::Encryption(_)
            | Error::InvalidParams(_)
            | Error::Random(_) => ErrorCategory::Crypto,
            Error::InvalidKey(_) | Error::InvalidSignature => ErrorCategory::Keys,
            Error::Storage(_) => ErrorCategory::Storage,
            Error::Validation(_) | Error::Serialization(_) => ErrorCategory::Internal,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Password, session and keystore errors
    Auth,
    /// Stored vault errors
    Vault,
    /// Primitive failures
    Crypto,
    /// Signing key errors
    Keys,
    /// Persistence errors
    Storage,
    /// Internal/system errors
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Auth => write!(f, "Auth"),
            ErrorCategory::Vault => write!(f, "Vault"),
            ErrorCategory::Crypto => write!(f, "Crypto"),
            ErrorCategory::Keys => write!(f, "Keys"),
            ErrorCategory::Storage => write!(f, "Storage"),
            ErrorCategory::Internal => write!(f, "Internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_detection() {
        assert!(Error::WrongPassword.is_user_error());
        assert!(Error::VaultNotFound.is_user_error());
        assert!(!Error::Storage("disk full".to_string()).is_user_error());
        assert!(!Error::InvalidKey("short".to_string()).is_user_error());
    }

    #[test]
    fn test_corrupt_vault_looks_like_wrong_password() {
        let corrupt = Error::CorruptVault("bad json".to_string());
        assert_eq!(corrupt.user_message(), Error::WrongPassword.user_message());
        assert_ne!(corrupt.category(), Error::WrongPassword.category());
    }

    #[test]
    fn test_unsupported_version_maps_to_corrupt() {
        let err: Error = vaultkeep_params::Error::UnsupportedVersion(7).into();
        assert!(matches!(err, Error::CorruptVault(_)));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Auth.to_string(), "Auth");
        assert_eq!(ErrorCategory::Storage.to_string(), "Storage");
    }
}
