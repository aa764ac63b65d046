//! Platform keystore integration for biometric unlock
//!
//! A platform keystore (Android Keystore, iOS/macOS Keychain, Windows DPAPI,
//! libsecret) can hold a single generic password string, released after a
//! biometric prompt. It is never the only copy of secret material: the
//! encrypted vault in the key-value store stays authoritative.

use crate::{Error, Result};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use zeroize::Zeroizing;

/// Platform capabilities for secure storage
#[derive(Debug, Clone)]
pub struct KeystoreCapabilities {
    /// Has hardware-backed secure storage (TEE, StrongBox, Secure Enclave)
    pub has_secure_hardware: bool,
    /// Has biometric authentication available
    pub has_biometrics: bool,
    /// Platform name
    pub platform: Platform,
}

impl Default for KeystoreCapabilities {
    fn default() -> Self {
        Self {
            has_secure_hardware: false,
            has_biometrics: false,
            platform: Platform::Unknown,
        }
    }
}

/// Supported platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Android (Keystore, StrongBox)
    Android,
    /// iOS (Keychain, Secure Enclave)
    Ios,
    /// macOS (Keychain, Secure Enclave)
    MacOs,
    /// Windows (DPAPI)
    Windows,
    /// Linux (libsecret)
    Linux,
    /// Unknown platform
    Unknown,
}

impl Platform {
    /// Detect current platform at compile time
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Unknown
        }
    }
}

/// Biometric authentication type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometricType {
    /// Fingerprint sensor
    Fingerprint,
    /// Face recognition (Face ID)
    Face,
    /// Iris scanner
    Iris,
    /// Multiple types available
    Multiple,
    /// Unknown or unavailable
    None,
}

/// Keystore result for operations that may require user interaction
#[derive(Debug)]
pub enum KeystoreResult<T> {
    /// Success
    Success(T),
    /// User cancelled authentication
    Cancelled,
    /// Authentication failed (wrong biometric, etc.)
    AuthFailed,
    /// Keystore not available on this platform
    NotAvailable,
    /// Error occurred
    Error(Error),
}

/// Platform keystore abstraction
///
/// Native builds bridge this to the OS secure storage; the password is
/// stored as a generic credential under `key_id`.
pub trait PlatformKeystore: Send + Sync {
    /// Get platform capabilities
    fn capabilities(&self) -> KeystoreCapabilities;

    /// Store `password` under `key_id`, replacing any previous entry
    fn store_password(&self, key_id: &str, password: &str) -> Result<()>;

    /// Retrieve the password, prompting the user with `reason` if the
    /// platform requires authentication. A missing entry is `NotAvailable`.
    fn retrieve_password(&self, key_id: &str, reason: &str) -> KeystoreResult<Zeroizing<String>>;

    /// Delete the entry; deleting a missing entry is not an error
    fn delete_password(&self, key_id: &str) -> Result<()>;

    /// Check if biometric authentication is available
    fn has_biometrics(&self) -> bool {
        self.capabilities().has_biometrics
    }

    /// Get available biometric type
    fn biometric_type(&self) -> BiometricType;
}

/// Scripted outcome for the next [`MockKeystore::retrieve_password`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOutcome {
    /// User dismissed the prompt
    Cancelled,
    /// Biometric did not match
    AuthFailed,
    /// Keystore unreachable
    NotAvailable,
}

/// In-process keystore for tests and platforms without native integration
pub struct MockKeystore {
    capabilities: KeystoreCapabilities,
    entries: RwLock<HashMap<String, Zeroizing<String>>>,
    next_outcome: Mutex<Option<MockOutcome>>,
}

impl MockKeystore {
    /// Create new mock keystore with biometrics available
    pub fn new() -> Self {
        Self::with_capabilities(KeystoreCapabilities {
            has_secure_hardware: false,
            has_biometrics: true,
            platform: Platform::current(),
        })
    }

    /// Create with custom capabilities (for testing)
    pub fn with_capabilities(capabilities: KeystoreCapabilities) -> Self {
        Self {
            capabilities,
            entries: RwLock::new(HashMap::new()),
            next_outcome: Mutex::new(None),
        }
    }

    /// Make the next retrieval end with `outcome` instead of the stored value
    pub fn script_next(&self, outcome: MockOutcome) {
        *self.next_outcome.lock() = Some(outcome);
    }

    /// Whether an entry exists for `key_id`
    pub fn contains(&self, key_id: &str) -> bool {
        self.entries.read().contains_key(key_id)
    }
}

impl Default for MockKeystore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformKeystore for MockKeystore {
    fn capabilities(&self) -> KeystoreCapabilities {
        self.capabilities.clone()
    }

    fn store_password(&self, key_id: &str, password: &str) -> Result<()> {
        if !self.capabilities.has_biometrics {
            return Err(Error::Keystore("biometrics not available".to_string()));
        }
        self.entries
            .write()
            .insert(key_id.to_string(), Zeroizing::new(password.to_string()));
        Ok(())
    }

    fn retrieve_password(&self, key_id: &str, _reason: &str) -> KeystoreResult<Zeroizing<String>> {
        if !self.capabilities.has_biometrics {
            return KeystoreResult::NotAvailable;
        }
        match self.next_outcome.lock().take() {
            Some(MockOutcome::Cancelled) => return KeystoreResult::Cancelled,
            Some(MockOutcome::AuthFailed) => return KeystoreResult::AuthFailed,
            Some(MockOutcome::NotAvailable) => return KeystoreResult::NotAvailable,
            None => {}
        }
        match self.entries.read().get(key_id) {
            Some(password) => KeystoreResult::Success(Zeroizing::new(password.to_string())),
            None => KeystoreResult::NotAvailable,
        }
    }

    fn delete_password(&self, key_id: &str) -> Result<()> {
        self.entries.write().remove(key_id);
        Ok(())
    }

    fn biometric_type(&self) -> BiometricType {
        if self.capabilities.has_biometrics {
            BiometricType::Fingerprint
        } else {
            BiometricType::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_detection() {
        let platform = Platform::current();
        if cfg!(target_os = "linux") {
            assert_eq!(platform, Platform::Linux);
        }
    }

    #[test]
    fn test_mock_keystore_store_retrieve_delete() {
        let keystore = MockKeystore::new();
        keystore.store_password("vaultkeep", "pw1").unwrap();
        assert!(keystore.contains("vaultkeep"));

        match keystore.retrieve_password("vaultkeep", "Unlock wallet") {
            KeystoreResult::Success(pw) => assert_eq!(pw.as_str(), "pw1"),
            other => panic!("unexpected result: {:?}", other),
        }

        keystore.delete_password("vaultkeep").unwrap();
        assert!(matches!(
            keystore.retrieve_password("vaultkeep", "Unlock wallet"),
            KeystoreResult::NotAvailable
        ));
        keystore.delete_password("vaultkeep").unwrap();
    }

    #[test]
    fn test_scripted_outcome_is_one_shot() {
        let keystore = MockKeystore::new();
        keystore.store_password("id", "pw").unwrap();
        keystore.script_next(MockOutcome::Cancelled);
        assert!(matches!(keystore.retrieve_password("id", ""), KeystoreResult::Cancelled));
        assert!(matches!(keystore.retrieve_password("id", ""), KeystoreResult::Success(_)));
    }

    #[test]
    fn test_no_biometrics() {
        let keystore = MockKeystore::with_capabilities(KeystoreCapabilities::default());
        assert!(!keystore.has_biometrics());
        assert_eq!(keystore.biometric_type(), BiometricType::None);
        assert!(keystore.store_password("id", "pw").is_err());
        assert!(matches!(keystore.retrieve_password("id", ""), KeystoreResult::NotAvailable));
    }
}
