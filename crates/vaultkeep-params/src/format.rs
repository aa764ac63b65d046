//! Vault format versions
//!
//! The KDF salt, iteration count and cipher suite are baked into every
//! stored vault. Changing any of them without bumping the version would make
//! existing vaults undecryptable, so each version owns a frozen parameter set.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Symmetric key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// Initialization vector length in bytes
pub const IV_LEN: usize = 16;

/// Block cipher construction used by a vault version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherSuite {
    /// AES-256-CBC with PKCS#7 padding (no integrity tag)
    Aes256Cbc,
    /// AES-256-GCM with a 128-bit nonce
    Aes256Gcm,
}

/// Transformation applied to the password before PBKDF2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordPrehash {
    /// Password bytes go into PBKDF2 unchanged
    None,
    /// Lowercase hex of SHA-256(password) goes into PBKDF2
    Sha256Hex,
}

/// Frozen key-derivation parameters for one vault version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Fixed application-level salt
    pub salt: &'static [u8],
    /// PBKDF2 iteration count
    pub iterations: u32,
    /// Derived key length in bits
    pub output_bits: u32,
    /// Password transformation before derivation
    pub prehash: PasswordPrehash,
}

/// Vault format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VaultVersion {
    /// Records written by the earlier mobile app. They carry no version
    /// field at all.
    V1,
    /// Authenticated format with a stronger iteration count
    V2,
}

impl VaultVersion {
    /// Version used for new vaults
    pub const CURRENT: VaultVersion = VaultVersion::V2;

    /// All versions this build can decrypt
    pub const ALL: [VaultVersion; 2] = [VaultVersion::V1, VaultVersion::V2];

    /// Numeric tag stored alongside the record
    pub const fn as_u8(self) -> u8 {
        match self {
            VaultVersion::V1 => 1,
            VaultVersion::V2 => 2,
        }
    }

    /// Parse numeric tag
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            1 => Ok(VaultVersion::V1),
            2 => Ok(VaultVersion::V2),
            other => Err(Error::UnsupportedVersion(other)),
        }
    }

    /// KDF parameters for this version
    pub const fn kdf(self) -> KdfParams {
        match self {
            VaultVersion::V1 => KdfParams {
                salt: b"ZilPay",
                iterations: 5_000,
                output_bits: 256,
                prehash: PasswordPrehash::Sha256Hex,
            },
            VaultVersion::V2 => KdfParams {
                salt: b"vaultkeep/vault/v2",
                iterations: 100_000,
                output_bits: 256,
                prehash: PasswordPrehash::None,
            },
        }
    }

    /// Cipher suite for this version
    pub const fn cipher(self) -> CipherSuite {
        match self {
            VaultVersion::V1 => CipherSuite::Aes256Cbc,
            VaultVersion::V2 => CipherSuite::Aes256Gcm,
        }
    }

    /// Whether decryption failures are detected by an authentication tag
    pub const fn is_authenticated(self) -> bool {
        matches!(self.cipher(), CipherSuite::Aes256Gcm)
    }
}

impl Default for VaultVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl TryFrom<u8> for VaultVersion {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value)
    }
}

impl From<VaultVersion> for u8 {
    fn from(version: VaultVersion) -> Self {
        version.as_u8()
    }
}

impl std::fmt::Display for VaultVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_tags_roundtrip() {
        for version in VaultVersion::ALL {
            assert_eq!(VaultVersion::from_u8(version.as_u8()).unwrap(), version);
        }
        assert!(VaultVersion::from_u8(0).is_err());
        assert!(VaultVersion::from_u8(3).is_err());
    }

    #[test]
    fn test_output_matches_key_len() {
        for version in VaultVersion::ALL {
            assert_eq!(version.kdf().output_bits as usize, KEY_LEN * 8);
        }
    }

    #[test]
    fn test_legacy_parameters_frozen() {
        let kdf = VaultVersion::V1.kdf();
        assert_eq!(kdf.salt, b"ZilPay");
        assert_eq!(kdf.iterations, 5_000);
        assert_eq!(kdf.prehash, PasswordPrehash::Sha256Hex);
        assert_eq!(VaultVersion::V1.cipher(), CipherSuite::Aes256Cbc);
        assert!(!VaultVersion::V1.is_authenticated());
    }

    #[test]
    fn test_current_is_authenticated() {
        assert!(VaultVersion::CURRENT.is_authenticated());
        assert!(VaultVersion::CURRENT.kdf().iterations >= VaultVersion::V1.kdf().iterations);
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&VaultVersion::V2).unwrap();
        assert_eq!(json, "2");
        let parsed: VaultVersion = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, VaultVersion::V1);
        assert!(serde_json::from_str::<VaultVersion>("9").is_err());
    }
}
