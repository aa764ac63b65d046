//! Encrypted vault records
//!
//! A vault is the only form in which secret material reaches storage:
//! `{ "version": 2, "iv": <hex>, "cipher": <base64> }`. Records written by
//! the earlier app carry no `version` field and are read as version 1.

use crate::backend::{CryptoBackend, SoftwareBackend};
use crate::cipher::Iv;
use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use vaultkeep_params::{VaultVersion, IV_LEN};
use zeroize::Zeroizing;

/// Encrypted secret plus the parameters needed to decrypt it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedVault {
    /// Format version the record was written with
    pub version: VaultVersion,
    /// Per-encryption random IV
    pub iv: Iv,
    /// Ciphertext (including the GCM tag for authenticated versions)
    pub cipher: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct VaultRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<u8>,
    iv: String,
    cipher: String,
}

impl EncryptedVault {
    /// Serialize to the stored JSON form.
    ///
    /// Version 1 records are written without a version field so the earlier
    /// app can still read them.
    pub fn to_json(&self) -> Result<String> {
        let record = VaultRecord {
            version: match self.version {
                VaultVersion::V1 => None,
                other => Some(other.as_u8()),
            },
            iv: hex::encode(self.iv),
            cipher: BASE64.encode(&self.cipher),
        };
        Ok(serde_json::to_string(&record)?)
    }

    /// Parse the stored JSON form. Any defect is `CorruptVault`.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: VaultRecord = serde_json::from_str(json)
            .map_err(|e| Error::CorruptVault(format!("invalid record: {}", e)))?;

        let version = match record.version {
            None => VaultVersion::V1,
            Some(tag) => VaultVersion::from_u8(tag)?,
        };

        let iv_bytes = hex::decode(record.iv.trim())
            .map_err(|e| Error::CorruptVault(format!("invalid iv: {}", e)))?;
        let iv: Iv = iv_bytes.as_slice().try_into().map_err(|_| {
            Error::CorruptVault(format!("iv must be {} bytes, got {}", IV_LEN, iv_bytes.len()))
        })?;

        let cipher = BASE64
            .decode(record.cipher.trim())
            .map_err(|e| Error::CorruptVault(format!("invalid cipher: {}", e)))?;
        if cipher.is_empty() {
            return Err(Error::CorruptVault("empty cipher".to_string()));
        }

        Ok(Self { version, iv, cipher })
    }
}

/// Password-based vault encryption over a [`CryptoBackend`]
#[derive(Clone)]
pub struct VaultEncryptor {
    backend: Arc<dyn CryptoBackend>,
    version: VaultVersion,
}

impl VaultEncryptor {
    /// Create an encryptor writing records with `version`
    pub fn new(backend: Arc<dyn CryptoBackend>, version: VaultVersion) -> Self {
        Self { backend, version }
    }

    /// Software backend, current format version
    pub fn software() -> Self {
        Self::new(Arc::new(SoftwareBackend), VaultVersion::CURRENT)
    }

    /// Version new records are written with
    pub fn version(&self) -> VaultVersion {
        self.version
    }

    /// Backend in use
    pub fn backend(&self) -> &Arc<dyn CryptoBackend> {
        &self.backend
    }

    /// Encrypt `plaintext` under `password` with a fresh IV
    pub fn encrypt(&self, password: &str, plaintext: &str) -> Result<EncryptedVault> {
        debug!(
            "Encrypting vault: version={} cipher={:?} backend={}",
            self.version,
            self.version.cipher(),
            self.backend.name()
        );
        let mut iv = [0u8; IV_LEN];
        self.backend.random_bytes(&mut iv)?;

        let key = self.backend.derive(password, &self.version.kdf())?;
        let cipher = self
            .backend
            .encrypt(self.version.cipher(), &key, &iv, plaintext.as_bytes())?;

        Ok(EncryptedVault {
            version: self.version,
            iv,
            cipher,
        })
    }

    /// Decrypt `record` with `password`.
    ///
    /// Wrong passwords, foreign records and non-UTF-8 output all fail with
    /// `Error::Decryption`.
    pub fn decrypt(&self, record: &EncryptedVault, password: &str) -> Result<Zeroizing<String>> {
        if !record.version.is_authenticated() {
            debug!("Decrypting unauthenticated vault format {}", record.version);
        }
        let key = self.backend.derive(password, &record.version.kdf())?;
        let bytes = self
            .backend
            .decrypt(record.version.cipher(), &key, &record.iv, &record.cipher)
            .map_err(|e| {
                debug!("Vault decryption rejected (version={})", record.version);
                e
            })?;
        let text = std::str::from_utf8(&bytes).map_err(|_| {
            debug!("Vault plaintext is not UTF-8 (version={})", record.version);
            Error::Decryption
        })?;
        Ok(Zeroizing::new(text.to_owned()))
    }
}

impl std::fmt::Debug for VaultEncryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultEncryptor")
            .field("backend", &self.backend.name())
            .field("version", &self.version)
            .finish()
    }
}

impl Default for VaultEncryptor {
    fn default() -> Self {
        Self::software()
    }
}
