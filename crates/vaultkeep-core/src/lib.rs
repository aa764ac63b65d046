//! Vaultkeep wallet core
//!
//! Password-based vault encryption, secret-to-key derivation and Ed25519
//! signing. Nothing in this crate touches storage or holds session state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod cipher;
pub mod error;
pub mod kdf;
pub mod keys;
pub mod signer;
pub mod vault;

pub use backend::{CryptoBackend, SoftwareBackend};
pub use cipher::Iv;
pub use error::{Error, ErrorCategory, Result};
pub use kdf::{DerivedKey, PassphraseStrength};
pub use keys::{
    classify_secret, derive_keypair, derive_keypair_with_passphrase, generate_mnemonic, is_valid_mnemonic,
    key_material, key_material_with_passphrase, SecretKind,
};
pub use signer::{sign, verify, PublicKey, Signature, SigningKeyPair};
pub use vault::{EncryptedVault, VaultEncryptor};
pub use vaultkeep_params::VaultVersion;
