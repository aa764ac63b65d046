//! Password-based key derivation
//!
//! PBKDF2-HMAC-SHA512 with parameters frozen per vault version. Derived keys
//! are zeroized on drop and intentionally implement neither `Clone` nor
//! `Debug`.

use crate::{Error, Result};
use sha2::{Digest, Sha256, Sha512};
use vaultkeep_params::{KdfParams, PasswordPrehash, KEY_LEN};
use zeroize::Zeroizing;

/// Symmetric key derived from a password
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    /// Create from raw key bytes
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Get key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Derive a key with PBKDF2-HMAC-SHA512.
///
/// `output_bits` must equal the cipher key size; anything else is a
/// programming error rather than a user error.
pub fn derive(password: &[u8], salt: &[u8], iterations: u32, output_bits: u32) -> Result<DerivedKey> {
    if output_bits as usize != KEY_LEN * 8 {
        return Err(Error::InvalidParams(format!(
            "output length {} bits does not match {}-bit cipher key",
            output_bits,
            KEY_LEN * 8
        )));
    }
    if iterations == 0 {
        return Err(Error::InvalidParams("iteration count must be positive".to_string()));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, iterations, &mut *key);
    Ok(DerivedKey(key))
}

/// Apply the version's password prehash and derive the key.
pub fn derive_for(password: &str, params: &KdfParams) -> Result<DerivedKey> {
    let input = prehash_password(password, params.prehash);
    derive(&input, params.salt, params.iterations, params.output_bits)
}

/// Bytes fed into PBKDF2 for a given prehash mode
pub fn prehash_password(password: &str, prehash: PasswordPrehash) -> Zeroizing<Vec<u8>> {
    match prehash {
        PasswordPrehash::None => Zeroizing::new(password.as_bytes().to_vec()),
        PasswordPrehash::Sha256Hex => {
            let digest: Zeroizing<[u8; 32]> =
                Zeroizing::new(Sha256::digest(password.as_bytes()).into());
            Zeroizing::new(hex::encode(&digest[..]).into_bytes())
        }
    }
}

/// Passphrase strength estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PassphraseStrength {
    /// Weak: < 8 characters
    Weak,
    /// Fair: 8-11 characters
    Fair,
    /// Good: 12-15 characters, or longer without variety
    Good,
    /// Strong: 16+ characters with variety
    Strong,
}

impl PassphraseStrength {
    /// Evaluate passphrase strength.
    ///
    /// Advisory only: weak and even empty passwords are accepted by the
    /// vault, they just yield weak keys.
    pub fn evaluate(passphrase: &str) -> Self {
        let len = passphrase.chars().count();
        let has_lower = passphrase.chars().any(|c| c.is_lowercase());
        let has_upper = passphrase.chars().any(|c| c.is_uppercase());
        let has_digit = passphrase.chars().any(|c| c.is_ascii_digit());
        let has_special = passphrase.chars().any(|c| !c.is_alphanumeric());

        let variety_score = [has_lower, has_upper, has_digit, has_special]
            .iter()
            .filter(|&&b| b)
            .count();

        if len < 8 {
            PassphraseStrength::Weak
        } else if len < 12 {
            PassphraseStrength::Fair
        } else if len < 16 || variety_score < 3 {
            PassphraseStrength::Good
        } else {
            PassphraseStrength::Strong
        }
    }

    /// Check if the strength is what the UI should recommend
    pub fn is_recommended(&self) -> bool {
        matches!(self, Self::Good | Self::Strong)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultkeep_params::VaultVersion;

    #[test]
    fn test_derive_deterministic() {
        let key1 = derive(b"password", b"salt", 1_000, 256).unwrap();
        let key2 = derive(b"password", b"salt", 1_000, 256).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
        assert!(key1.as_bytes().iter().any(|&b| b != 0));
    }

    #[test]
    fn test_derive_inputs_matter() {
        let base = derive(b"password", b"salt", 1_000, 256).unwrap();
        let other_pw = derive(b"Password", b"salt", 1_000, 256).unwrap();
        let other_salt = derive(b"password", b"salT", 1_000, 256).unwrap();
        let other_iter = derive(b"password", b"salt", 1_001, 256).unwrap();
        assert_ne!(base.as_bytes(), other_pw.as_bytes());
        assert_ne!(base.as_bytes(), other_salt.as_bytes());
        assert_ne!(base.as_bytes(), other_iter.as_bytes());
    }

    #[test]
    fn test_pbkdf2_sha512_vector() {
        // RFC 6070-style input, SHA-512 variant, first 32 bytes of the output
        let key = derive(b"password", b"salt", 1, 256).unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "867f70cf1ade02cff3752599a3a53dc4af34c7a669815ae5d513554e1c8cf252"
        );
    }

    #[test]
    fn test_wrong_output_length_rejected() {
        assert!(matches!(
            derive(b"pw", b"salt", 10, 128),
            Err(Error::InvalidParams(_))
        ));
        assert!(derive(b"pw", b"salt", 0, 256).is_err());
    }

    #[test]
    fn test_empty_password_permitted() {
        assert!(derive(b"", b"salt", 10, 256).is_ok());
    }

    #[test]
    fn test_sha256_hex_prehash() {
        let input = prehash_password("abc", PasswordPrehash::Sha256Hex);
        assert_eq!(
            std::str::from_utf8(&input).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        let raw = prehash_password("abc", PasswordPrehash::None);
        assert_eq!(&raw[..], b"abc");
    }

    #[test]
    fn test_derive_for_versions_differ() {
        let v1 = derive_for("pw", &VaultVersion::V1.kdf()).unwrap();
        let v2 = derive_for("pw", &VaultVersion::V2.kdf()).unwrap();
        assert_ne!(v1.as_bytes(), v2.as_bytes());
    }

    #[test]
    fn test_passphrase_strength_evaluation() {
        assert_eq!(PassphraseStrength::evaluate(""), PassphraseStrength::Weak);
        assert_eq!(PassphraseStrength::evaluate("1234567"), PassphraseStrength::Weak);
        assert_eq!(PassphraseStrength::evaluate("password12"), PassphraseStrength::Fair);
        assert_eq!(PassphraseStrength::evaluate("MyPassword123"), PassphraseStrength::Good);
        assert_eq!(
            PassphraseStrength::evaluate("MySecurePass123!@#"),
            PassphraseStrength::Strong
        );
        assert!(!PassphraseStrength::Fair.is_recommended());
        assert!(PassphraseStrength::Good.is_recommended());
    }
}
