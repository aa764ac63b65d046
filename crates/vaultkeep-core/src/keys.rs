//! Secret material to signing keys
//!
//! The decrypted vault holds either a BIP-39 mnemonic or a raw 32-byte
//! private key written as 64 hex characters. Mnemonics go through the
//! SLIP-0010 Ed25519 scheme along `m/44'/313'/0'/0'/{index}'`, optionally
//! salted with a BIP-39 passphrase; raw keys are used as-is and ignore both
//! the account index and the passphrase.

use crate::cipher::fill_random;
use crate::signer::{SigningKeyPair, SECRET_KEY_LEN};
use crate::{Error, Result};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use vaultkeep_params::DERIVATION_PATH_PREFIX;
use zeroize::{Zeroize, Zeroizing};

type HmacSha512 = Hmac<Sha512>;

const HARDENED_OFFSET: u32 = 0x8000_0000;
const MASTER_HMAC_KEY: &[u8] = b"ed25519 seed";

/// Kind of secret stored in a vault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    /// BIP-39 mnemonic phrase
    Mnemonic,
    /// 64 hex characters
    RawPrivateKey,
}

/// Classify a secret without deriving anything
pub fn classify_secret(secret: &str) -> Result<SecretKind> {
    let trimmed = secret.trim();
    if is_raw_private_key(trimmed) {
        return Ok(SecretKind::RawPrivateKey);
    }
    let phrase = normalize_phrase(trimmed);
    bip39::Mnemonic::parse_normalized(&phrase)
        .map(|_| SecretKind::Mnemonic)
        .map_err(|_| unrecognized())
}

/// Mnemonic lengths accepted by [`generate_mnemonic`]
pub const MNEMONIC_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Generate a fresh English BIP-39 mnemonic from OS randomness
pub fn generate_mnemonic(word_count: usize) -> Result<Zeroizing<String>> {
    if !MNEMONIC_WORD_COUNTS.contains(&word_count) {
        return Err(Error::InvalidParams(format!(
            "unsupported mnemonic length {} (expected one of {:?})",
            word_count, MNEMONIC_WORD_COUNTS
        )));
    }

    // 11 bits per word, one checksum bit per 32 entropy bits
    let mut entropy = Zeroizing::new(vec![0u8; word_count * 4 / 3]);
    fill_random(&mut entropy)?;
    let mnemonic = bip39::Mnemonic::from_entropy(&entropy)
        .map_err(|e| Error::InvalidParams(format!("mnemonic generation failed: {}", e)))?;
    Ok(Zeroizing::new(mnemonic.to_string()))
}

/// Phrase is a well-formed BIP-39 mnemonic (words and checksum)
pub fn is_valid_mnemonic(phrase: &str) -> bool {
    let phrase = normalize_phrase(phrase.trim());
    bip39::Mnemonic::parse_normalized(&phrase).is_ok()
}

/// Private key material for account `index`
pub fn key_material(secret: &str, index: u32) -> Result<Zeroizing<[u8; SECRET_KEY_LEN]>> {
    key_material_with_passphrase(secret, "", index)
}

/// Private key material for account `index` under a BIP-39 passphrase.
///
/// The passphrase is used byte-for-byte; non-ASCII input must already be NFKD.
pub fn key_material_with_passphrase(
    secret: &str,
    passphrase: &str,
    index: u32,
) -> Result<Zeroizing<[u8; SECRET_KEY_LEN]>> {
    if index >= HARDENED_OFFSET {
        return Err(Error::InvalidKey(format!("account index {} out of range", index)));
    }

    let trimmed = secret.trim();
    if is_raw_private_key(trimmed) {
        let mut key = Zeroizing::new([0u8; SECRET_KEY_LEN]);
        hex::decode_to_slice(trimmed, &mut key[..])
            .map_err(|e| Error::InvalidKey(format!("invalid private key hex: {}", e)))?;
        return Ok(key);
    }

    let phrase = normalize_phrase(trimmed);
    let mnemonic = bip39::Mnemonic::parse_normalized(&phrase).map_err(|_| unrecognized())?;
    let seed = Zeroizing::new(mnemonic.to_seed_normalized(passphrase));

    let mut path = DERIVATION_PATH_PREFIX.to_vec();
    path.push(index);
    slip10_derive(&seed[..], &path)
}

/// Signing key pair for account `index`
pub fn derive_keypair(secret: &str, index: u32) -> Result<SigningKeyPair> {
    derive_keypair_with_passphrase(secret, "", index)
}

/// Signing key pair for account `index` under a BIP-39 passphrase
pub fn derive_keypair_with_passphrase(secret: &str, passphrase: &str, index: u32) -> Result<SigningKeyPair> {
    let material = key_material_with_passphrase(secret, passphrase, index)?;
    Ok(SigningKeyPair::from_secret_bytes(&material))
}

/// SLIP-0010 Ed25519 derivation of `seed` along hardened `path`.
///
/// Path components are given without the hardened offset.
pub fn slip10_derive(seed: &[u8], path: &[u32]) -> Result<Zeroizing<[u8; 32]>> {
    let master = hmac_sha512(MASTER_HMAC_KEY, seed)?;
    let mut key = Zeroizing::new([0u8; 32]);
    let mut chain_code = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&master[..32]);
    chain_code.copy_from_slice(&master[32..]);

    for &index in path {
        if index >= HARDENED_OFFSET {
            return Err(Error::InvalidKey(format!("path index {} out of range", index)));
        }
        let mut data = Zeroizing::new([0u8; 37]);
        data[1..33].copy_from_slice(&key[..]);
        data[33..].copy_from_slice(&(index | HARDENED_OFFSET).to_be_bytes());

        let child = hmac_sha512(&chain_code[..], &data[..])?;
        key.copy_from_slice(&child[..32]);
        chain_code.copy_from_slice(&child[32..]);
    }

    Ok(key)
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<Zeroizing<[u8; 64]>> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| Error::InvalidParams(format!("HMAC key init failed: {}", e)))?;
    mac.update(data);
    let mut digest = mac.finalize().into_bytes();

    let mut output = Zeroizing::new([0u8; 64]);
    output.copy_from_slice(&digest);
    digest.as_mut_slice().zeroize();
    Ok(output)
}

fn is_raw_private_key(s: &str) -> bool {
    s.len() == SECRET_KEY_LEN * 2 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn normalize_phrase(s: &str) -> Zeroizing<String> {
    Zeroizing::new(
        s.split_whitespace()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join(" "),
    )
}

// Never echo the secret back in the error.
fn unrecognized() -> Error {
    Error::InvalidKey("secret is neither a BIP-39 mnemonic nor a 64-hex private key".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_slip10_vector1_master() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let key = slip10_derive(&seed, &[]).unwrap();
        assert_eq!(
            hex::encode(&key[..]),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
    }

    #[test]
    fn test_slip10_vector1_child() {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let key = slip10_derive(&seed, &[0]).unwrap();
        assert_eq!(
            hex::encode(&key[..]),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify_secret(MNEMONIC).unwrap(), SecretKind::Mnemonic);
        assert_eq!(classify_secret(&"ab".repeat(32)).unwrap(), SecretKind::RawPrivateKey);
        assert!(matches!(classify_secret("mnemonic-words"), Err(Error::InvalidKey(_))));
        assert!(classify_secret("").is_err());
    }

    #[test]
    fn test_mnemonic_whitespace_and_case_normalized() {
        let messy = format!("  {}  ", MNEMONIC.to_uppercase().replace(' ', "   "));
        let a = key_material(MNEMONIC, 0).unwrap();
        let b = key_material(&messy, 0).unwrap();
        assert_eq!(&a[..], &b[..]);
    }

    #[test]
    fn test_accounts_differ() {
        let a = derive_keypair(MNEMONIC, 0).unwrap();
        let b = derive_keypair(MNEMONIC, 1).unwrap();
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_raw_key_ignores_index() {
        let raw = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
        let a = derive_keypair(raw, 0).unwrap();
        let b = derive_keypair(raw, 7).unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(
            a.public_key().to_hex(),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let bad = MNEMONIC.replace("about", "abandon");
        assert!(matches!(key_material(&bad, 0), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_error_does_not_echo_secret() {
        let err = key_material("my secret words", 0).err().unwrap();
        assert!(!err.to_string().contains("secret words"));
    }

    #[test]
    fn test_generate_mnemonic_lengths() {
        for count in MNEMONIC_WORD_COUNTS {
            let phrase = generate_mnemonic(count).unwrap();
            assert_eq!(phrase.split(' ').count(), count);
            assert!(is_valid_mnemonic(&phrase));
            assert_eq!(classify_secret(&phrase).unwrap(), SecretKind::Mnemonic);
        }
    }

    #[test]
    fn test_generate_mnemonic_fresh_each_call() {
        let a = generate_mnemonic(12).unwrap();
        let b = generate_mnemonic(12).unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_generate_mnemonic_bad_length() {
        for count in [0, 11, 13, 25] {
            assert!(matches!(generate_mnemonic(count), Err(Error::InvalidParams(_))));
        }
    }

    #[test]
    fn test_is_valid_mnemonic() {
        assert!(is_valid_mnemonic(MNEMONIC));
        assert!(is_valid_mnemonic(&format!(" {} ", MNEMONIC.to_uppercase())));
        assert!(!is_valid_mnemonic(&MNEMONIC.replace("about", "abandon")));
        assert!(!is_valid_mnemonic("mnemonic-words"));
    }

    #[test]
    fn test_passphrase_changes_key() {
        let plain = key_material(MNEMONIC, 0).unwrap();
        let empty = key_material_with_passphrase(MNEMONIC, "", 0).unwrap();
        let salted = key_material_with_passphrase(MNEMONIC, "TREZOR", 0).unwrap();
        assert_eq!(&plain[..], &empty[..]);
        assert_ne!(&plain[..], &salted[..]);
    }

    #[test]
    fn test_passphrase_ignored_for_raw_key() {
        let raw = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
        let a = derive_keypair_with_passphrase(raw, "extra", 0).unwrap();
        assert_eq!(a.public_key(), derive_keypair(raw, 0).unwrap().public_key());
    }

    #[test]
    fn test_hardened_index_rejected() {
        assert!(key_material(MNEMONIC, HARDENED_OFFSET).is_err());
    }
}
