//! Symmetric encryption primitives
//!
//! AES-256 with a 128-bit IV in two constructions:
//!
//! - **CBC + PKCS#7** for legacy vaults. There is no integrity tag; a wrong
//!   key is only noticed when the padding check fails.
//! - **GCM with a 16-byte nonce** for current vaults. A wrong key always
//!   fails tag verification.
//!
//! Every failure on the decrypt path is reported as [`Error::Decryption`]
//! so callers cannot tell a padding error from a tag mismatch.

use crate::kdf::DerivedKey;
use crate::{Error, Result};
use aes::Aes256;
use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::AesGcm;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use vaultkeep_params::{CipherSuite, IV_LEN};
use zeroize::Zeroizing;

/// 128-bit initialization vector
pub type Iv = [u8; IV_LEN];

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Encrypt `plaintext` under `key` and `iv`
pub fn encrypt(suite: CipherSuite, key: &DerivedKey, iv: &Iv, plaintext: &[u8]) -> Result<Vec<u8>> {
    match suite {
        CipherSuite::Aes256Cbc => {
            let cipher = Aes256CbcEnc::new(key.as_bytes().into(), iv.into());
            Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
        }
        CipherSuite::Aes256Gcm => {
            let cipher = Aes256Gcm16::new(key.as_bytes().into());
            cipher
                .encrypt(iv.into(), plaintext)
                .map_err(|e| Error::Encryption(e.to_string()))
        }
    }
}

/// Decrypt `ciphertext` under `key` and `iv`
pub fn decrypt(
    suite: CipherSuite,
    key: &DerivedKey,
    iv: &Iv,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let plaintext = match suite {
        CipherSuite::Aes256Cbc => {
            let cipher = Aes256CbcDec::new(key.as_bytes().into(), iv.into());
            cipher
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| Error::Decryption)?
        }
        CipherSuite::Aes256Gcm => {
            let cipher = Aes256Gcm16::new(key.as_bytes().into());
            cipher
                .decrypt(iv.into(), ciphertext)
                .map_err(|_| Error::Decryption)?
        }
    };
    Ok(Zeroizing::new(plaintext))
}

/// Fill `buf` from the OS random source
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| Error::Random(e.to_string()))
}

/// Fresh random IV
pub fn random_iv() -> Result<Iv> {
    let mut iv = [0u8; IV_LEN];
    fill_random(&mut iv)?;
    Ok(iv)
}
