//! Pluggable crypto backend
//!
//! The vault encryptor never calls primitives directly; it goes through a
//! [`CryptoBackend`] so a platform build can route derivation, ciphers and
//! randomness to a hardened native implementation. [`SoftwareBackend`] is
//! the RustCrypto implementation used everywhere else.

use crate::cipher::{self, Iv};
use crate::kdf::{self, DerivedKey};
use crate::Result;
use vaultkeep_params::{CipherSuite, KdfParams};
use zeroize::Zeroizing;

/// Capability set the vault needs from a crypto provider
pub trait CryptoBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Derive the vault key for `password` under frozen `params`
    fn derive(&self, password: &str, params: &KdfParams) -> Result<DerivedKey>;

    /// Encrypt under `(key, iv)`
    fn encrypt(&self, suite: CipherSuite, key: &DerivedKey, iv: &Iv, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt under `(key, iv)`; any mismatch is `Error::Decryption`
    fn decrypt(
        &self,
        suite: CipherSuite,
        key: &DerivedKey,
        iv: &Iv,
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>>;

    /// Fill `buf` from a cryptographically secure source
    fn random_bytes(&self, buf: &mut [u8]) -> Result<()>;
}

/// Pure-Rust backend (PBKDF2-HMAC-SHA512, AES, OS randomness)
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftwareBackend;

impl CryptoBackend for SoftwareBackend {
    fn name(&self) -> &'static str {
        "software"
    }

    fn derive(&self, password: &str, params: &KdfParams) -> Result<DerivedKey> {
        kdf::derive_for(password, params)
    }

    fn encrypt(&self, suite: CipherSuite, key: &DerivedKey, iv: &Iv, plaintext: &[u8]) -> Result<Vec<u8>> {
        cipher::encrypt(suite, key, iv, plaintext)
    }

    fn decrypt(
        &self,
        suite: CipherSuite,
        key: &DerivedKey,
        iv: &Iv,
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        cipher::decrypt(suite, key, iv, ciphertext)
    }

    fn random_bytes(&self, buf: &mut [u8]) -> Result<()> {
        cipher::fill_random(buf)
    }
}

/// Instrumented backends for tests in this and downstream crates
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Software backend that counts key derivations
    #[derive(Debug, Default)]
    pub struct CountingBackend {
        derivations: AtomicUsize,
    }

    impl CountingBackend {
        /// Create with a zero counter
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of `derive` calls so far
        pub fn derivations(&self) -> usize {
            self.derivations.load(Ordering::SeqCst)
        }
    }

    impl CryptoBackend for CountingBackend {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn derive(&self, password: &str, params: &KdfParams) -> Result<DerivedKey> {
            self.derivations.fetch_add(1, Ordering::SeqCst);
            SoftwareBackend.derive(password, params)
        }

        fn encrypt(&self, suite: CipherSuite, key: &DerivedKey, iv: &Iv, plaintext: &[u8]) -> Result<Vec<u8>> {
            SoftwareBackend.encrypt(suite, key, iv, plaintext)
        }

        fn decrypt(
            &self,
            suite: CipherSuite,
            key: &DerivedKey,
            iv: &Iv,
            ciphertext: &[u8],
        ) -> Result<Zeroizing<Vec<u8>>> {
            SoftwareBackend.decrypt(suite, key, iv, ciphertext)
        }

        fn random_bytes(&self, buf: &mut [u8]) -> Result<()> {
            SoftwareBackend.random_bytes(buf)
        }
    }

    /// Software backend whose "random" source always yields the same byte.
    /// Only useful to pin IVs in known-answer tests.
    #[derive(Debug, Clone, Copy)]
    pub struct FixedRandomBackend(pub u8);

    impl CryptoBackend for FixedRandomBackend {
        fn name(&self) -> &'static str {
            "fixed-random"
        }

        fn derive(&self, password: &str, params: &KdfParams) -> Result<DerivedKey> {
            SoftwareBackend.derive(password, params)
        }

        fn encrypt(&self, suite: CipherSuite, key: &DerivedKey, iv: &Iv, plaintext: &[u8]) -> Result<Vec<u8>> {
            SoftwareBackend.encrypt(suite, key, iv, plaintext)
        }

        fn decrypt(
            &self,
            suite: CipherSuite,
            key: &DerivedKey,
            iv: &Iv,
            ciphertext: &[u8],
        ) -> Result<Zeroizing<Vec<u8>>> {
            SoftwareBackend.decrypt(suite, key, iv, ciphertext)
        }

        fn random_bytes(&self, buf: &mut [u8]) -> Result<()> {
            buf.fill(self.0);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::CountingBackend;
    use super::*;
    use vaultkeep_params::VaultVersion;

    #[test]
    fn test_software_backend_random_bytes() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        SoftwareBackend.random_bytes(&mut a).unwrap();
        SoftwareBackend.random_bytes(&mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_counting_backend_counts() {
        let backend = CountingBackend::new();
        backend.derive("pw", &VaultVersion::V1.kdf()).unwrap();
        backend.derive("pw", &VaultVersion::V1.kdf()).unwrap();
        assert_eq!(backend.derivations(), 2);
    }
}
