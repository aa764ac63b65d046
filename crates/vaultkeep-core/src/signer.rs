//! Ed25519 message signing
//!
//! Deterministic RFC 8032 signatures over arbitrary bytes. The signer never
//! sees passwords or storage; it only receives raw key material.

use crate::{Error, Result};
use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};

/// Ed25519 private key length
pub const SECRET_KEY_LEN: usize = 32;

/// Ed25519 public key (32 bytes)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    /// Validate and wrap a compressed Edwards point
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self> {
        VerifyingKey::from_bytes(&bytes)
            .map_err(|e| Error::InvalidKey(format!("invalid public key: {}", e)))?;
        Ok(Self(bytes))
    }

    /// Parse from lowercase or uppercase hex
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| Error::InvalidKey(format!("invalid public key hex: {}", e)))?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::InvalidKey(format!("public key must be 32 bytes, got {}", bytes.len())))?;
        Self::from_bytes(bytes)
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Ed25519 signature (64 bytes)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature([u8; 64]);

impl Signature {
    /// Wrap raw signature bytes
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Parse from hex
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| Error::Validation(format!("invalid signature hex: {}", e)))?;
        let bytes: [u8; 64] = bytes.as_slice().try_into().map_err(|_| {
            Error::Validation(format!("signature must be 64 bytes, got {}", bytes.len()))
        })?;
        Ok(Self::from_bytes(bytes))
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Lowercase hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Ed25519 signing key pair.
///
/// The private half is zeroized on drop by `ed25519-dalek`. Deliberately
/// neither `Clone` nor `Debug`.
pub struct SigningKeyPair {
    signing_key: SigningKey,
}

impl SigningKeyPair {
    /// Build from a 32-byte private key
    pub fn from_secret_bytes(secret: &[u8; SECRET_KEY_LEN]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
        }
    }

    /// Build from a key material slice; anything but 32 bytes is `InvalidKey`
    pub fn from_slice(key_material: &[u8]) -> Result<Self> {
        let secret: &[u8; SECRET_KEY_LEN] = key_material.try_into().map_err(|_| {
            Error::InvalidKey(format!(
                "private key must be {} bytes, got {}",
                SECRET_KEY_LEN,
                key_material.len()
            ))
        })?;
        Ok(Self::from_secret_bytes(secret))
    }

    /// Public half
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign `message`
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }
}

/// Sign `message` with raw private key material
pub fn sign(key_material: &[u8], message: &[u8]) -> Result<Signature> {
    let keypair = SigningKeyPair::from_slice(key_material)?;
    Ok(keypair.sign(message))
}

/// Verify `signature` over `message`
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> Result<()> {
    let vk = VerifyingKey::from_bytes(&public_key.0)
        .map_err(|e| Error::InvalidKey(format!("invalid public key: {}", e)))?;
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    vk.verify(message, &sig).map_err(|_| Error::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8032 section 7.1, TEST 1
    const RFC_SECRET: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const RFC_PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const RFC_SIG: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

    #[test]
    fn test_rfc8032_vector() {
        let secret = hex::decode(RFC_SECRET).unwrap();
        let keypair = SigningKeyPair::from_slice(&secret).unwrap();
        assert_eq!(keypair.public_key().to_hex(), RFC_PUBLIC);
        assert_eq!(sign(&secret, b"").unwrap().to_hex(), RFC_SIG);
    }

    #[test]
    fn test_rfc8032_vector_from_hex() {
        let public = PublicKey::from_hex(RFC_PUBLIC).unwrap();
        let signature = Signature::from_hex(RFC_SIG).unwrap();
        verify(&public, b"", &signature).unwrap();
        assert!(matches!(verify(&public, b"x", &signature), Err(Error::InvalidSignature)));

        assert!(Signature::from_hex(&RFC_SIG[..126]).is_err());
        assert!(Signature::from_hex("zz").is_err());
        assert!(PublicKey::from_hex(&RFC_PUBLIC[..62]).is_err());
    }

    #[test]
    fn test_sign_deterministic() {
        let key = [9u8; 32];
        assert_eq!(sign(&key, b"message").unwrap(), sign(&key, b"message").unwrap());
        assert_ne!(sign(&key, b"message").unwrap(), sign(&key, b"other").unwrap());
    }

    #[test]
    fn test_sign_rejects_bad_length() {
        assert!(matches!(sign(&[1u8; 31], b"m"), Err(Error::InvalidKey(_))));
        assert!(matches!(sign(&[1u8; 64], b"m"), Err(Error::InvalidKey(_))));
        assert!(matches!(sign(&[], b"m"), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_verify() {
        let keypair = SigningKeyPair::from_secret_bytes(&[5u8; 32]);
        let public = keypair.public_key();
        let signature = keypair.sign(b"payload");
        assert!(verify(&public, b"payload", &signature).is_ok());
        assert!(matches!(
            verify(&public, b"tampered", &signature),
            Err(Error::InvalidSignature)
        ));
    }

    #[test]
    fn test_public_key_hex() {
        let public = PublicKey::from_hex(RFC_PUBLIC).unwrap();
        assert_eq!(public.to_string(), RFC_PUBLIC);
        assert!(PublicKey::from_hex("abcd").is_err());
    }
}
