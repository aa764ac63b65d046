//! Signing key derivation path

/// BIP-44 coin type used in the SLIP-0010 path
pub const SLIP10_COIN_TYPE: u32 = 313;

/// Hardened path prefix; the account index is appended as the last hardened
/// component (`m/44'/313'/0'/0'/{index}'`).
pub const DERIVATION_PATH_PREFIX: [u32; 4] = [44, SLIP10_COIN_TYPE, 0, 0];
