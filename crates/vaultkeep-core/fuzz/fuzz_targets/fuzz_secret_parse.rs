//! Fuzz test for secret classification
//!
//! Ensures mnemonic / raw key parsing handles arbitrary input gracefully

#![no_main]

use libfuzzer_sys::fuzz_target;
use vaultkeep_core::keys;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let kind = keys::classify_secret(s);
        let material = keys::key_material(s, 0);
        // Classification and derivation agree on what is a valid secret
        assert_eq!(kind.is_ok(), material.is_ok());
    }
});
