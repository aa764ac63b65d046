//! Fuzz test for stored vault records
//!
//! Arbitrary storage contents must parse to a record or fail with an error;
//! a parsed record must survive re-serialization unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vaultkeep_core::EncryptedVault;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(record) = EncryptedVault::from_json(s) {
            // Re-serialization of a parsed record must succeed
            let json = record.to_json().expect("parsed record serializes");
            let reparsed = EncryptedVault::from_json(&json).expect("own output parses");
            assert_eq!(reparsed, record);
        }
    }
});
