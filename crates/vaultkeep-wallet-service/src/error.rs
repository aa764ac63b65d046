//! Error handling for the wallet service
//!
//! The service reports the core error type; storage and keystore failures
//! are folded into it here.

pub use vaultkeep_core::{Error, ErrorCategory, Result};
use vaultkeep_storage_sqlite::Error as StorageError;

/// Convert a storage-layer error into the core taxonomy
pub fn from_storage(err: StorageError) -> Error {
    match err {
        StorageError::Keystore(msg) => Error::Keystore(msg),
        StorageError::Validation(msg) => Error::Validation(msg),
        other => Error::Storage(other.to_string()),
    }
}

pub(crate) trait StorageResultExt<T> {
    fn or_storage(self) -> Result<T>;
}

impl<T> StorageResultExt<T> for vaultkeep_storage_sqlite::Result<T> {
    fn or_storage(self) -> Result<T> {
        self.map_err(from_storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_map() {
        let err = from_storage(StorageError::Storage("disk full".to_string()));
        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(err.category(), ErrorCategory::Storage);

        let err = from_storage(StorageError::Keystore("locked".to_string()));
        assert!(matches!(err, Error::Keystore(_)));

        let err = from_storage(StorageError::Migration("v2".to_string()));
        assert!(err.to_string().contains("Migration error"));
    }
}
