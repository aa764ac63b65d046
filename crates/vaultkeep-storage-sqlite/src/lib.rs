//! SQLite storage for Vaultkeep
//!
//! Provides the string key-value adapter the session guard persists the
//! encrypted vault and small settings through, an SQLite implementation
//! with WAL mode and migrations, and the platform keystore interface used
//! for biometric unlock.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod database;
pub mod error;
pub mod keystore;
pub mod migrations;
pub mod sqlite_store;
pub mod store;

pub use database::Database;
pub use error::{Error, Result};
pub use keystore::{
    BiometricType, KeystoreCapabilities, KeystoreResult, MockKeystore, MockOutcome, Platform,
    PlatformKeystore,
};
pub use sqlite_store::SqliteStore;
pub use store::{KeyValueStore, MemoryStore};
