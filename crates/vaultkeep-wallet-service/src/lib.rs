//! Vaultkeep wallet service
//!
//! Session state machine over the encrypted vault, keystore (biometric)
//! unlock, display currency settings and the facade tying them together.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod currency;
pub mod error;
pub mod guard;
pub mod keychain;
pub mod service;
pub mod session;

pub use config::ServiceConfig;
pub use currency::CurrencySettings;
pub use error::{Error, ErrorCategory, Result};
pub use guard::SessionGuard;
pub use keychain::KeychainUnlock;
pub use service::WalletService;
pub use session::{SessionState, SessionStatus};
