//! Session state
//!
//! Two flags, never persisted. `ready` mirrors whether a vault exists in
//! storage; `enabled` is set only after a successful decrypt this run.

use serde::Serialize;
use std::fmt;

/// Derived session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No vault in storage
    Uninitialized,
    /// Vault exists, not unlocked this run
    Locked,
    /// Vault decrypted at least once this session
    Unlocked,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Uninitialized => write!(f, "uninitialized"),
            SessionStatus::Locked => write!(f, "locked"),
            SessionStatus::Unlocked => write!(f, "unlocked"),
        }
    }
}

/// `(is_ready, is_enabled)` pair; `is_enabled` implies `is_ready`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionState {
    is_ready: bool,
    is_enabled: bool,
}

impl SessionState {
    /// No vault
    pub const UNINITIALIZED: SessionState = SessionState {
        is_ready: false,
        is_enabled: false,
    };

    /// Vault present, locked
    pub const LOCKED: SessionState = SessionState {
        is_ready: true,
        is_enabled: false,
    };

    /// Vault present and unlocked
    pub const UNLOCKED: SessionState = SessionState {
        is_ready: true,
        is_enabled: true,
    };

    /// State after reading storage: locked if a vault exists
    pub fn from_storage(vault_present: bool) -> Self {
        if vault_present {
            Self::LOCKED
        } else {
            Self::UNINITIALIZED
        }
    }

    /// A vault exists
    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    /// The vault was unlocked this session
    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Same state with `is_enabled` cleared
    pub fn locked(self) -> Self {
        Self {
            is_ready: self.is_ready,
            is_enabled: false,
        }
    }

    /// Status
    pub fn status(&self) -> SessionStatus {
        match (self.is_ready, self.is_enabled) {
            (false, _) => SessionStatus::Uninitialized,
            (true, false) => SessionStatus::Locked,
            (true, true) => SessionStatus::Unlocked,
        }
    }

    /// Tuple form `(is_ready, is_enabled)`
    pub fn as_tuple(&self) -> (bool, bool) {
        (self.is_ready, self.is_enabled)
    }
}
