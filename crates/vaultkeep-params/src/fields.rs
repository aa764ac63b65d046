//! Well-known storage field keys

/// Fields persisted through the storage adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageField {
    /// JSON-encoded encrypted vault record
    Vault,
    /// Lowercase display currency code
    Currency,
    /// Marker that keystore (biometric) unlock is enabled
    AccessControl,
}

impl StorageField {
    /// All known fields
    pub const ALL: [StorageField; 3] = [
        StorageField::Vault,
        StorageField::Currency,
        StorageField::AccessControl,
    ];

    /// Key under which the field is stored
    pub const fn key(self) -> &'static str {
        match self {
            StorageField::Vault => "vault",
            StorageField::Currency => "currency",
            StorageField::AccessControl => "access-control",
        }
    }
}

impl std::fmt::Display for StorageField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
