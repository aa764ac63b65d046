//! Session guard
//!
//! The only component allowed to read or write the vault field. It owns
//! the session flags and checks them before any secret-dependent work.
//!
//! Transitions (`setup_wallet`, `unlock`, `logout`, `sync`,
//! `change_password`, `wipe`) are serialized by an async mutex. Reveal and
//! signing calls do not take it and may run concurrently; signing checks the
//! session again once the key is derived. The unlocked
//! flag is set only after a decrypt succeeded, so a cancelled transition
//! never leaves the guard more privileged than before.
//!
//! Neither the password nor derived keys are cached: every decrypt goes
//! through the KDF again.

use crate::error::{Error, Result, StorageResultExt};
use crate::session::{SessionState, SessionStatus};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use vaultkeep_core::{keys, EncryptedVault, PublicKey, Signature, SigningKeyPair, VaultEncryptor};
use vaultkeep_params::StorageField;
use vaultkeep_storage_sqlite::KeyValueStore;
use zeroize::Zeroizing;

/// Locked / unlocked / uninitialized state machine over the stored vault
pub struct SessionGuard {
    store: Arc<dyn KeyValueStore>,
    encryptor: VaultEncryptor,
    state: RwLock<SessionState>,
    transition: Mutex<()>,
}

impl SessionGuard {
    /// Create a guard in the `Uninitialized` state; call [`sync`](Self::sync)
    /// before anything else.
    pub fn new(store: Arc<dyn KeyValueStore>, encryptor: VaultEncryptor) -> Self {
        Self {
            store,
            encryptor,
            state: RwLock::new(SessionState::UNINITIALIZED),
            transition: Mutex::new(()),
        }
    }

    /// Current flags
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Current status
    pub fn status(&self) -> SessionStatus {
        self.state().status()
    }

    /// Encryptor used for new vaults
    pub fn encryptor(&self) -> &VaultEncryptor {
        &self.encryptor
    }

    /// Re-derive the flags from storage: ready if a vault exists, never
    /// unlocked.
    pub async fn sync(&self) -> Result<()> {
        let _transition = self.transition.lock().await;

        // Drop the unlocked flag first so a failed read cannot keep it
        {
            let mut state = self.state.write();
            *state = state.locked();
        }

        let present = match self.store.get_field(StorageField::Vault).await.or_storage() {
            Ok(value) => value.is_some(),
            Err(e) => {
                error!("Session sync failed to read vault field: {}", e);
                return Err(e);
            }
        };

        let state = SessionState::from_storage(present);
        *self.state.write() = state;
        debug!("Session synced: status={}", state.status());
        Ok(())
    }

    /// Encrypt `secret` under `password`, persist it and unlock.
    ///
    /// Overwrites any existing vault. If encryption or the write fails the
    /// previous vault and session state are left untouched.
    pub async fn setup_wallet(&self, password: &str, secret: &str) -> Result<()> {
        if secret.is_empty() {
            return Err(Error::Validation("secret must not be empty".to_string()));
        }

        let _transition = self.transition.lock().await;

        let record = self.encrypt_vault(password, secret).await?;
        let json = record.to_json()?;

        if let Err(e) = self.store.set_field(StorageField::Vault, &json).await.or_storage() {
            error!("Failed to persist vault: {}", e);
            return Err(e);
        }

        *self.state.write() = SessionState::UNLOCKED;
        info!("Wallet set up (vault {})", record.version);
        Ok(())
    }

    /// Verify `password` against the stored vault and unlock.
    ///
    /// The decrypted secret is discarded immediately.
    pub async fn unlock(&self, password: &str) -> Result<()> {
        let _transition = self.transition.lock().await;

        let record = self.load_vault().await?;
        let secret = self.decrypt_vault(record, password).await?;
        drop(secret);

        *self.state.write() = SessionState::UNLOCKED;
        info!("Wallet unlocked");
        Ok(())
    }

    /// Decrypt and return the stored secret. Does not change state.
    pub async fn get_secret(&self, password: &str) -> Result<Zeroizing<String>> {
        let record = self.load_vault().await?;
        self.decrypt_vault(record, password).await
    }

    /// Clear the unlocked flag
    pub async fn logout(&self) {
        let _transition = self.transition.lock().await;
        let mut state = self.state.write();
        *state = state.locked();
        debug!("Session locked: status={}", state.status());
    }

    /// Sign `message` with the key for `account_index`.
    ///
    /// Requires an unlocked session; the key is derived from the vault for
    /// this call only.
    pub async fn sign(&self, password: &str, account_index: u32, message: &[u8]) -> Result<Signature> {
        self.sign_with_passphrase(password, "", account_index, message).await
    }

    /// [`sign`](Self::sign) with a BIP-39 passphrase applied to mnemonic vaults
    pub async fn sign_with_passphrase(
        &self,
        password: &str,
        passphrase: &str,
        account_index: u32,
        message: &[u8],
    ) -> Result<Signature> {
        let keypair = self.account_keypair(password, passphrase, account_index).await?;
        let signature = keypair.sign(message);
        // A logout during derivation must not yield a signature
        self.ensure_unlocked()?;
        Ok(signature)
    }

    /// Public key for `account_index`; requires an unlocked session
    pub async fn public_key(&self, password: &str, account_index: u32) -> Result<PublicKey> {
        self.public_key_with_passphrase(password, "", account_index).await
    }

    /// [`public_key`](Self::public_key) with a BIP-39 passphrase
    pub async fn public_key_with_passphrase(
        &self,
        password: &str,
        passphrase: &str,
        account_index: u32,
    ) -> Result<PublicKey> {
        let public = self.account_keypair(password, passphrase, account_index).await?.public_key();
        self.ensure_unlocked()?;
        Ok(public)
    }

    /// Re-encrypt the vault under `new_password`.
    ///
    /// The new record uses the configured write version, which upgrades
    /// legacy vaults. The session flags are not touched.
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<()> {
        let _transition = self.transition.lock().await;

        let record = self.load_vault().await?;
        let from_version = record.version;
        let secret = self.decrypt_vault(record, old_password).await?;
        let rotated = self.encrypt_vault(new_password, &secret).await?;
        let json = rotated.to_json()?;

        if let Err(e) = self.store.set_field(StorageField::Vault, &json).await.or_storage() {
            error!("Failed to persist rotated vault: {}", e);
            return Err(e);
        }

        info!("Vault password changed ({} -> {})", from_version, rotated.version);
        Ok(())
    }

    /// Delete the vault; the session becomes `Uninitialized`
    pub async fn wipe(&self) -> Result<()> {
        let _transition = self.transition.lock().await;

        if let Err(e) = self.store.remove_field(StorageField::Vault).await.or_storage() {
            error!("Failed to delete vault: {}", e);
            return Err(e);
        }

        *self.state.write() = SessionState::UNINITIALIZED;
        info!("Vault wiped");
        Ok(())
    }

    fn ensure_unlocked(&self) -> Result<()> {
        match self.status() {
            SessionStatus::Unlocked => Ok(()),
            SessionStatus::Locked => Err(Error::Locked),
            SessionStatus::Uninitialized => Err(Error::VaultNotFound),
        }
    }

    async fn account_keypair(
        &self,
        password: &str,
        passphrase: &str,
        account_index: u32,
    ) -> Result<SigningKeyPair> {
        self.ensure_unlocked()?;
        let secret = self.get_secret(password).await?;
        let passphrase = Zeroizing::new(passphrase.to_string());
        run_blocking(move || keys::derive_keypair_with_passphrase(&secret, &passphrase, account_index)).await
    }

    async fn load_vault(&self) -> Result<EncryptedVault> {
        let json = match self.store.get_field(StorageField::Vault).await.or_storage() {
            Ok(Some(json)) => json,
            Ok(None) => {
                debug!("No vault in storage");
                return Err(Error::VaultNotFound);
            }
            Err(e) => {
                error!("Failed to read vault: {}", e);
                return Err(e);
            }
        };

        EncryptedVault::from_json(&json).map_err(|e| {
            error!("Stored vault is unreadable: {}", e);
            e
        })
    }

    async fn decrypt_vault(&self, record: EncryptedVault, password: &str) -> Result<Zeroizing<String>> {
        let encryptor = self.encryptor.clone();
        let password = Zeroizing::new(password.to_string());
        let result = run_blocking(move || encryptor.decrypt(&record, &password)).await;
        match result {
            Err(Error::Decryption) => {
                warn!("Vault decryption failed: wrong password");
                Err(Error::WrongPassword)
            }
            other => other,
        }
    }

    async fn encrypt_vault(&self, password: &str, secret: &str) -> Result<EncryptedVault> {
        let encryptor = self.encryptor.clone();
        let password = Zeroizing::new(password.to_string());
        let secret = Zeroizing::new(secret.to_string());
        run_blocking(move || encryptor.encrypt(&password, &secret)).await
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("state", &self.state())
            .field("encryptor", &self.encryptor)
            .finish()
    }
}

/// Run KDF-heavy work off the async executor
async fn run_blocking<T, F>(op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| Error::Encryption(format!("crypto task failed: {}", e)))?
}
