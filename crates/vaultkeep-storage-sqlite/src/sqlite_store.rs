//! SQLite-backed [`KeyValueStore`]

use crate::database::Database;
use crate::store::KeyValueStore;
use crate::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// Key-value store persisted in a single SQLite file.
///
/// Each call runs on the blocking pool; the connection is shared behind a
/// mutex so writes are serialized.
#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Mutex<Database>>,
}

impl SqliteStore {
    /// Open (or create) the store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = Database::open(path)?;
        Ok(Self::from_database(db))
    }

    /// Non-persistent store, mainly for tests
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    /// Wrap an already opened database
    pub fn from_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    async fn with_db<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let guard = db.lock();
            op(&guard)
        })
        .await
        .map_err(|e| Error::Storage(format!("storage task failed: {}", e)))?
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.with_db(move |db| db.get_field(&key)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(Error::Validation("empty storage key".to_string()));
        }
        let key = key.to_string();
        let value = value.to_string();
        self.with_db(move |db| db.set_field(&key, &value)).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.with_db(move |db| db.remove_field(&key).map(|_| ())).await
    }
}
