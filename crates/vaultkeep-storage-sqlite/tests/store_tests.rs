//! Key-value store integration tests

use std::sync::Arc;
use tempfile::TempDir;
use vaultkeep_params::StorageField;
use vaultkeep_storage_sqlite::{Error, KeyValueStore, SqliteStore};

#[tokio::test]
async fn test_sqlite_store_roundtrip() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert_eq!(store.get("vault").await.unwrap(), None);

    let record = r#"{"version":2,"iv":"00112233445566778899aabbccddeeff","cipher":"AQID"}"#;
    store.set_field(StorageField::Vault, record).await.unwrap();
    assert_eq!(
        store.get_field(StorageField::Vault).await.unwrap().as_deref(),
        Some(record)
    );

    store.remove_field(StorageField::Vault).await.unwrap();
    assert_eq!(store.get_field(StorageField::Vault).await.unwrap(), None);
}

#[tokio::test]
async fn test_sqlite_store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vaultkeep.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.set("currency", "gbp").await.unwrap();
        store.set("access-control", "1").await.unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.get("currency").await.unwrap().as_deref(), Some("gbp"));
    assert_eq!(store.get("access-control").await.unwrap().as_deref(), Some("1"));
}

#[tokio::test]
async fn test_sqlite_store_opaque_values() {
    let store = SqliteStore::open_in_memory().unwrap();
    let value = "line1\nline2 'quoted' \"double\" ünïcödé";
    store.set("blob", value).await.unwrap();
    assert_eq!(store.get("blob").await.unwrap().as_deref(), Some(value));
}

#[tokio::test]
async fn test_sqlite_store_empty_key_rejected() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(matches!(store.set("", "x").await, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_sqlite_store_concurrent_writers() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.set(&format!("key-{}", i), &i.to_string()).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    for i in 0..8 {
        assert_eq!(
            store.get(&format!("key-{}", i)).await.unwrap(),
            Some(i.to_string())
        );
    }
}
