//! Object store contract for binary asset payloads.
//!
//! This module defines the storage contract the synchronizer writes image
//! bytes through. Backends are cloud object stores with public-read buckets
//! (GCS, S3) or the in-memory backend used in tests.
//!
//! Keys are namespaced under a fixed logical prefix (e.g. `memory-images/`)
//! by convention. The contract does not enforce the prefix; callers own it.
//!
//! Deletes are idempotent: deleting an absent key succeeds. The synchronizer
//! relies on this so that repeating a remove after a partial failure is a
//! no-op rather than a new error.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Error, Result};

/// Metadata about a stored object.
#[derive(Debug, Clone)]
pub struct ObjectMeta {
    /// Object key (full path including any prefix).
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Last modification timestamp.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Storage contract for binary asset payloads.
///
/// All object store backends (cloud buckets, memory) implement this trait.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Reads an entire object.
    ///
    /// Returns `Error::NotFound` if the object doesn't exist.
    async fn get(&self, key: &str) -> Result<Bytes>;

    /// Writes an object, overwriting any existing payload under the same key.
    ///
    /// Last writer wins; there is no precondition support. Returns the
    /// metadata of the stored object, including the key it was stored under.
    async fn put(&self, key: &str, data: Bytes) -> Result<ObjectMeta>;

    /// Deletes an object.
    ///
    /// Succeeds even if the object doesn't exist (idempotent).
    async fn delete(&self, key: &str) -> Result<()>;

    /// Lists objects with the given prefix.
    ///
    /// Returns an empty vec if no objects match. Ordering is arbitrary;
    /// callers requiring deterministic order should sort the results.
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>>;

    /// Returns the publicly addressable URL for a key.
    ///
    /// The URL follows the backend's fixed public-read template. No signing
    /// is performed; access control is whatever the bucket's default policy
    /// grants.
    fn public_url(&self, key: &str) -> String;
}

/// In-memory object store for testing and local development.
///
/// Thread-safe via `RwLock`. Not suitable for production.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    last_modified: DateTime<Utc>,
}

impl MemoryObjectStore {
    /// Creates a new empty memory object store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, key: &str) -> Result<Bytes> {
        let objects = self.objects.read().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })?;

        objects
            .get(key)
            .map(|o| o.data.clone())
            .ok_or_else(|| Error::NotFound(format!("object not found: {key}")))
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<ObjectMeta> {
        let mut objects = self.objects.write().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })?;

        let size = data.len() as u64;
        let last_modified = Utc::now();
        objects.insert(
            key.to_string(),
            StoredObject {
                data,
                last_modified,
            },
        );
        drop(objects);

        Ok(ObjectMeta {
            key: key.to_string(),
            size,
            last_modified: Some(last_modified),
        })
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects
            .write()
            .map_err(|_| Error::Internal {
                message: "lock poisoned".into(),
            })?
            .remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>> {
        let objects = self.objects.read().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })?;

        Ok(objects
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(key, obj)| ObjectMeta {
                key: key.clone(),
                size: obj.data.len() as u64,
                last_modified: Some(obj.last_modified),
            })
            .collect())
    }

    fn public_url(&self, key: &str) -> String {
        // Mock template mirroring a public-read bucket endpoint
        format!("memory://localhost/{key}?alt=media")
    }
}
