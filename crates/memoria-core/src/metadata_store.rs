//! Metadata store contract for the catalog index.
//!
//! The metadata store is the durable mapping from asset ID to asset record
//! and the single source of truth for what exists in the catalog. Consumers
//! never read records point-wise; they observe the catalog through a live
//! snapshot subscription that fires whenever the content changes.
//!
//! A store client is scoped to one collection at construction time. The
//! original console threaded collection path strings through every call;
//! scoping at construction keeps the contract path-free and mirrors how the
//! object store is scoped to a bucket.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::id::AssetId;

/// The record stored in the catalog for one asset.
///
/// The key is derived from the uploaded filename verbatim. No sanitization
/// or collision disambiguation is performed; two uploads with the same
/// filename overwrite each other's payload (last writer wins).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Key of the binary payload in the object store, minus the prefix.
    pub asset_key: String,
}

impl AssetRecord {
    /// Creates a record for the given asset key.
    #[must_use]
    pub fn new(asset_key: impl Into<String>) -> Self {
        Self {
            asset_key: asset_key.into(),
        }
    }
}

/// A point-in-time view of the catalog.
///
/// `Pending` means the initial load from the store has not completed yet;
/// `Loaded` carries the insertion-ordered contents, which may be empty.
/// The two states stay distinct so a consumer can render a loading
/// indicator vs. an empty-catalog message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogSnapshot {
    /// The initial load has not completed.
    #[default]
    Pending,
    /// The catalog contents, in insertion order.
    Loaded(IndexMap<AssetId, AssetRecord>),
}

impl CatalogSnapshot {
    /// Returns true if the initial load has not completed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the catalog is loaded and contains zero entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Loaded(records) if records.is_empty())
    }

    /// Returns the number of entries, or 0 while pending.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Pending => 0,
            Self::Loaded(records) => records.len(),
        }
    }

    /// Returns the loaded records, or `None` while pending.
    #[must_use]
    pub const fn records(&self) -> Option<&IndexMap<AssetId, AssetRecord>> {
        match self {
            Self::Pending => None,
            Self::Loaded(records) => Some(records),
        }
    }

    /// Returns true if the loaded catalog contains the given ID.
    #[must_use]
    pub fn contains(&self, id: AssetId) -> bool {
        self.records().is_some_and(|r| r.contains_key(&id))
    }
}

/// Handle for the live catalog subscription.
///
/// Holds the latest `CatalogSnapshot`; awaiting `changed()` resumes whenever
/// the store publishes a new one. Dropping the handle is the teardown — no
/// explicit unsubscribe call exists.
pub type CatalogWatch = watch::Receiver<CatalogSnapshot>;

/// Storage contract for the catalog index.
#[async_trait]
pub trait MetadataStore: Send + Sync + 'static {
    /// Registers for continuous delivery of catalog snapshots.
    ///
    /// Delivery is push-based and unbounded in duration. Transport failures
    /// have no error channel here; they surface only through store-client
    /// logging.
    fn subscribe(&self) -> CatalogWatch;

    /// Inserts a record and returns the ID the store assigned to it.
    async fn insert(&self, record: AssetRecord) -> Result<AssetId>;

    /// Deletes the record with the given ID.
    ///
    /// Succeeds even if the record doesn't exist (idempotent).
    async fn delete(&self, id: AssetId) -> Result<()>;
}

/// In-memory metadata store for testing and local development.
///
/// Starts in the `Pending` state, like a remote client before its first
/// server sync. Every mutation publishes a `Loaded` snapshot; call
/// [`MemoryMetadataStore::mark_loaded`] to simulate an initial sync that
/// found an empty collection.
#[derive(Debug)]
pub struct MemoryMetadataStore {
    collection: String,
    records: RwLock<IndexMap<AssetId, AssetRecord>>,
    tx: watch::Sender<CatalogSnapshot>,
}

impl MemoryMetadataStore {
    /// Creates a store scoped to the given collection.
    #[must_use]
    pub fn new(collection: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(CatalogSnapshot::Pending);
        Self {
            collection: collection.into(),
            records: RwLock::new(IndexMap::new()),
            tx,
        }
    }

    /// Returns the collection this store is scoped to.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Completes the simulated initial sync, publishing the current contents.
    pub fn mark_loaded(&self) {
        if let Err(err) = self.publish() {
            tracing::error!(
                collection = %self.collection,
                error = %err,
                "failed to publish initial catalog snapshot"
            );
        }
    }

    fn publish(&self) -> Result<()> {
        let records = self
            .records
            .read()
            .map_err(|_| Error::Internal {
                message: "lock poisoned".into(),
            })?
            .clone();
        self.tx.send_replace(CatalogSnapshot::Loaded(records));
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    fn subscribe(&self) -> CatalogWatch {
        self.tx.subscribe()
    }

    async fn insert(&self, record: AssetRecord) -> Result<AssetId> {
        let id = AssetId::generate();
        {
            let mut records = self.records.write().map_err(|_| Error::Internal {
                message: "lock poisoned".into(),
            })?;
            records.insert(id, record);
        }
        tracing::debug!(collection = %self.collection, id = %id, "record inserted");
        self.publish()?;
        Ok(id)
    }

    async fn delete(&self, id: AssetId) -> Result<()> {
        let removed = {
            let mut records = self.records.write().map_err(|_| Error::Internal {
                message: "lock poisoned".into(),
            })?;
            records.shift_remove(&id).is_some()
        };
        if removed {
            tracing::debug!(collection = %self.collection, id = %id, "record deleted");
            self.publish()?;
        }
        Ok(())
    }
}
