//! The catalog synchronizer: compound add/remove operations and the live view.
//!
//! Both mutations are a short sequential chain of two store calls with the
//! object store first, so a first-step failure never leaves dangling
//! metadata. The second step has no rollback; its failure is logged and
//! surfaced as the documented transient inconsistency.
//!
//! The synchronizer never caches records. The only way a mutation becomes
//! visible is through the metadata store's snapshot subscription.

use bytes::Bytes;
use std::sync::Arc;
use tracing::Instrument;

use memoria_core::observability::sync_span;
use memoria_core::{AssetId, AssetRecord, CatalogWatch, MetadataStore, ObjectStore};

use crate::error::{Result, StoreError, ValidationError};
use crate::metrics;
use crate::options::SyncOptions;

/// A file selected for upload: original filename plus payload bytes.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Original filename. The asset key is derived from this verbatim.
    pub name: String,
    /// Payload bytes.
    pub bytes: Bytes,
}

impl FileUpload {
    /// Creates an upload from a filename and payload.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Returns the payload size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Orchestrates the object store and metadata store so the catalog index
/// and the stored payloads stay consistent under add and remove.
///
/// One instance serves one operator; no locking or transaction discipline
/// is applied. Concurrent adds with the same derived key race at the object
/// store and the last writer wins.
pub struct CatalogSynchronizer {
    objects: Arc<dyn ObjectStore>,
    metadata: Arc<dyn MetadataStore>,
    options: SyncOptions,
}

impl CatalogSynchronizer {
    /// Creates a synchronizer over the given stores with default options.
    #[must_use]
    pub fn new(objects: Arc<dyn ObjectStore>, metadata: Arc<dyn MetadataStore>) -> Self {
        Self::with_options(objects, metadata, SyncOptions::default())
    }

    /// Creates a synchronizer with explicit options.
    #[must_use]
    pub fn with_options(
        objects: Arc<dyn ObjectStore>,
        metadata: Arc<dyn MetadataStore>,
        options: SyncOptions,
    ) -> Self {
        Self {
            objects,
            metadata,
            options,
        }
    }

    /// Returns the options this synchronizer was built with.
    #[must_use]
    pub const fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Registers for continuous delivery of catalog snapshots.
    ///
    /// The handle stays live until dropped; dropping it is the teardown.
    #[must_use]
    pub fn subscribe_catalog(&self) -> CatalogWatch {
        self.metadata.subscribe()
    }

    /// Adds an asset: stores the payload, then catalogs it.
    ///
    /// Validation runs before any I/O. A payload-write failure aborts with
    /// no metadata entry created. A catalog-insert failure after a
    /// successful write leaves the object stored but uncatalogued; that
    /// inconsistency is logged and surfaced, never retried.
    ///
    /// On success the new entry becomes visible only through the snapshot
    /// subscription; no descriptor is returned here.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NoFileSelected`] if `upload` is `None`,
    /// [`ValidationError::FileTooLarge`] if the payload exceeds the budget,
    /// [`StoreError::ObjectWriteFailed`] / [`StoreError::MetadataWriteFailed`]
    /// for the respective store steps.
    pub async fn add_asset(&self, upload: Option<FileUpload>) -> Result<()> {
        let Some(upload) = upload else {
            metrics::record_add_outcome("rejected");
            return Err(ValidationError::NoFileSelected.into());
        };

        let size = upload.size();
        if size > self.options.max_upload_bytes {
            metrics::record_add_outcome("rejected");
            return Err(ValidationError::FileTooLarge {
                size,
                limit: self.options.max_upload_bytes,
            }
            .into());
        }

        // Asset key is the filename verbatim. Identical filenames overwrite
        // each other's payload; last writer wins.
        let asset_key = upload.name;
        let span = sync_span("add_asset", &asset_key);

        async {
            let path = self.options.object_path(&asset_key);
            let meta = self
                .objects
                .put(&path, upload.bytes)
                .await
                .map_err(|source| {
                    metrics::record_add_outcome("store_error");
                    metrics::record_store_error("object_put");
                    StoreError::ObjectWriteFailed {
                        key: asset_key.clone(),
                        source,
                    }
                })?;
            tracing::debug!(stored_key = %meta.key, size = meta.size, "payload stored");

            let id = self
                .metadata
                .insert(AssetRecord::new(asset_key.clone()))
                .await
                .map_err(|source| {
                    tracing::error!(
                        key = %asset_key,
                        error = %source,
                        "catalog insert failed; object remains stored but uncatalogued"
                    );
                    metrics::record_add_outcome("store_error");
                    metrics::record_store_error("metadata_insert");
                    StoreError::MetadataWriteFailed {
                        key: asset_key.clone(),
                        source,
                    }
                })?;

            tracing::info!(id = %id, "asset cataloged");
            metrics::record_add_outcome("success");
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Removes an asset: deletes the payload, then uncatalogs it.
    ///
    /// Any operator confirmation happens in the calling collaborator; this
    /// operation is confirmation-agnostic. A payload-delete failure aborts
    /// with the metadata entry preserved. A catalog-delete failure after a
    /// successful payload delete leaves the entry pointing at a missing
    /// object; logged and surfaced, never retried.
    ///
    /// Calling this twice with the same pair is safe: both store deletes
    /// are idempotent, so the second call is a no-op.
    ///
    /// # Errors
    ///
    /// [`StoreError::ObjectDeleteFailed`] / [`StoreError::MetadataDeleteFailed`]
    /// for the respective store steps.
    pub async fn remove_asset(&self, id: AssetId, asset_key: &str) -> Result<()> {
        let span = sync_span("remove_asset", asset_key);

        async {
            let path = self.options.object_path(asset_key);
            self.objects.delete(&path).await.map_err(|source| {
                metrics::record_remove_outcome("store_error");
                metrics::record_store_error("object_delete");
                StoreError::ObjectDeleteFailed {
                    key: asset_key.to_string(),
                    source,
                }
            })?;
            tracing::debug!(key = %path, "payload deleted");

            self.metadata.delete(id).await.map_err(|source| {
                tracing::error!(
                    id = %id,
                    error = %source,
                    "catalog delete failed; entry now references a deleted object"
                );
                metrics::record_remove_outcome("store_error");
                metrics::record_store_error("metadata_delete");
                StoreError::MetadataDeleteFailed { id, source }
            })?;

            tracing::info!(id = %id, "asset removed from catalog");
            metrics::record_remove_outcome("success");
            Ok(())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use memoria_core::{MemoryMetadataStore, MemoryObjectStore};

    fn synchronizer() -> (
        Arc<MemoryObjectStore>,
        Arc<MemoryMetadataStore>,
        CatalogSynchronizer,
    ) {
        let objects = Arc::new(MemoryObjectStore::new());
        let metadata = Arc::new(MemoryMetadataStore::new("images"));
        let sync = CatalogSynchronizer::new(objects.clone(), metadata.clone());
        (objects, metadata, sync)
    }

    #[tokio::test]
    async fn add_without_file_is_rejected_before_io() {
        let (objects, _metadata, sync) = synchronizer();
        let rx = sync.subscribe_catalog();

        let err = sync.add_asset(None).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Validation(ValidationError::NoFileSelected)
        ));

        assert!(objects.list("").await.unwrap().is_empty());
        assert!(rx.borrow().is_pending(), "no snapshot was published");
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_before_io() {
        let (objects, _metadata, sync) = synchronizer();
        let rx = sync.subscribe_catalog();

        let payload = vec![0u8; 1_048_577];
        let err = sync
            .add_asset(Some(FileUpload::new("huge.png", payload)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Validation(ValidationError::FileTooLarge {
                size: 1_048_577,
                limit: 1_048_576,
            })
        ));

        assert!(objects.list("").await.unwrap().is_empty());
        assert!(rx.borrow().is_pending());
    }

    #[tokio::test]
    async fn upload_at_exact_limit_is_accepted() {
        let (_objects, _metadata, sync) = synchronizer();

        let payload = vec![0u8; 1_048_576];
        sync.add_asset(Some(FileUpload::new("exact.png", payload)))
            .await
            .expect("limit is inclusive");
    }

    #[tokio::test]
    async fn add_stores_payload_and_catalogs_it() {
        let (objects, _metadata, sync) = synchronizer();
        let rx = sync.subscribe_catalog();

        sync.add_asset(Some(FileUpload::new("cat.png", "bytes")))
            .await
            .expect("add should succeed");

        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.len(), 1);
        let record = snapshot.records().unwrap().values().next().unwrap();
        assert_eq!(record.asset_key, "cat.png");

        let stored = objects.get("memory-images/cat.png").await.unwrap();
        assert_eq!(stored, Bytes::from("bytes"));
    }

    #[tokio::test]
    async fn remove_deletes_payload_and_uncatalogs() {
        let (objects, _metadata, sync) = synchronizer();
        let rx = sync.subscribe_catalog();

        sync.add_asset(Some(FileUpload::new("cat.png", "bytes")))
            .await
            .unwrap();
        let id = *rx.borrow().records().unwrap().keys().next().unwrap();

        sync.remove_asset(id, "cat.png")
            .await
            .expect("remove should succeed");

        assert!(!rx.borrow().contains(id));
        let err = objects.get("memory-images/cat.png").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn remove_twice_is_a_noop() {
        let (_objects, _metadata, sync) = synchronizer();
        let rx = sync.subscribe_catalog();

        sync.add_asset(Some(FileUpload::new("cat.png", "bytes")))
            .await
            .unwrap();
        let id = *rx.borrow().records().unwrap().keys().next().unwrap();

        sync.remove_asset(id, "cat.png").await.unwrap();
        sync.remove_asset(id, "cat.png")
            .await
            .expect("second remove is idempotent");

        assert!(rx.borrow().is_empty());
    }

    #[tokio::test]
    async fn duplicate_filenames_overwrite_payload() {
        let (objects, _metadata, sync) = synchronizer();

        sync.add_asset(Some(FileUpload::new("cat.png", "first")))
            .await
            .unwrap();
        sync.add_asset(Some(FileUpload::new("cat.png", "second")))
            .await
            .unwrap();

        // Last writer wins at the object store; the catalog gains two
        // entries with the same key, the accepted collision behavior.
        let stored = objects.get("memory-images/cat.png").await.unwrap();
        assert_eq!(stored, Bytes::from("second"));
    }
}
