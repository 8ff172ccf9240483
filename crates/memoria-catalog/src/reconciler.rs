//! Report-only reconciliation sweep for catalog state.
//!
//! The add/remove compound operations have no rollback, so partial failures
//! leave either an uncatalogued object or a catalog entry whose payload is
//! gone. This sweep detects both by diffing the object store listing against
//! a loaded catalog snapshot. It is explicitly an anti-entropy tool: listing
//! is used for verification only, it never repairs, and it never runs on the
//! mutation path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use memoria_core::{CatalogSnapshot, ObjectStore};

use crate::metrics;
use crate::options::SyncOptions;

/// Errors from a reconciliation sweep.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The catalog snapshot has not loaded yet; there is nothing sound to
    /// diff against.
    #[error("catalog snapshot is still pending; cannot reconcile")]
    CatalogPending,

    /// Listing the object store failed.
    #[error("object listing failed")]
    Storage(#[from] memoria_core::Error),
}

/// Report from a reconciliation sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// When the sweep was performed.
    pub checked_at: DateTime<Utc>,

    /// Objects found under the configured prefix.
    pub object_count: usize,

    /// Records present in the catalog snapshot.
    pub record_count: usize,

    /// Issues found during the sweep.
    pub issues: Vec<CatalogIssue>,
}

impl SweepReport {
    /// Returns true if any issues were found.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Returns issues of a specific type.
    #[must_use]
    pub fn issues_of_type(&self, issue_type: IssueType) -> Vec<&CatalogIssue> {
        self.issues
            .iter()
            .filter(|i| i.issue_type == issue_type)
            .collect()
    }
}

/// A specific consistency issue between the two stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogIssue {
    /// Type of issue.
    pub issue_type: IssueType,

    /// The asset key involved.
    pub asset_key: String,

    /// Human-readable description.
    pub description: String,
}

/// Type of consistency issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// An object is stored but no catalog record references it.
    OrphanedObject,
    /// A catalog record references an object that is missing.
    MissingObject,
}

/// Report-only reconciler diffing the object store against the catalog.
pub struct CatalogReconciler {
    objects: Arc<dyn ObjectStore>,
    options: SyncOptions,
}

impl CatalogReconciler {
    /// Creates a reconciler over the given object store with default options.
    #[must_use]
    pub fn new(objects: Arc<dyn ObjectStore>) -> Self {
        Self::with_options(objects, SyncOptions::default())
    }

    /// Creates a reconciler with explicit options.
    #[must_use]
    pub fn with_options(objects: Arc<dyn ObjectStore>, options: SyncOptions) -> Self {
        Self { objects, options }
    }

    /// Runs one sweep against a loaded catalog snapshot.
    ///
    /// # Errors
    ///
    /// [`ReconcileError::CatalogPending`] if the snapshot has not loaded;
    /// [`ReconcileError::Storage`] if listing the object store fails.
    pub async fn sweep(
        &self,
        snapshot: &CatalogSnapshot,
    ) -> std::result::Result<SweepReport, ReconcileError> {
        let Some(records) = snapshot.records() else {
            return Err(ReconcileError::CatalogPending);
        };

        let prefix = format!("{}/", self.options.object_prefix);
        let listing = self.objects.list(&prefix).await?;

        let stored_keys: HashSet<&str> = listing
            .iter()
            .filter_map(|meta| self.options.asset_key_of(&meta.key))
            .collect();
        let cataloged_keys: HashSet<&str> =
            records.values().map(|r| r.asset_key.as_str()).collect();

        let mut issues = Vec::new();

        for key in &stored_keys {
            if !cataloged_keys.contains(key) {
                issues.push(CatalogIssue {
                    issue_type: IssueType::OrphanedObject,
                    asset_key: (*key).to_string(),
                    description: format!("object '{key}' is stored but not cataloged"),
                });
            }
        }

        for key in &cataloged_keys {
            if !stored_keys.contains(key) {
                issues.push(CatalogIssue {
                    issue_type: IssueType::MissingObject,
                    asset_key: (*key).to_string(),
                    description: format!("catalog references '{key}' but no object is stored"),
                });
            }
        }

        // Deterministic report order for logging and assertions
        issues.sort_by(|a, b| a.asset_key.cmp(&b.asset_key));

        for issue in &issues {
            tracing::warn!(
                issue = ?issue.issue_type,
                asset_key = %issue.asset_key,
                "catalog inconsistency detected"
            );
        }
        metrics::record_sweep(
            issues
                .iter()
                .filter(|i| i.issue_type == IssueType::OrphanedObject)
                .count() as u64,
            issues
                .iter()
                .filter(|i| i.issue_type == IssueType::MissingObject)
                .count() as u64,
        );

        Ok(SweepReport {
            checked_at: Utc::now(),
            object_count: stored_keys.len(),
            record_count: records.len(),
            issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use memoria_core::{AssetRecord, MemoryMetadataStore, MemoryObjectStore, MetadataStore};

    async fn loaded_snapshot(store: &MemoryMetadataStore) -> CatalogSnapshot {
        store.mark_loaded();
        store.subscribe().borrow().clone()
    }

    #[tokio::test]
    async fn clean_state_yields_no_issues() {
        let objects = Arc::new(MemoryObjectStore::new());
        let metadata = MemoryMetadataStore::new("images");

        objects
            .put("memory-images/cat.png", Bytes::from("bytes"))
            .await
            .unwrap();
        metadata.insert(AssetRecord::new("cat.png")).await.unwrap();

        let reconciler = CatalogReconciler::new(objects);
        let report = reconciler
            .sweep(&loaded_snapshot(&metadata).await)
            .await
            .unwrap();

        assert!(!report.has_issues());
        assert_eq!(report.object_count, 1);
        assert_eq!(report.record_count, 1);
    }

    #[tokio::test]
    async fn uncatalogued_object_is_reported_as_orphan() {
        let objects = Arc::new(MemoryObjectStore::new());
        let metadata = MemoryMetadataStore::new("images");

        objects
            .put("memory-images/stray.png", Bytes::from("bytes"))
            .await
            .unwrap();

        let reconciler = CatalogReconciler::new(objects);
        let report = reconciler
            .sweep(&loaded_snapshot(&metadata).await)
            .await
            .unwrap();

        let orphans = report.issues_of_type(IssueType::OrphanedObject);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].asset_key, "stray.png");
    }

    #[tokio::test]
    async fn dangling_record_is_reported_as_missing_object() {
        let objects = Arc::new(MemoryObjectStore::new());
        let metadata = MemoryMetadataStore::new("images");

        metadata
            .insert(AssetRecord::new("gone.png"))
            .await
            .unwrap();

        let reconciler = CatalogReconciler::new(objects);
        let report = reconciler
            .sweep(&loaded_snapshot(&metadata).await)
            .await
            .unwrap();

        let missing = report.issues_of_type(IssueType::MissingObject);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].asset_key, "gone.png");
    }

    #[tokio::test]
    async fn objects_outside_prefix_are_ignored() {
        let objects = Arc::new(MemoryObjectStore::new());
        let metadata = MemoryMetadataStore::new("images");

        objects
            .put("other/unrelated.bin", Bytes::from("bytes"))
            .await
            .unwrap();

        let reconciler = CatalogReconciler::new(objects);
        let report = reconciler
            .sweep(&loaded_snapshot(&metadata).await)
            .await
            .unwrap();

        assert!(!report.has_issues());
        assert_eq!(report.object_count, 0);
    }

    #[tokio::test]
    async fn report_serializes_with_snake_case_issue_types() {
        let objects = Arc::new(MemoryObjectStore::new());
        let metadata = MemoryMetadataStore::new("images");

        objects
            .put("memory-images/stray.png", Bytes::from("bytes"))
            .await
            .unwrap();

        let reconciler = CatalogReconciler::new(objects);
        let report = reconciler
            .sweep(&loaded_snapshot(&metadata).await)
            .await
            .unwrap();

        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.contains("\"orphaned_object\""));

        // Roundtrip
        let parsed: SweepReport = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed.issues.len(), 1);
    }

    #[tokio::test]
    async fn pending_snapshot_is_refused() {
        let objects = Arc::new(MemoryObjectStore::new());
        let reconciler = CatalogReconciler::new(objects);

        let err = reconciler
            .sweep(&CatalogSnapshot::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::CatalogPending));
    }
}
