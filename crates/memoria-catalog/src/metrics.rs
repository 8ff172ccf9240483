//! Catalog synchronization metrics.
//!
//! Counters for add/remove outcomes, store-step failures, and reconciliation
//! findings. These complement the structured logging already in place.

use metrics::{counter, describe_counter};

/// Add-asset outcome counter.
pub const SYNC_ADD: &str = "memoria_sync_add_total";

/// Remove-asset outcome counter.
pub const SYNC_REMOVE: &str = "memoria_sync_remove_total";

/// Store-step failure counter.
pub const SYNC_STORE_ERRORS: &str = "memoria_sync_store_errors_total";

/// Reconciliation issue counter.
pub const RECONCILE_ISSUES: &str = "memoria_reconcile_issues_total";

/// Registers all metric descriptions.
///
/// Call this once at application startup after installing the metrics
/// recorder.
pub fn register_metrics() {
    describe_counter!(SYNC_ADD, "Total add_asset calls by outcome");
    describe_counter!(SYNC_REMOVE, "Total remove_asset calls by outcome");
    describe_counter!(SYNC_STORE_ERRORS, "Total store-step failures by operation");
    describe_counter!(RECONCILE_ISSUES, "Total reconciliation issues by type");
}

/// Records an `add_asset` outcome (`success`, `rejected`, `store_error`).
pub fn record_add_outcome(outcome: &str) {
    counter!(SYNC_ADD, "outcome" => outcome.to_string()).increment(1);
}

/// Records a `remove_asset` outcome (`success`, `store_error`).
pub fn record_remove_outcome(outcome: &str) {
    counter!(SYNC_REMOVE, "outcome" => outcome.to_string()).increment(1);
}

/// Records a failed store step (`object_put`, `object_delete`,
/// `metadata_insert`, `metadata_delete`).
pub fn record_store_error(operation: &str) {
    counter!(SYNC_STORE_ERRORS, "operation" => operation.to_string()).increment(1);
}

/// Records reconciliation sweep findings.
pub fn record_sweep(orphaned_objects: u64, missing_objects: u64) {
    counter!(RECONCILE_ISSUES, "type" => "orphaned_object").increment(orphaned_objects);
    counter!(RECONCILE_ISSUES, "type" => "missing_object").increment(missing_objects);
}
