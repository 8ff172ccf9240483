//! # memoria-catalog
//!
//! Asset catalog synchronization core for the Memoria admin console.
//!
//! This crate keeps two stores consistent under single-operator add and
//! delete operations:
//!
//! - the **object store**, holding image payloads under filename-derived keys
//! - the **metadata store**, holding the catalog index of which images exist
//!
//! A live snapshot subscription pushes the catalog contents to the consuming
//! view whenever the metadata store changes, independent of who mutated it.
//!
//! ## Consistency Model
//!
//! Add and remove are each two sequential store calls with the payload store
//! first. A failure in the first call aborts cleanly; a failure in the second
//! is logged and surfaced but never retried or rolled back. The accepted
//! failure modes are an uncatalogued object (add) or a catalog entry whose
//! payload is gone (remove). The [`reconciler`] module provides an optional
//! report-only sweep that detects both.
//!
//! ## Example
//!
//! ```rust,ignore
//! use memoria_catalog::prelude::*;
//! use memoria_core::prelude::*;
//!
//! let sync = CatalogSynchronizer::new(objects, metadata);
//! let mut catalog = sync.subscribe_catalog();
//!
//! sync.add_asset(Some(FileUpload::new("cat.png", bytes))).await?;
//! assert_eq!(catalog.borrow().len(), 1);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod metrics;
pub mod options;
pub mod reconciler;
pub mod session;
pub mod sync;

// Re-export main types at crate root
pub use error::{Result, StoreError, SyncError, ValidationError};
pub use options::SyncOptions;
pub use reconciler::{CatalogIssue, CatalogReconciler, IssueType, ReconcileError, SweepReport};
pub use session::{MemorySessionGate, Operator, SessionGate};
pub use sync::{CatalogSynchronizer, FileUpload};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, StoreError, SyncError, ValidationError};
    pub use crate::options::SyncOptions;
    pub use crate::reconciler::{CatalogReconciler, SweepReport};
    pub use crate::session::{MemorySessionGate, Operator, SessionGate};
    pub use crate::sync::{CatalogSynchronizer, FileUpload};
}
