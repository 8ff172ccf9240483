//! Error types for catalog synchronization.
//!
//! The taxonomy separates caller-input rejection from store I/O failure:
//!
//! - [`ValidationError`] — the upload was rejected before any I/O began;
//!   no residual state exists.
//! - [`StoreError`] — an I/O call to either store failed. First-step
//!   failures abort cleanly; second-step failures leave a documented
//!   transient inconsistency (logged, not retried, not rolled back).
//!
//! No failure is ever swallowed: every path surfaces an error to the caller.

use thiserror::Error;

use memoria_core::{AssetId, Error as CoreError};

/// Result type alias for synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors surfaced by the catalog synchronizer.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Caller input was rejected before any I/O.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// An I/O call to one of the stores failed.
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),
}

/// Upload validation failures. Detected synchronously, before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No file was selected for upload.
    #[error("no file selected")]
    NoFileSelected,

    /// The file exceeds the upload size budget.
    #[error("file too large: {size} bytes exceeds limit of {limit}")]
    FileTooLarge {
        /// Size of the rejected upload in bytes.
        size: u64,
        /// The configured limit in bytes.
        limit: u64,
    },
}

/// Store I/O failures, tagged with which step of which compound operation failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing the payload to the object store failed. No metadata entry
    /// was created.
    #[error("object write failed for key '{key}'")]
    ObjectWriteFailed {
        /// The asset key whose payload write failed.
        key: String,
        /// The underlying store error.
        #[source]
        source: CoreError,
    },

    /// Deleting the payload from the object store failed. The metadata
    /// entry is preserved.
    #[error("object delete failed for key '{key}'")]
    ObjectDeleteFailed {
        /// The asset key whose payload delete failed.
        key: String,
        /// The underlying store error.
        #[source]
        source: CoreError,
    },

    /// Inserting the catalog record failed after the payload was stored.
    /// The object remains stored but uncatalogued.
    #[error("metadata insert failed for key '{key}'")]
    MetadataWriteFailed {
        /// The asset key whose record insert failed.
        key: String,
        /// The underlying store error.
        #[source]
        source: CoreError,
    },

    /// Deleting the catalog record failed after the payload was deleted.
    /// The entry now points at a missing object.
    #[error("metadata delete failed for id '{id}'")]
    MetadataDeleteFailed {
        /// The catalog ID whose record delete failed.
        id: AssetId,
        /// The underlying store error.
        #[source]
        source: CoreError,
    },
}

impl SyncError {
    /// Returns true if this error was raised before any I/O began.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
