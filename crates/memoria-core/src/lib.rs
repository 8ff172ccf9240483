//! # memoria-core
//!
//! Core abstractions for the Memoria admin console.
//!
//! This crate provides the foundational types and contracts shared by the
//! catalog synchronization layer and any host embedding it:
//!
//! - **Identifiers**: Strongly-typed asset IDs assigned by the metadata store
//! - **Object Store Contract**: Abstract interface over the binary payload store
//! - **Metadata Store Contract**: Abstract interface over the catalog index,
//!   including the live snapshot subscription
//! - **Error Types**: Shared error definitions and result types
//! - **Observability**: Logging initialization and span helpers
//!
//! ## Crate Boundary
//!
//! `memoria-core` is the only crate allowed to define shared primitives.
//! The synchronization core in `memoria-catalog` depends on the contracts
//! here and never on a concrete backend.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod id;
pub mod metadata_store;
pub mod object_store;
pub mod observability;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use memoria_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::id::AssetId;
    pub use crate::metadata_store::{
        AssetRecord, CatalogSnapshot, CatalogWatch, MemoryMetadataStore, MetadataStore,
    };
    pub use crate::object_store::{MemoryObjectStore, ObjectMeta, ObjectStore};
    pub use crate::observability::{init_logging, LogFormat};
}

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use id::AssetId;
pub use metadata_store::{
    AssetRecord, CatalogSnapshot, CatalogWatch, MemoryMetadataStore, MetadataStore,
};
pub use object_store::{MemoryObjectStore, ObjectMeta, ObjectStore};
pub use observability::{init_logging, LogFormat};
