//! Options for catalog synchronization.
//!
//! The synchronizer carries one options struct: the upload size budget and
//! the object-store key prefix. Prefix namespacing is convention, not
//! enforcement; nothing stops another writer from using a different prefix.

/// Default upload size budget: 1 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1_048_576;

/// Default object-store key prefix for image payloads.
pub const DEFAULT_OBJECT_PREFIX: &str = "memory-images";

/// Options for all synchronizer operations.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: u64,
    /// Logical prefix under which payloads are keyed.
    pub object_prefix: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            object_prefix: DEFAULT_OBJECT_PREFIX.to_string(),
        }
    }
}

impl SyncOptions {
    /// Sets the upload size budget.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, limit: u64) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    /// Sets the object-store key prefix.
    #[must_use]
    pub fn with_object_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.object_prefix = prefix.into();
        self
    }

    /// Returns the full object-store key for an asset key.
    #[must_use]
    pub fn object_path(&self, asset_key: &str) -> String {
        format!("{}/{asset_key}", self.object_prefix)
    }

    /// Extracts the asset key from a full object-store path, if the path
    /// lives under this prefix.
    #[must_use]
    pub fn asset_key_of<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(&self.object_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_upload_policy() {
        let options = SyncOptions::default();
        assert_eq!(options.max_upload_bytes, 1_048_576);
        assert_eq!(options.object_prefix, "memory-images");
    }

    #[test]
    fn object_path_prepends_prefix() {
        let options = SyncOptions::default();
        assert_eq!(options.object_path("cat.png"), "memory-images/cat.png");
    }

    #[test]
    fn asset_key_of_strips_prefix() {
        let options = SyncOptions::default();
        assert_eq!(
            options.asset_key_of("memory-images/cat.png"),
            Some("cat.png")
        );
        assert_eq!(options.asset_key_of("other/cat.png"), None);
        assert_eq!(options.asset_key_of("memory-images"), None);
    }

    #[test]
    fn builder_overrides() {
        let options = SyncOptions::default()
            .with_max_upload_bytes(2048)
            .with_object_prefix("thumbnails");
        assert_eq!(options.max_upload_bytes, 2048);
        assert_eq!(options.object_path("a.png"), "thumbnails/a.png");
    }
}
