//! Observability infrastructure for Memoria.
//!
//! Structured logging with consistent spans. This module provides
//! initialization helpers and span constructors used across the
//! synchronization core.

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON structured logs (for production).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

/// Initializes the logging subsystem.
///
/// Call once at application startup. Safe to call multiple times;
/// subsequent calls are no-ops.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log levels (e.g., `info`, `memoria_catalog=debug`)
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}

/// Creates a span for catalog synchronization operations.
///
/// # Example
///
/// ```rust
/// use memoria_core::observability::sync_span;
///
/// let span = sync_span("add_asset", "cat.png");
/// let _guard = span.enter();
/// ```
#[must_use]
pub fn sync_span(operation: &str, asset_key: &str) -> Span {
    tracing::info_span!(
        "catalog_sync",
        op = operation,
        asset_key = asset_key,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        // Should not panic (uses Once internally)
        init_logging(LogFormat::Pretty);
        init_logging(LogFormat::Pretty);
    }

    #[test]
    fn span_helper_creates_span() {
        let span = sync_span("add_asset", "cat.png");
        let _guard = span.enter();
        tracing::info!("test message in span");
    }
}
