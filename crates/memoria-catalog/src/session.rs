//! Operator session gate.
//!
//! The admin view is gated on "is an operator signed in." The gate carries
//! explicit session state threaded through call sites rather than ambient
//! global state; the presentation collaborator consults it before rendering
//! and redirects away when no operator is present. The synchronizer itself
//! never checks the gate.

use async_trait::async_trait;
use std::sync::RwLock;

use memoria_core::{Error, Result};

/// The authenticated operator identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    /// Opaque subject identifier from the auth backend.
    pub id: String,
    /// Display label (typically an email address).
    pub label: String,
}

impl Operator {
    /// Creates an operator identity.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Gate supplying and clearing the authenticated-operator identity.
#[async_trait]
pub trait SessionGate: Send + Sync + 'static {
    /// Returns the signed-in operator, or `None` if nobody is signed in.
    fn current_operator(&self) -> Option<Operator>;

    /// Signs the current operator out, clearing the session.
    async fn sign_out(&self) -> Result<()>;
}

/// In-memory session gate for testing and local development.
#[derive(Debug, Default)]
pub struct MemorySessionGate {
    operator: RwLock<Option<Operator>>,
}

impl MemorySessionGate {
    /// Creates a gate with nobody signed in.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Creates a gate with the given operator signed in.
    #[must_use]
    pub fn signed_in(operator: Operator) -> Self {
        Self {
            operator: RwLock::new(Some(operator)),
        }
    }
}

#[async_trait]
impl SessionGate for MemorySessionGate {
    fn current_operator(&self) -> Option<Operator> {
        self.operator.read().ok().and_then(|guard| guard.clone())
    }

    async fn sign_out(&self) -> Result<()> {
        let mut guard = self.operator.write().map_err(|_| Error::Internal {
            message: "lock poisoned".into(),
        })?;
        if let Some(operator) = guard.take() {
            tracing::info!(operator = %operator.label, "operator signed out");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_gate_has_no_operator() {
        let gate = MemorySessionGate::signed_out();
        assert!(gate.current_operator().is_none());
    }

    #[tokio::test]
    async fn sign_out_clears_the_session() {
        let gate = MemorySessionGate::signed_in(Operator::new("op_1", "admin@example.com"));
        assert!(gate.current_operator().is_some());

        gate.sign_out().await.expect("sign out should succeed");
        assert!(gate.current_operator().is_none());
    }

    #[tokio::test]
    async fn sign_out_when_signed_out_is_a_noop() {
        let gate = MemorySessionGate::signed_out();
        gate.sign_out().await.expect("sign out should succeed");
        assert!(gate.current_operator().is_none());
    }
}
