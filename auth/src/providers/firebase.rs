//! Firebase Authentication provider.
//!
//! Stub: no network calls are made. Registration yields a session with an
//! empty token and password reset resolves with unit.

use super::{AuthProvider, Operation};
use crate::config::BackendSelection;
use crate::error::Result;
use crate::state::Session;
use futures::future::BoxFuture;

/// Firebase provider.
#[derive(Debug, Clone, Default)]
pub struct FirebaseProvider {
    _private: (),
}

impl FirebaseProvider {
    /// Create a new Firebase provider.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl AuthProvider for FirebaseProvider {
    fn backend(&self) -> BackendSelection {
        BackendSelection::Firebase
    }

    fn supports(&self, operation: Operation) -> bool {
        matches!(operation, Operation::Register | Operation::RequestPasswordReset)
    }

    fn register_user(&self, _email: &str, _password: &str) -> BoxFuture<'static, Result<Session>> {
        tracing::debug!("Firebase register_user (stub)");
        Box::pin(async { Ok(Session::new(String::new(), BackendSelection::Firebase)) })
    }

    fn forget_password(&self, _email: &str) -> BoxFuture<'static, Result<()>> {
        tracing::debug!("Firebase forget_password (stub)");
        Box::pin(async { Ok(()) })
    }
}
