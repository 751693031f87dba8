//! JWT server provider.
//!
//! Stub: registration yields a session with an empty token. Password reset
//! is not implemented by this backend.

use super::{AuthProvider, Operation};
use crate::config::BackendSelection;
use crate::error::Result;
use crate::state::Session;
use futures::future::BoxFuture;

/// JWT provider.
#[derive(Debug, Clone, Default)]
pub struct JwtProvider {
    _private: (),
}

impl JwtProvider {
    /// Create a new JWT provider.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl AuthProvider for JwtProvider {
    fn backend(&self) -> BackendSelection {
        BackendSelection::Jwt
    }

    fn supports(&self, operation: Operation) -> bool {
        operation == Operation::Register
    }

    fn register_user(&self, _email: &str, _password: &str) -> BoxFuture<'static, Result<Session>> {
        tracing::debug!("JWT register_user (stub)");
        Box::pin(async { Ok(Session::new(String::new(), BackendSelection::Jwt)) })
    }
}
