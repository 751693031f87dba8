//! Authentication backend providers.
//!
//! This module defines the [`AuthProvider`] trait every backend implements,
//! plus the providers shipped with the crate.
//!
//! # Architecture
//!
//! Providers are **interfaces**, not call sites. Reducers never talk to a
//! provider directly: they go through the
//! [`BackendSelector`](crate::selector::BackendSelector), which checks the
//! capability table first.
//!
//! ```text
//! ┌──────────────┐   resolve(op)   ┌──────────────────┐
//! │ Reducer      │ ──────────────► │ BackendSelector  │
//! │ (intent)     │                 │ - capability     │
//! └──────────────┘                 │   check          │
//!                                  └────────┬─────────┘
//!                                           │ Arc<dyn AuthProvider>
//!                       ┌───────────────────┼───────────────────┐
//!                       ▼                   ▼                   ▼
//!               FirebaseProvider       JwtProvider         FakeProvider
//! ```
//!
//! | backend | register | password reset |
//! |---------|----------|----------------|
//! | Firebase | yes | yes |
//! | Jwt | yes | no |
//! | Mock | no | no |

use crate::config::BackendSelection;
use crate::error::{AuthError, Result};
use crate::state::Session;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub mod fake;
pub mod firebase;
pub mod jwt;

pub use fake::FakeProvider;
pub use firebase::FirebaseProvider;
pub use jwt::JwtProvider;

/// Operations a backend may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Create an account.
    Register,
    /// Send a password reset email.
    RequestPasswordReset,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 2] = [Self::Register, Self::RequestPasswordReset];

    /// Stable identifier, used as the lifecycle tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::RequestPasswordReset => "request_password_reset",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Register => "register",
            Self::RequestPasswordReset => "password reset",
        })
    }
}

/// Authentication backend.
///
/// Methods return `'static` boxed futures so they can run inside effects,
/// detached from the provider borrow. The default implementations reject
/// with [`AuthError::UnsupportedOperation`]; a provider overrides the ones it
/// [`supports`](Self::supports).
pub trait AuthProvider: Send + Sync + fmt::Debug {
    /// Backend identity, stamped on issued sessions.
    fn backend(&self) -> BackendSelection;

    /// Whether this provider implements `operation`.
    fn supports(&self, operation: Operation) -> bool;

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Resolves to [`AuthError::ProviderFailure`] when the backend rejects the
    /// registration, or [`AuthError::UnsupportedOperation`] when not implemented.
    fn register_user(&self, email: &str, password: &str) -> BoxFuture<'static, Result<Session>> {
        let _ = (email, password);
        unsupported(self.backend(), Operation::Register)
    }

    /// Request a password reset email.
    ///
    /// # Errors
    ///
    /// Resolves to [`AuthError::ProviderFailure`] when the backend rejects the
    /// request, or [`AuthError::UnsupportedOperation`] when not implemented.
    fn forget_password(&self, email: &str) -> BoxFuture<'static, Result<()>> {
        let _ = email;
        unsupported(self.backend(), Operation::RequestPasswordReset)
    }
}

/// Build the default provider for a backend selection.
#[must_use]
pub fn for_selection(selection: BackendSelection) -> Arc<dyn AuthProvider> {
    match selection {
        BackendSelection::Firebase => Arc::new(FirebaseProvider::new()),
        BackendSelection::Jwt => Arc::new(JwtProvider::new()),
        BackendSelection::Mock => Arc::new(FakeProvider::new()),
    }
}

fn unsupported<T: Send + 'static>(
    backend: BackendSelection,
    operation: Operation,
) -> BoxFuture<'static, Result<T>> {
    Box::pin(futures::future::ready(Err(AuthError::UnsupportedOperation {
        backend,
        operation,
    })))
}
