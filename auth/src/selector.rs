//! Backend adapter selection.
//!
//! The selector is the only place that decides which provider runs an
//! operation. Resolution is pure: it checks the capability table and hands
//! back a bound future, or refuses synchronously with
//! [`AuthError::UnsupportedOperation`]. Nothing runs until the future is
//! polled.

use crate::config::{AuthConfig, BackendSelection};
use crate::error::{AuthError, Result};
use crate::providers::{self, AuthProvider, Operation};
use crate::state::{Credentials, Session};
use futures::future::BoxFuture;
use std::sync::Arc;

/// Resolves operations against the configured backend.
#[derive(Debug, Clone)]
pub struct BackendSelector {
    selection: BackendSelection,
    provider: Arc<dyn AuthProvider>,
}

impl BackendSelector {
    /// Selector for a backend, using the shipped provider.
    #[must_use]
    pub fn new(selection: BackendSelection) -> Self {
        Self {
            selection,
            provider: providers::for_selection(selection),
        }
    }

    /// Selector for the configured backend.
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.backend)
    }

    /// Selector backed by a custom provider.
    ///
    /// The selection is taken from [`AuthProvider::backend`].
    #[must_use]
    pub fn with_provider(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            selection: provider.backend(),
            provider,
        }
    }

    /// The backend this selector dispatches to.
    #[must_use]
    pub const fn selection(&self) -> BackendSelection {
        self.selection
    }

    /// Resolve the provider for `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnsupportedOperation`] if the selected backend
    /// does not implement `operation`.
    pub fn resolve(&self, operation: Operation) -> Result<&Arc<dyn AuthProvider>> {
        if self.provider.supports(operation) {
            tracing::debug!(backend = %self.selection, %operation, "Resolved auth provider");
            Ok(&self.provider)
        } else {
            tracing::warn!(backend = %self.selection, %operation, "Operation not supported by backend");
            Err(AuthError::UnsupportedOperation {
                backend: self.selection,
                operation,
            })
        }
    }

    /// Bind a registration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnsupportedOperation`] if the backend cannot register users.
    pub fn register_user(&self, credentials: &Credentials) -> Result<BoxFuture<'static, Result<Session>>> {
        let provider = self.resolve(Operation::Register)?;
        Ok(provider.register_user(&credentials.email, &credentials.password))
    }

    /// Bind a password reset request.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnsupportedOperation`] if the backend cannot reset passwords.
    pub fn forget_password(&self, email: &str) -> Result<BoxFuture<'static, Result<()>>> {
        let provider = self.resolve(Operation::RequestPasswordReset)?;
        Ok(provider.forget_password(email))
    }
}

impl Default for BackendSelector {
    fn default() -> Self {
        Self::new(BackendSelection::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_operations_fail_at_bind_time() {
        let cases = [
            (BackendSelection::Mock, Operation::Register),
            (BackendSelection::Mock, Operation::RequestPasswordReset),
            (BackendSelection::Jwt, Operation::RequestPasswordReset),
        ];

        for (backend, operation) in cases {
            let selector = BackendSelector::new(backend);
            let error = selector.resolve(operation).unwrap_err();
            assert_eq!(error, AuthError::UnsupportedOperation { backend, operation });
        }
    }

    #[test]
    fn supported_operations_resolve() {
        let firebase = BackendSelector::new(BackendSelection::Firebase);
        assert!(firebase.resolve(Operation::Register).is_ok());
        assert!(firebase.resolve(Operation::RequestPasswordReset).is_ok());
        assert!(BackendSelector::new(BackendSelection::Jwt)
            .resolve(Operation::Register)
            .is_ok());
    }

    #[tokio::test]
    async fn bound_registration_carries_backend() {
        let selector = BackendSelector::from_config(&AuthConfig::new(BackendSelection::Jwt));
        let session = selector
            .register_user(&Credentials::new("a@b.com", "pw"))
            .unwrap()
            .await
            .unwrap();
        assert_eq!(session.backend, BackendSelection::Jwt);
    }

    #[test]
    fn custom_provider_sets_selection() {
        let selector =
            BackendSelector::with_provider(providers::for_selection(BackendSelection::Firebase));
        assert_eq!(selector.selection(), BackendSelection::Firebase);
    }
}
