//! UI-facing dispatch surface.
//!
//! [`AuthClient`] wraps the auth [`Store`] so UI code dispatches intents
//! without building actions by hand. Every invocation is fire-and-forget:
//! the outcome shows up in [`AuthClient::state`] and on
//! [`AuthClient::subscribe`]. The returned [`EffectHandle`] may be ignored or
//! awaited.

use crate::actions::AuthAction;
use crate::config::AuthConfig;
use crate::environment::AuthEnvironment;
use crate::reducers::AuthReducer;
use crate::state::{AuthState, Credentials};
use dashboard_sync_runtime::{EffectHandle, Store, StoreError};
use tokio::sync::broadcast;

/// Store running the auth reducer.
pub type AuthStore = Store<AuthState, AuthAction, AuthEnvironment, AuthReducer>;

/// Dispatch surface for auth operations.
#[derive(Clone)]
pub struct AuthClient {
    store: AuthStore,
}

impl AuthClient {
    /// Create a client with a fresh store.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn new(environment: AuthEnvironment) -> Self {
        Self::with_store(Store::new(
            AuthState::default(),
            AuthReducer::new(),
            environment,
        ))
    }

    /// Create a client for the configured backend.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(AuthEnvironment::from_config(config))
    }

    /// Wrap an existing store.
    #[must_use]
    pub const fn with_store(store: AuthStore) -> Self {
        Self { store }
    }

    /// Register a user.
    ///
    /// Resets the registration outcome, then runs the registration
    /// lifecycle against the selected backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only if the store cannot accept actions.
    /// Backend failures become state, never an `Err` here.
    pub async fn invoke_register(&self, credentials: Credentials) -> Result<EffectHandle, StoreError> {
        self.store.send(AuthAction::Register(credentials)).await
    }

    /// Request a password reset email.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only if the store cannot accept actions.
    pub async fn invoke_forget_password(
        &self,
        email: impl Into<String>,
    ) -> Result<EffectHandle, StoreError> {
        self.store
            .send(AuthAction::ForgetPassword {
                email: email.into(),
            })
            .await
    }

    /// Clear the registration outcome.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only if the store cannot accept actions.
    pub async fn reset_registration_flag(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(AuthAction::ResetRegistration).await
    }

    /// Clear the password reset outcome.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only if the store cannot accept actions.
    pub async fn reset_forget_password(&self) -> Result<EffectHandle, StoreError> {
        self.store.send(AuthAction::ResetForgetPassword).await
    }

    /// Snapshot of the current auth state.
    pub async fn state(&self) -> AuthState {
        self.store.state(AuthState::clone).await
    }

    /// Lifecycle transitions as they are fed back into the reducer.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthAction> {
        self.store.subscribe_actions()
    }

    /// Underlying store.
    #[must_use]
    pub const fn store(&self) -> &AuthStore {
        &self.store
    }
}
