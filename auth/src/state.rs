//! Authentication state types.

use crate::config::BackendSelection;
use dashboard_sync_core::lifecycle::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Auth slice of the dashboard state.
///
/// Owned by the store running [`AuthReducer`](crate::reducers::AuthReducer).
/// The UI only ever sees snapshots.
///
/// # Invariants
///
/// Within one family (registration, password reset) the success field and
/// the error field are never both set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    /// Error of the last registration attempt.
    pub registration_error: Option<ErrorDetail>,

    /// Whether the last registration attempt succeeded.
    pub registration_success: bool,

    /// Confirmation message of the last password reset request.
    pub forget_password_message: Option<String>,

    /// Error of the last password reset request.
    pub forget_password_error: Option<ErrorDetail>,

    /// Lifecycle phase of the registration family.
    pub registration_phase: Phase,

    /// Lifecycle phase of the password reset family.
    pub forget_password_phase: Phase,
}

impl AuthState {
    /// Clear registration outcome and return to `Idle`.
    pub fn reset_registration(&mut self) {
        self.registration_error = None;
        self.registration_success = false;
        self.registration_phase = Phase::Idle;
    }

    /// Clear password reset outcome and return to `Idle`.
    pub fn reset_forget_password(&mut self) {
        self.forget_password_message = None;
        self.forget_password_error = None;
        self.forget_password_phase = Phase::Idle;
    }

    /// Whether a registration is in flight.
    #[must_use]
    pub fn is_registering(&self) -> bool {
        self.registration_phase == Phase::Pending
    }

    /// Whether a password reset request is in flight.
    #[must_use]
    pub fn is_requesting_password_reset(&self) -> bool {
        self.forget_password_phase == Phase::Pending
    }
}

/// Coarse classification of an [`ErrorDetail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The selected backend does not implement the operation.
    UnsupportedOperation,
    /// The backend rejected the operation.
    ProviderFailure,
    /// The operation panicked.
    Panicked,
    /// Failure inside this layer.
    Internal,
}

/// UI-facing error detail stored in [`AuthState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Classification.
    pub kind: ErrorKind,
    /// Backend error code, when the backend supplied one.
    pub code: Option<String>,
    /// Human-readable message. Never empty.
    pub message: String,
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Opaque authentication credential.
///
/// Created by a successful registration. The token is not validated here.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque token value.
    pub token: String,
    /// Backend that issued the token.
    pub backend: BackendSelection,
}

impl Session {
    /// Create a new session.
    #[must_use]
    pub fn new(token: impl Into<String>, backend: BackendSelection) -> Self {
        Self {
            token: token.into(),
            backend,
        }
    }
}

// Tokens stay out of logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("backend", &self.backend)
            .finish()
    }
}

/// Registration payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Plain-text password, passed through to the backend.
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
