//! Error types for authentication operations.

use crate::config::BackendSelection;
use crate::providers::Operation;
use crate::state::{ErrorDetail, ErrorKind};
use dashboard_sync_core::lifecycle::OperationPanicked;
use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for authentication operations.
///
/// Errors travel inside [`AuthAction`](crate::AuthAction) transitions, so the
/// type is `Clone + PartialEq`. None of these reach the UI as an `Err`: the
/// reducer turns them into state via [`AuthError::detail`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Dispatch Errors
    // ═══════════════════════════════════════════════════════════

    /// The selected backend does not implement the operation.
    ///
    /// Raised synchronously by the selector at dispatch time.
    #[error("{operation} is not supported by the {backend} backend")]
    UnsupportedOperation {
        /// Backend that was selected
        backend: BackendSelection,
        /// Operation that was requested
        operation: Operation,
    },

    // ═══════════════════════════════════════════════════════════
    // Provider Errors
    // ═══════════════════════════════════════════════════════════

    /// The provider rejected the operation.
    ///
    /// Forwarded verbatim from the backend.
    #[error("Provider failure: {message}")]
    ProviderFailure {
        /// Provider-specific error code, if any (e.g. `auth/email-already-in-use`)
        code: Option<String>,
        /// Human-readable message
        message: String,
    },

    /// The provider panicked while running the operation.
    #[error("Operation {operation} panicked: {message}")]
    OperationPanicked {
        /// Operation tag
        operation: String,
        /// Panic message
        message: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Internal Errors
    // ═══════════════════════════════════════════════════════════

    /// Internal error (poisoned lock in an in-process implementation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Build a [`AuthError::ProviderFailure`] with a code.
    #[must_use]
    pub fn provider(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderFailure {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Coarse classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            Self::ProviderFailure { .. } => ErrorKind::ProviderFailure,
            Self::OperationPanicked { .. } => ErrorKind::Panicked,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// UI-facing projection of this error.
    ///
    /// A provider's message is carried over untouched; `kind` already says
    /// where it came from. Every other message is the display text, and no
    /// message is ever empty.
    #[must_use]
    pub fn detail(&self) -> ErrorDetail {
        let (code, message) = match self {
            Self::ProviderFailure { code, message } if !message.is_empty() => {
                (code.clone(), message.clone())
            },
            Self::ProviderFailure { code, .. } => (code.clone(), self.to_string()),
            _ => (None, self.to_string()),
        };

        ErrorDetail {
            kind: self.kind(),
            code,
            message,
        }
    }
}

impl From<OperationPanicked> for AuthError {
    fn from(panicked: OperationPanicked) -> Self {
        Self::OperationPanicked {
            operation: panicked.tag.to_string(),
            message: panicked.message,
        }
    }
}
