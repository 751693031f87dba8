//! Authentication actions.
//!
//! Actions are every input to the auth reducer: intents from the UI, and
//! lifecycle transitions fed back by effects.

use crate::error::AuthError;
use crate::state::{Credentials, Session};
use dashboard_sync_core::lifecycle::Transition;

/// Authentication action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    // ═══════════════════════════════════════════════════════════
    // Registration
    // ═══════════════════════════════════════════════════════════

    /// Register a new user (intent).
    Register(Credentials),

    /// Registration lifecycle transition (effect feedback).
    Registration(Transition<Session, AuthError>),

    /// Clear the registration outcome.
    ResetRegistration,

    // ═══════════════════════════════════════════════════════════
    // Password Reset
    // ═══════════════════════════════════════════════════════════

    /// Request a password reset email (intent).
    ForgetPassword {
        /// Account email
        email: String,
    },

    /// Password reset lifecycle transition (effect feedback).
    PasswordReset(Transition<(), AuthError>),

    /// Clear the password reset outcome.
    ResetForgetPassword,
}

impl AuthAction {
    /// Whether this is a terminal lifecycle transition.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        match self {
            Self::Registration(transition) => transition.is_terminal(),
            Self::PasswordReset(transition) => transition.is_terminal(),
            _ => false,
        }
    }
}
