//! Authentication reducers.
//!
//! This module contains pure reducer functions for authentication.
//!
//! Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.

pub mod password_reset;
pub mod registration;

use crate::{AuthAction, AuthEnvironment, AuthState};
use dashboard_sync_core::{SmallVec, effect::Effect, reducer::Reducer};

// Re-export
pub use password_reset::{PASSWORD_RESET_SENT, PasswordResetReducer};
pub use registration::RegistrationReducer;

/// Unified authentication reducer.
///
/// Combines the registration and password reset families into a single
/// reducer. Routes actions to the appropriate sub-reducer based on action type.
#[derive(Clone, Debug, Default)]
pub struct AuthReducer {
    registration: RegistrationReducer,
    password_reset: PasswordResetReducer,
}

impl AuthReducer {
    /// Create a new unified auth reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            registration: RegistrationReducer::new(),
            password_reset: PasswordResetReducer::new(),
        }
    }
}

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AuthEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AuthAction::Register(_)
            | AuthAction::Registration(_)
            | AuthAction::ResetRegistration => self.registration.reduce(state, action, env),

            AuthAction::ForgetPassword { .. }
            | AuthAction::PasswordReset(_)
            | AuthAction::ResetForgetPassword => self.password_reset.reduce(state, action, env),
        }
    }
}
