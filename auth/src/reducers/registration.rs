//! Registration reducer.
//!
//! ```text
//! Idle ──Register──► (reset) ──Pending──► Pending ──Succeeded──► Succeeded
//!                                            │
//!                                            └──────Failed─────► Failed
//! any ──ResetRegistration──► Idle
//! ```

use crate::actions::AuthAction;
use crate::environment::AuthEnvironment;
use crate::providers::Operation;
use crate::state::AuthState;
use dashboard_sync_core::lifecycle::Transition;
use dashboard_sync_core::{SmallVec, effect::Effect, lifecycle_effect, reducer::Reducer, smallvec};

/// Registration reducer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationReducer;

impl RegistrationReducer {
    /// Create a new registration reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for RegistrationReducer {
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
            AuthAction::Register(credentials) => {
                // Stale outcome of the previous attempt goes first
                state.reset_registration();

                tracing::info!(backend = %env.selector.selection(), "Registration requested");

                let selector = env.selector.clone();
                smallvec![lifecycle_effect! {
                    tag: Operation::Register.tag(),
                    operation: move || selector.register_user(&credentials),
                    wrap: AuthAction::Registration
                }]
            },

            AuthAction::Registration(transition) => {
                state.registration_phase = transition.phase();

                match transition {
                    Transition::Pending => {},
                    Transition::Succeeded(session) => {
                        tracing::info!(backend = %session.backend, "Registration succeeded");
                        state.registration_success = true;
                        state.registration_error = None;
                    },
                    Transition::Failed(error) => {
                        tracing::warn!(error = %error, "Registration failed");
                        state.registration_success = false;
                        state.registration_error = Some(error.detail());
                    },
                }

                smallvec![Effect::None]
            },

            AuthAction::ResetRegistration => {
                state.reset_registration();
                smallvec![Effect::None]
            },

            _ => smallvec![Effect::None],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::BackendSelection;
    use crate::error::AuthError;
    use crate::selector::BackendSelector;
    use crate::state::{Credentials, ErrorKind, Session};
    use dashboard_sync_core::lifecycle::Phase;
    use dashboard_sync_testing::{ReducerTest, assertions};

    fn env(backend: BackendSelection) -> AuthEnvironment {
        AuthEnvironment::new(BackendSelector::new(backend))
    }

    fn failed_state() -> AuthState {
        AuthState {
            registration_error: Some(
                AuthError::provider("auth/weak-password", "too short").detail(),
            ),
            registration_phase: Phase::Failed,
            ..AuthState::default()
        }
    }

    #[test]
    fn register_resets_and_starts_lifecycle() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(env(BackendSelection::Firebase))
            .given_state(failed_state())
            .when_action(AuthAction::Register(Credentials::new("a@b.com", "pw")))
            .then_state(|state| {
                assert!(state.registration_error.is_none());
                assert!(!state.registration_success);
                assert_eq!(state.registration_phase, Phase::Idle);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_lifecycle_effect(effects);
            })
            .run();
    }

    #[test]
    fn pending_only_moves_phase() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(env(BackendSelection::Firebase))
            .given_state(AuthState::default())
            .when_action(AuthAction::Registration(Transition::Pending))
            .then_state(|state| {
                assert_eq!(state.registration_phase, Phase::Pending);
                assert!(state.registration_error.is_none());
                assert!(!state.registration_success);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn success_clears_error() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(env(BackendSelection::Firebase))
            .given_state(failed_state())
            .when_action(AuthAction::Registration(Transition::Succeeded(Session::new(
                "tok123",
                BackendSelection::Firebase,
            ))))
            .then_state(|state| {
                assert!(state.registration_success);
                assert!(state.registration_error.is_none());
                assert_eq!(state.registration_phase, Phase::Succeeded);
            })
            .run();
    }

    #[test]
    fn failure_clears_success() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(env(BackendSelection::Mock))
            .given_state(AuthState {
                registration_success: true,
                registration_phase: Phase::Succeeded,
                ..AuthState::default()
            })
            .when_action(AuthAction::Registration(Transition::Failed(
                AuthError::UnsupportedOperation {
                    backend: BackendSelection::Mock,
                    operation: Operation::Register,
                },
            )))
            .then_state(|state| {
                assert!(!state.registration_success);
                let error = state.registration_error.as_ref().unwrap();
                assert_eq!(error.kind, ErrorKind::UnsupportedOperation);
                assert!(!error.message.is_empty());
                assert_eq!(state.registration_phase, Phase::Failed);
            })
            .run();
    }

    #[test]
    fn reset_is_idempotent() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(env(BackendSelection::Mock))
            .given_state(failed_state())
            .when_action(AuthAction::ResetRegistration)
            .when_action(AuthAction::ResetRegistration)
            .then_state(|state| {
                assert_eq!(*state, AuthState::default());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn password_reset_actions_are_ignored() {
        ReducerTest::new(RegistrationReducer::new())
            .with_env(env(BackendSelection::Firebase))
            .given_state(failed_state())
            .when_action(AuthAction::ResetForgetPassword)
            .then_state(|state| {
                assert_eq!(*state, failed_state());
            })
            .run();
    }
}
