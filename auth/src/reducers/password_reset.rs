//! Password reset reducer.

use crate::actions::AuthAction;
use crate::environment::AuthEnvironment;
use crate::providers::Operation;
use crate::state::AuthState;
use dashboard_sync_core::lifecycle::Transition;
use dashboard_sync_core::{SmallVec, effect::Effect, lifecycle_effect, reducer::Reducer, smallvec};

/// Message shown after a password reset email was sent.
pub const PASSWORD_RESET_SENT: &str = "Password reset email sent. Check your inbox.";

/// Password reset reducer.
///
/// Same lifecycle as registration. A success stores
/// [`PASSWORD_RESET_SENT`] as the confirmation message.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordResetReducer;

impl PasswordResetReducer {
    /// Create a new password reset reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for PasswordResetReducer {
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
            AuthAction::ForgetPassword { email } => {
                state.reset_forget_password();

                tracing::info!(backend = %env.selector.selection(), "Password reset requested");

                let selector = env.selector.clone();
                smallvec![lifecycle_effect! {
                    tag: Operation::RequestPasswordReset.tag(),
                    operation: move || selector.forget_password(&email),
                    wrap: AuthAction::PasswordReset
                }]
            },

            AuthAction::PasswordReset(transition) => {
                state.forget_password_phase = transition.phase();

                match transition {
                    Transition::Pending => {},
                    Transition::Succeeded(()) => {
                        tracing::info!("Password reset email sent");
                        state.forget_password_message = Some(PASSWORD_RESET_SENT.to_string());
                        state.forget_password_error = None;
                    },
                    Transition::Failed(error) => {
                        tracing::warn!(error = %error, "Password reset failed");
                        state.forget_password_message = None;
                        state.forget_password_error = Some(error.detail());
                    },
                }

                smallvec![Effect::None]
            },

            AuthAction::ResetForgetPassword => {
                state.reset_forget_password();
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
    use dashboard_sync_core::lifecycle::Phase;
    use dashboard_sync_testing::effects::reduce_to_completion;
    use dashboard_sync_testing::{ReducerTest, assertions};

    fn env(backend: BackendSelection) -> AuthEnvironment {
        AuthEnvironment::new(BackendSelector::new(backend))
    }

    #[test]
    fn request_clears_previous_message() {
        ReducerTest::new(PasswordResetReducer::new())
            .with_env(env(BackendSelection::Firebase))
            .given_state(AuthState {
                forget_password_message: Some(PASSWORD_RESET_SENT.to_string()),
                forget_password_phase: Phase::Succeeded,
                ..AuthState::default()
            })
            .when_action(AuthAction::ForgetPassword {
                email: "a@b.com".into(),
            })
            .then_state(|state| {
                assert!(state.forget_password_message.is_none());
                assert_eq!(state.forget_password_phase, Phase::Idle);
            })
            .then_effects(assertions::assert_lifecycle_effect)
            .run();
    }

    #[test]
    fn failure_replaces_message_with_error() {
        ReducerTest::new(PasswordResetReducer::new())
            .with_env(env(BackendSelection::Firebase))
            .given_state(AuthState {
                forget_password_message: Some(PASSWORD_RESET_SENT.to_string()),
                ..AuthState::default()
            })
            .when_action(AuthAction::PasswordReset(Transition::Failed(
                AuthError::provider("auth/user-not-found", "no such user"),
            )))
            .then_state(|state| {
                assert!(state.forget_password_message.is_none());
                assert_eq!(
                    state.forget_password_error.as_ref().unwrap().code.as_deref(),
                    Some("auth/user-not-found")
                );
                assert_eq!(state.forget_password_phase, Phase::Failed);
            })
            .run();
    }

    #[tokio::test]
    async fn firebase_stub_sends_reset() {
        let mut state = AuthState::default();
        let fed_back = reduce_to_completion(
            &PasswordResetReducer::new(),
            &mut state,
            AuthAction::ForgetPassword {
                email: "a@b.com".into(),
            },
            &env(BackendSelection::Firebase),
        )
        .await;

        assert_eq!(
            fed_back,
            vec![
                AuthAction::PasswordReset(Transition::Pending),
                AuthAction::PasswordReset(Transition::Succeeded(())),
            ]
        );
        assert_eq!(state.forget_password_message.as_deref(), Some(PASSWORD_RESET_SENT));
        assert!(state.forget_password_error.is_none());
    }

    #[tokio::test]
    async fn jwt_reset_fails_without_escaping() {
        let mut state = AuthState::default();
        reduce_to_completion(
            &PasswordResetReducer::new(),
            &mut state,
            AuthAction::ForgetPassword {
                email: "a@b.com".into(),
            },
            &env(BackendSelection::Jwt),
        )
        .await;

        assert_eq!(state.forget_password_phase, Phase::Failed);
        assert!(state.forget_password_message.is_none());
        assert!(state.forget_password_error.is_some());
    }
}
