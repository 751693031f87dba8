//! Given-When-Then harness for reducers
//!
//! A [`ReducerTest`] reduces one or more actions against a starting state and
//! then runs every check in the order it was added. No runtime is involved:
//! effects are inspected as values, never executed.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use dashboard_sync_core::{effect::Effect, reducer::Reducer};

/// One deferred check, run after every action has been reduced
enum Check<S, A> {
    State(Box<dyn FnOnce(&S)>),
    Effects(Box<dyn FnOnce(&[Effect<A>])>),
}

/// Reducer test builder
///
/// ```ignore
/// use dashboard_sync_testing::{ReducerTest, assertions};
///
/// ReducerTest::new(RegistrationReducer::new())
///     .with_env(env(BackendSelection::Firebase))
///     .given_state(AuthState::default())
///     .when_action(AuthAction::Register(credentials))
///     .then_state(|state| assert!(state.registration_error.is_none()))
///     .then_effects(assertions::assert_lifecycle_effect)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    env: Option<E>,
    given: Option<S>,
    actions: Vec<A>,
    checks: Vec<Check<S, A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Start a test for `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            env: None,
            given: None,
            actions: Vec::new(),
            checks: Vec::new(),
        }
    }

    /// Environment handed to every `reduce` call
    #[must_use]
    pub fn with_env(self, env: E) -> Self {
        Self {
            env: Some(env),
            ..self
        }
    }

    /// Starting state
    #[must_use]
    pub fn given_state(self, state: S) -> Self {
        Self {
            given: Some(state),
            ..self
        }
    }

    /// Queue an action
    ///
    /// Actions are reduced in the order they were queued. Effect checks see
    /// only what the last one returned.
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Check the state left after the last action
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.checks.push(Check::State(Box::new(check)));
        self
    }

    /// Check the effects returned by the last action
    #[must_use]
    pub fn then_effects<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.checks.push(Check::Effects(Box::new(check)));
        self
    }

    /// Reduce the queued actions, then run the checks
    ///
    /// # Panics
    ///
    /// Panics when the state, the environment or every action is missing,
    /// and whenever a check fails.
    #[allow(clippy::panic)] // Test harness
    pub fn run(self) {
        let Some(mut state) = self.given else {
            panic!("ReducerTest needs a starting state: call given_state()");
        };
        let Some(env) = self.env else {
            panic!("ReducerTest needs an environment: call with_env()");
        };
        assert!(
            !self.actions.is_empty(),
            "ReducerTest needs at least one when_action()"
        );

        let mut last = Vec::new();
        for action in self.actions {
            last = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for check in self.checks {
            match check {
                Check::State(check) => check(&state),
                Check::Effects(check) => check(&last),
            }
        }
    }
}

/// Effect checks for use with [`ReducerTest::then_effects`]
pub mod assertions {
    use dashboard_sync_core::effect::Effect;

    /// Nothing to run: the list is empty or holds only `Effect::None`
    ///
    /// # Panics
    ///
    /// Panics otherwise.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "expected only Effect::None, got {effects:?}"
        );
    }

    /// Exactly `expected` effects were returned
    ///
    /// # Panics
    ///
    /// Panics on a different count.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(effects.len(), expected, "unexpected number of effects");
    }

    /// At least one `Effect::Sequential` was returned
    ///
    /// # Panics
    ///
    /// Panics if there is none.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_sequential_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Sequential(_))),
            "expected an Effect::Sequential"
        );
    }

    /// Exactly one effect, shaped the way `lifecycle::execute` builds it:
    /// a sequence of two futures, the `Pending` step then the terminal one
    ///
    /// # Panics
    ///
    /// Panics on any other shape.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_lifecycle_effect<A>(effects: &[Effect<A>]) {
        let [Effect::Sequential(steps)] = effects else {
            panic!("expected a single lifecycle effect");
        };
        assert!(
            matches!(steps.as_slice(), [Effect::Future(_), Effect::Future(_)]),
            "lifecycle effect must be two futures in sequence"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_sync_core::lifecycle::{OperationPanicked, Transition, execute};
    use dashboard_sync_core::{SmallVec, smallvec};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Gate {
        open: bool,
        attempts: u32,
    }

    #[derive(Clone, Debug)]
    enum GateAction {
        Toggle,
        Knock,
        Opened(Transition<(), OperationPanicked>),
    }

    struct GateReducer;

    impl Reducer for GateReducer {
        type State = Gate;
        type Action = GateAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Gate,
            action: GateAction,
            _env: &(),
        ) -> SmallVec<[Effect<GateAction>; 4]> {
            match action {
                GateAction::Toggle => {
                    state.open = !state.open;
                    smallvec![Effect::None]
                },
                GateAction::Knock => {
                    state.attempts += 1;
                    smallvec![execute(
                        "knock",
                        || Ok::<_, OperationPanicked>(async { Ok(()) }),
                        GateAction::Opened,
                    )]
                },
                GateAction::Opened(transition) => {
                    state.open = matches!(transition, Transition::Succeeded(()));
                    smallvec![Effect::None]
                },
            }
        }
    }

    #[test]
    fn single_action_updates_state() {
        ReducerTest::new(GateReducer)
            .with_env(())
            .given_state(Gate::default())
            .when_action(GateAction::Toggle)
            .then_state(|gate| assert!(gate.open))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn actions_reduce_in_order_and_effects_come_from_the_last() {
        ReducerTest::new(GateReducer)
            .with_env(())
            .given_state(Gate::default())
            .when_action(GateAction::Knock)
            .when_action(GateAction::Toggle)
            .when_action(GateAction::Toggle)
            .then_state(|gate| {
                assert_eq!(gate.attempts, 1);
                assert!(!gate.open);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn lifecycle_shape_is_recognized() {
        ReducerTest::new(GateReducer)
            .with_env(())
            .given_state(Gate::default())
            .when_action(GateAction::Knock)
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_sequential_effect(effects);
                assertions::assert_lifecycle_effect(effects);
            })
            .run();
    }

    #[test]
    #[should_panic(expected = "starting state")]
    fn missing_state_is_reported() {
        ReducerTest::new(GateReducer)
            .with_env(())
            .when_action(GateAction::Toggle)
            .run();
    }
}
