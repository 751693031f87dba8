//! # Dashboard Sync Testing
//!
//! Testing utilities and helpers for the dashboard state-synchronization layer.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then builder for reducers
//! - [`effects`]: a runtime-free effect driver for reducer-level scenarios
//! - [`helpers`]: tracing setup and log capture for tests
//! - [`properties`]: proptest strategies for common inputs
//!
//! ## Example
//!
//! ```ignore
//! use dashboard_sync_testing::effects::reduce_to_completion;
//!
//! #[tokio::test]
//! async fn registration_succeeds() {
//!     let mut state = AuthState::default();
//!     reduce_to_completion(&reducer, &mut state, register_action, &env).await;
//!     assert!(state.registration_success);
//! }
//! ```

pub mod reducer_test;

/// Runtime-free effect execution
///
/// Drives effect descriptions to completion on the current task, without a
/// [`Store`](https://docs.rs/dashboard-sync-runtime). Useful for checking
/// what a reducer *would* dispatch end to end while keeping tests
/// single-threaded and deterministic.
pub mod effects {
    use dashboard_sync_core::{effect::Effect, reducer::Reducer};
    use futures::future::LocalBoxFuture;
    use std::future::Future;
    use std::pin::Pin;

    type Collected<A> = Pin<Box<dyn Future<Output = Vec<A>> + Send>>;

    /// Execute an effect and collect the actions it produces
    ///
    /// - `Sequential` steps run one after the other, in order
    /// - `Parallel` branches run concurrently; actions are collected in
    ///   branch order
    /// - `Delay` sleeps for its real duration
    pub fn collect_actions<A>(effect: Effect<A>) -> Collected<A>
    where
        A: Send + 'static,
    {
        Box::pin(async move {
            match effect {
                Effect::None => Vec::new(),
                Effect::Future(fut) => fut.await.into_iter().collect(),
                Effect::Delay { duration, action } => {
                    tokio::time::sleep(duration).await;
                    vec![*action]
                },
                Effect::Parallel(effects) => {
                    futures::future::join_all(effects.into_iter().map(collect_actions))
                        .await
                        .into_iter()
                        .flatten()
                        .collect()
                },
                Effect::Sequential(effects) => {
                    let mut produced = Vec::new();
                    for effect in effects {
                        produced.extend(collect_actions(effect).await);
                    }
                    produced
                },
            }
        })
    }

    /// Reduce an action, then keep executing effects and reducing what they
    /// produce until nothing is left
    ///
    /// Returns every action fed back into the reducer, in reduction order.
    ///
    /// Each produced action is reduced, and its own effects driven, before
    /// the next effect step starts. A `Sequential` step therefore sees the
    /// state left by the steps before it, as it would under the `Store`: a
    /// lifecycle operation runs only after its `Pending` was reduced.
    /// `Parallel` branches are driven one after another in branch order,
    /// which is stricter than the `Store` and keeps runs deterministic.
    pub async fn reduce_to_completion<R>(
        reducer: &R,
        state: &mut R::State,
        action: R::Action,
        env: &R::Environment,
    ) -> Vec<R::Action>
    where
        R: Reducer,
        R::Action: Clone + Send + 'static,
    {
        let mut fed_back = Vec::new();
        for effect in reducer.reduce(state, action, env) {
            drive(reducer, state, effect, env, &mut fed_back).await;
        }
        fed_back
    }

    fn drive<'a, R>(
        reducer: &'a R,
        state: &'a mut R::State,
        effect: Effect<R::Action>,
        env: &'a R::Environment,
        fed_back: &'a mut Vec<R::Action>,
    ) -> LocalBoxFuture<'a, ()>
    where
        R: Reducer + 'a,
        R::State: 'a,
        R::Environment: 'a,
        R::Action: Clone + Send + 'static,
    {
        Box::pin(async move {
            match effect {
                Effect::Sequential(effects) | Effect::Parallel(effects) => {
                    for effect in effects {
                        drive(reducer, &mut *state, effect, env, &mut *fed_back).await;
                    }
                },
                leaf => {
                    for action in collect_actions(leaf).await {
                        fed_back.push(action.clone());
                        for effect in reducer.reduce(&mut *state, action, env) {
                            drive(reducer, &mut *state, effect, env, &mut *fed_back).await;
                        }
                    }
                },
            }
        })
    }
}

/// Test helpers and utilities
pub mod helpers {
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::fmt::MakeWriter;
    use tracing_subscriber::util::SubscriberInitExt;

    /// Install a test-friendly tracing subscriber
    ///
    /// Output goes through the test harness capture. Honors `RUST_LOG`,
    /// defaulting to `debug`. Safe to call from every test; only the first
    /// call installs anything.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }

    /// In-memory log sink shared by every writer it hands out
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .map_err(|_| io::Error::other("log buffer poisoned"))?
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` with every event on this thread, down to `TRACE`, captured
    ///
    /// Returns the closure's result together with the formatted log output.
    /// Only events emitted on the calling thread are seen, so async code
    /// should run on a current-thread runtime inside `f`.
    pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::TRACE)
            .with_ansi(false)
            .with_writer(buffer.clone())
            .finish();

        let result = {
            let _default = subscriber.set_default();
            f()
        };

        let logs = buffer
            .0
            .lock()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();
        (result, logs)
    }
}

/// Property-based testing utilities using proptest
pub mod properties {
    use proptest::prelude::*;

    /// Plausible email addresses (`local@domain.tld`)
    pub fn email() -> impl Strategy<Value = String> {
        ("[a-z][a-z0-9._]{0,11}", "[a-z]{1,10}", "(com|org|io|dev)")
            .prop_map(|(local, domain, tld)| format!("{local}@{domain}.{tld}"))
    }

    /// Passwords, including empty and whitespace-only ones
    pub fn password() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("   ".to_string()),
            "[ -~]{1,24}",
        ]
    }
}

// Re-export commonly used items
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::effects::{collect_actions, reduce_to_completion};
    use dashboard_sync_core::lifecycle::{OperationPanicked, Transition, execute};
    use dashboard_sync_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Step {
        Start,
        Tick(u8),
    }

    struct Ticker;

    impl Reducer for Ticker {
        type State = Vec<u8>;
        type Action = Step;
        type Environment = ();

        fn reduce(&self, state: &mut Vec<u8>, action: Step, _env: &()) -> SmallVec<[Effect<Step>; 4]> {
            match action {
                Step::Start => smallvec![Effect::Sequential(vec![
                    Effect::Future(Box::pin(async { Some(Step::Tick(1)) })),
                    Effect::Delay {
                        duration: Duration::from_millis(5),
                        action: Box::new(Step::Tick(2)),
                    },
                ])],
                Step::Tick(n) => {
                    state.push(n);
                    smallvec![Effect::None]
                },
            }
        }
    }

    #[tokio::test]
    async fn parallel_actions_keep_branch_order() {
        let effect = Effect::Parallel(vec![
            Effect::Future(Box::pin(async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Some(1_u8)
            })),
            Effect::Future(Box::pin(async { Some(2_u8) })),
            Effect::None,
        ]);

        assert_eq!(collect_actions(effect).await, vec![1, 2]);
    }

    #[tokio::test]
    async fn reduce_to_completion_follows_feedback() {
        let mut state = Vec::new();
        let fed_back = reduce_to_completion(&Ticker, &mut state, Step::Start, &()).await;

        assert_eq!(fed_back, vec![Step::Tick(1), Step::Tick(2)]);
        assert_eq!(state, vec![1, 2]);
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Flow {
        Start,
        Step(Transition<(), OperationPanicked>),
    }

    type Journal = Arc<Mutex<Vec<&'static str>>>;

    struct Lifecycle;

    impl Reducer for Lifecycle {
        type State = ();
        type Action = Flow;
        type Environment = Journal;

        fn reduce(&self, _state: &mut (), action: Flow, journal: &Journal) -> SmallVec<[Effect<Flow>; 4]> {
            match action {
                Flow::Start => {
                    let journal = Arc::clone(journal);
                    smallvec![execute(
                        "journal",
                        move || {
                            journal.lock().unwrap().push("operation ran");
                            Ok::<_, OperationPanicked>(async { Ok(()) })
                        },
                        Flow::Step,
                    )]
                },
                Flow::Step(Transition::Pending) => {
                    journal.lock().unwrap().push("pending reduced");
                    smallvec![Effect::None]
                },
                Flow::Step(_) => {
                    journal.lock().unwrap().push("terminal reduced");
                    smallvec![Effect::None]
                },
            }
        }
    }

    #[tokio::test]
    async fn lifecycle_operation_runs_after_pending_is_reduced() {
        let journal = Journal::default();
        let fed_back = reduce_to_completion(&Lifecycle, &mut (), Flow::Start, &journal).await;

        assert_eq!(
            fed_back,
            vec![
                Flow::Step(Transition::Pending),
                Flow::Step(Transition::Succeeded(()))
            ]
        );
        assert_eq!(
            *journal.lock().unwrap(),
            vec!["pending reduced", "operation ran", "terminal reduced"]
        );
    }

    proptest! {
        #[test]
        fn generated_emails_have_one_at_sign(email in super::properties::email()) {
            prop_assert_eq!(email.matches('@').count(), 1);
        }
    }
}
