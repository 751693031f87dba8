//! # Dashboard Sync Core
//!
//! Core traits and types for the dashboard state-synchronization layer.
//!
//! The UI never mutates shared state directly. It sends actions to a store;
//! a pure reducer turns each action into a state change plus a list of
//! effect *descriptions*; the runtime executes those effects and feeds the
//! actions they produce back into the reducer.
//!
//! ## Core Concepts
//!
//! - **State**: the slice of application state a feature owns
//! - **Action**: every input to a reducer (UI intents and lifecycle transitions)
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side effect description (not execution)
//! - **Environment**: injected dependencies (backend providers, stores)
//! - **Lifecycle**: the `Pending → Succeeded | Failed` protocol every async
//!   operation follows, see [`lifecycle`]
//!
//! ## Example
//!
//! ```ignore
//! use dashboard_sync_core::*;
//!
//! impl Reducer for ProfileReducer {
//!     type State = ProfileState;
//!     type Action = ProfileAction;
//!     type Environment = ProfileEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut ProfileState,
//!         action: ProfileAction,
//!         env: &ProfileEnvironment,
//!     ) -> SmallVec<[Effect<ProfileAction>; 4]> {
//!         match action {
//!             ProfileAction::Load => {
//!                 let api = env.api.clone();
//!                 smallvec![lifecycle::execute(
//!                     "load_profile",
//!                     move || Ok(api.load()),
//!                     ProfileAction::Loading,
//!                 )]
//!             }
//!             ProfileAction::Loading(transition) => {
//!                 state.apply(transition);
//!                 smallvec![Effect::None]
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Declarative macros for building effects
pub mod effect_macros;

/// Async operation lifecycle: transitions, phases and the executor
pub mod lifecycle;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They hold all decision logic and are deterministic and testable without a
/// runtime.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state slice this reducer owns
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed by the runtime
        ///
        /// It must not block and must not perform I/O itself.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Run effects one after another.
        ///
        /// Each effect, including the reduction of every action it feeds
        /// back, completes before the next one starts.
        Sequential(Vec<Effect<Action>>),

        /// Delayed action
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns `true` for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}
