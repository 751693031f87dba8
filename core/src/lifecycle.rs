//! Async operation lifecycle.
//!
//! Every asynchronous operation a reducer starts follows the same protocol:
//! one [`Transition::Pending`] followed by exactly one terminal transition,
//! [`Transition::Succeeded`] or [`Transition::Failed`]. The [`execute`]
//! function builds the effect that enforces it.
//!
//! ```text
//! intent ──► reducer ──► execute(tag, operation, wrap)
//!                              │
//!                              ├─► wrap(Pending)            (reduced first)
//!                              └─► operation() ... .await
//!                                     ├─ Ok(payload)  ─► wrap(Succeeded(payload))
//!                                     ├─ Err(error)   ─► wrap(Failed(error))
//!                                     └─ panic        ─► wrap(Failed(OperationPanicked.into()))
//! ```

use crate::effect::Effect;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;

/// One step in the lifecycle of an async operation.
///
/// `T` is the success payload, `E` the failure detail. A unit payload
/// (`Succeeded(())`) means "succeeded with nothing" and is distinct from a
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition<T, E> {
    /// The operation has been dispatched and is in flight.
    Pending,

    /// The operation completed successfully.
    Succeeded(T),

    /// The operation failed. Carries the failure detail.
    Failed(E),
}

impl<T, E> Transition<T, E> {
    /// Returns `true` for `Succeeded` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// The phase a state machine enters after applying this transition.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Pending => Phase::Pending,
            Self::Succeeded(_) => Phase::Succeeded,
            Self::Failed(_) => Phase::Failed,
        }
    }
}

/// Phase of one operation family as seen by its reducer.
///
/// `Idle → Pending → {Succeeded, Failed}`; a reset returns to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing in flight, no terminal outcome recorded.
    #[default]
    Idle,

    /// An invocation is in flight.
    Pending,

    /// The last delivered outcome was a success.
    Succeeded,

    /// The last delivered outcome was a failure.
    Failed,
}

impl Phase {
    /// Returns `true` for `Succeeded` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// A lifecycle operation panicked instead of returning.
///
/// The executor converts the panic into this value and hands it to the
/// operation's error type through `From`, so a panicking provider still yields
/// a `Failed` transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("operation `{tag}` panicked: {message}")]
pub struct OperationPanicked {
    /// Tag of the operation that panicked.
    pub tag: &'static str,

    /// Panic message, when the payload was a string.
    pub message: String,
}

impl OperationPanicked {
    fn from_payload(tag: &'static str, payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());

        Self { tag, message }
    }
}

/// Build the effect that runs one async operation through its lifecycle.
///
/// # Arguments
///
/// - `tag`: name of the operation, used in panic reports
/// - `operation`: binds the operation. It may fail synchronously (for
///   example when the selected backend does not support it); that error is
///   delivered as `Failed` like any other.
/// - `wrap`: turns a transition into the reducer's action type
///
/// # Guarantees
///
/// - `operation` is called exactly once, after `Pending` has been reduced
/// - exactly one terminal transition is produced, never zero, never two
/// - no error or panic escapes: everything becomes `Failed`
///
/// No timeout or cancellation is applied; an operation that never resolves
/// never produces its terminal transition.
pub fn execute<T, E, A, Op, Fut, W>(tag: &'static str, operation: Op, wrap: W) -> Effect<A>
where
    T: Send + 'static,
    E: From<OperationPanicked> + Send + 'static,
    A: Send + 'static,
    Op: FnOnce() -> Result<Fut, E> + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    W: Fn(Transition<T, E>) -> A + Send + Sync + 'static,
{
    let wrap = Arc::new(wrap);

    let pending = {
        let wrap = Arc::clone(&wrap);
        Effect::Future(Box::pin(async move { Some((*wrap)(Transition::Pending)) }))
    };

    let terminal = Effect::Future(Box::pin(async move {
        let invocation = async move {
            match operation() {
                Ok(bound) => bound.await,
                Err(error) => Err(error),
            }
        };

        let transition = match AssertUnwindSafe(invocation).catch_unwind().await {
            Ok(Ok(payload)) => Transition::Succeeded(payload),
            Ok(Err(error)) => Transition::Failed(error),
            Err(panic) => Transition::Failed(E::from(OperationPanicked::from_payload(
                tag,
                panic.as_ref(),
            ))),
        };

        Some((*wrap)(transition))
    }));

    Effect::Sequential(vec![pending, terminal])
}
