//! # Dashboard Sync Runtime
//!
//! Runtime implementation for the dashboard state-synchronization layer.
//!
//! This crate provides the [`Store`] that coordinates reducer execution and
//! effect handling.
//!
//! ## Core Components
//!
//! - **Store**: owns the state and the handle to the action queue
//! - **Reducer loop**: a single task draining the action queue in FIFO order,
//!   so reducer calls never overlap
//! - **Effect runner**: executes effect descriptions on Tokio tasks and feeds
//!   the actions they produce back into the queue
//!
//! ```text
//!   send(action) ──► ┌───────────────┐     ┌─────────┐
//!                    │ action queue  │ ──► │ reducer │ ──► state
//!   effects ───────► │ (mpsc, FIFO)  │     └────┬────┘
//!      ▲             └───────────────┘          │ effects
//!      └────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use dashboard_sync_runtime::Store;
//!
//! let store = Store::new(AuthState::default(), AuthReducer::new(), environment);
//!
//! let mut handle = store.send(AuthAction::ResetRegistration).await?;
//! handle.wait().await;
//!
//! let succeeded = store.state(|s| s.registration_success).await;
//! ```

use dashboard_sync_core::{effect::Effect, reducer::Reducer};
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::{RwLock, broadcast, mpsc, oneshot, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for an action or for effects to complete
        #[error("Timeout waiting for action")]
        Timeout,

        /// The action queue or the action broadcast channel closed
        ///
        /// Typically means the reducer loop stopped (a reducer panicked) or
        /// the store is shutting down.
        #[error("Action channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
///
/// let store = Store::with_config(state, reducer, env, config);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of actions buffered for slow action subscribers
    pub broadcast_capacity: usize,
    /// Default timeout for graceful shutdown
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize, default_shutdown_timeout: Duration) -> Self {
        Self {
            broadcast_capacity,
            default_shutdown_timeout,
        }
    }

    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`]. The handle completes once every effect the
/// action started has finished *and* every action those effects fed back has
/// been reduced, transitively.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(AuthAction::ForgetPassword { email }).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // The terminal transition has been reduced
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a handle together with the tracking context effects report to
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (handle, _tracking) = Self::new();
        handle
    }

    /// Number of effects and fed-back actions still outstanding
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all tracked work to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all tracked work to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires first.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: counter shared between a handle and the work it tracks
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the tracking counter on drop
///
/// Runs even when an effect task panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Internal: one queued action
///
/// Whoever enqueues increments the tracking counter first and hands the
/// decrement to `tracking`. It fires once the action is reduced and its
/// effects are started, or when the envelope is dropped unreduced because the
/// reducer loop is gone.
struct Envelope<A> {
    action: A,
    tracking: DecrementGuard,
    reduced: Option<oneshot::Sender<()>>,
    broadcast: bool,
}

/// Internal: executes effects and feeds produced actions back into the queue
///
/// Holds only a weak queue handle so the reducer loop stops once every
/// [`Store`] clone and every in-flight effect is gone.
struct EffectRunner<A> {
    queue: mpsc::WeakUnboundedSender<Envelope<A>>,
    action_broadcast: broadcast::Sender<A>,
    pending_effects: Arc<AtomicUsize>,
}

impl<A> Clone for EffectRunner<A> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            action_broadcast: self.action_broadcast.clone(),
            pending_effects: Arc::clone(&self.pending_effects),
        }
    }
}

impl<A> EffectRunner<A>
where
    A: Clone + Send + 'static,
{
    fn track_pending(&self) -> AtomicCounterGuard {
        self.pending_effects.fetch_add(1, Ordering::SeqCst);
        AtomicCounterGuard(Arc::clone(&self.pending_effects))
    }

    /// Enqueue an effect-produced action for reduction
    ///
    /// Subscribers see it only after it has been reduced.
    fn feed_back(
        &self,
        queue: &mpsc::UnboundedSender<Envelope<A>>,
        action: A,
        tracking: &EffectTracking,
    ) {
        tracking.increment();
        let envelope = Envelope {
            action,
            tracking: DecrementGuard(tracking.clone()),
            reduced: None,
            broadcast: true,
        };
        // A rejected envelope is dropped here, which releases its tracking
        if queue.send(envelope).is_err() {
            tracing::warn!("Reducer loop stopped, dropping action produced by effect");
        }
    }

    /// Publish an action that has already been reduced
    fn publish(&self, action: A) {
        // No subscribers is not an error
        let _ = self.action_broadcast.send(action);
    }

    /// Execute an effect, reporting to `tracking`
    ///
    /// - `None`: No-op
    /// - `Future`: runs on a task, feeds back the resulting action if `Some`
    /// - `Delay`: waits, then feeds back the action
    /// - `Parallel`: executes each effect concurrently under the same tracking
    /// - `Sequential`: executes effects in order; each one, including the
    ///   reduction of what it fed back, completes before the next starts
    #[allow(clippy::needless_pass_by_value)] // tracking is cloned into tasks
    fn execute(&self, effect: Effect<A>, tracking: EffectTracking) {
        match effect {
            Effect::None => {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Future(fut) => {
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                let Some(queue) = self.queue.upgrade() else {
                    tracing::warn!("Store dropped, skipping Effect::Future");
                    return;
                };

                tracking.increment();
                let pending_guard = self.track_pending();
                let runner = self.clone();

                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking.clone());
                    let _pending_guard = pending_guard;

                    if let Some(action) = fut.await {
                        tracing::trace!("Effect::Future produced an action");
                        runner.feed_back(&queue, action, &tracking);
                    } else {
                        tracing::trace!("Effect::Future completed with no action");
                    }
                });
            },
            Effect::Delay { duration, action } => {
                metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                let Some(queue) = self.queue.upgrade() else {
                    tracing::warn!("Store dropped, skipping Effect::Delay");
                    return;
                };

                tracking.increment();
                let pending_guard = self.track_pending();
                let runner = self.clone();

                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking.clone());
                    let _pending_guard = pending_guard;

                    tokio::time::sleep(duration).await;
                    runner.feed_back(&queue, *action, &tracking);
                });
            },
            Effect::Parallel(effects) => {
                metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());

                for effect in effects {
                    self.execute(effect, tracking.clone());
                }
            },
            Effect::Sequential(effects) => {
                metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                let effect_count = effects.len();

                tracking.increment();
                let pending_guard = self.track_pending();
                let runner = self.clone();

                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking);
                    let _pending_guard = pending_guard;

                    for (idx, effect) in effects.into_iter().enumerate() {
                        tracing::trace!(
                            "Executing sequential effect {} of {}",
                            idx + 1,
                            effect_count
                        );

                        let (mut step, step_tracking) = EffectHandle::new();
                        runner.execute(effect, step_tracking);
                        step.wait().await;
                    }
                });
            },
        }
    }
}

/// Internal: drains the action queue through the reducer, one action at a time
async fn run_reducer_loop<S, A, E, R>(
    mut queue: mpsc::UnboundedReceiver<Envelope<A>>,
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    runner: EffectRunner<A>,
) where
    R: Reducer<State = S, Action = A, Environment = E>,
    A: Clone + Send + 'static,
{
    while let Some(Envelope {
        action,
        tracking: guard,
        reduced,
        broadcast: publish,
    }) = queue.recv().await
    {
        let tracking = guard.0.clone();
        let published = publish.then(|| action.clone());

        let effects = {
            let mut state = state.write().await;

            let span = tracing::debug_span!("reducer_execution");
            let _enter = span.enter();

            let start = Instant::now();
            let effects = reducer.reduce(&mut *state, action, &environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            tracing::trace!("Reducer completed, returned {} effects", effects.len());
            effects
        };

        // The write lock is released, so a subscriber reading state sees this action applied
        if let Some(action) = published {
            runner.publish(action);
        }

        for effect in effects {
            runner.execute(effect, tracking.clone());
        }

        if let Some(reduced) = reduced {
            let _ = reduced.send(());
        }
        drop(guard);
    }

    tracing::debug!("Action queue closed, reducer loop stopped");
}

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent reads)
/// 2. The action queue feeding a single reducer loop task
/// 3. Effect execution (with feedback loop)
/// 4. Broadcasting of effect-produced actions to subscribers
///
/// Reducer calls are serialized: actions are reduced one at a time in the
/// order they reach the queue. Effects run concurrently and may complete in
/// any order; the actions they produce are reduced in delivery order.
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    queue: mpsc::UnboundedSender<Envelope<A>>,
    action_broadcast: broadcast::Sender<A>,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
    config: StoreConfig,
    _reducer: PhantomData<fn() -> (E, R)>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            queue: self.queue.clone(),
            action_broadcast: self.action_broadcast.clone(),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
            config: self.config.clone(),
            _reducer: PhantomData,
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Uses [`StoreConfig::default()`].
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime (the reducer loop is
    /// spawned immediately).
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_config(initial_state, reducer, environment, StoreConfig::default())
    }

    /// Create a new Store with custom configuration
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
        let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));
        let (queue, queue_rx) = mpsc::unbounded_channel();
        let state = Arc::new(RwLock::new(initial_state));
        let pending_effects = Arc::new(AtomicUsize::new(0));

        let runner = EffectRunner {
            queue: queue.downgrade(),
            action_broadcast: action_broadcast.clone(),
            pending_effects: Arc::clone(&pending_effects),
        };

        tokio::spawn(run_reducer_loop(
            queue_rx,
            Arc::clone(&state),
            reducer,
            environment,
            runner,
        ));

        Self {
            state,
            queue,
            action_broadcast,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects,
            config,
            _reducer: PhantomData,
        }
    }

    /// Send an action to the store
    ///
    /// 1. Enqueues the action behind any actions already waiting
    /// 2. Waits until the reducer loop has reduced it
    /// 3. Returns a handle tracking the effects it started
    ///
    /// `send()` returns after the reducer ran, not after effects completed.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ShutdownInProgress`] if the store is shutting down
    /// - [`StoreError::ChannelClosed`] if the reducer loop is gone
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            metrics::counter!("store.shutdown.rejected_actions").increment(1);
            return Err(StoreError::ShutdownInProgress);
        }

        metrics::counter!("store.actions.total").increment(1);

        let (handle, tracking) = EffectHandle::new();
        let (reduced_tx, reduced_rx) = oneshot::channel();

        tracking.increment();
        self.queue
            .send(Envelope {
                action,
                tracking: DecrementGuard(tracking),
                reduced: Some(reduced_tx),
                broadcast: false,
            })
            .map_err(|_| StoreError::ChannelClosed)?;

        reduced_rx.await.map_err(|_| StoreError::ChannelClosed)?;
        tracing::trace!("Action reduced, returning handle");

        Ok(handle)
    }

    /// Send an action and wait for a matching effect-produced action
    ///
    /// Subscribes to the action broadcast before sending, so a fast effect
    /// cannot be missed. The returned action has already been reduced: state
    /// read after this returns reflects it.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no matching action before `timeout`
    /// - [`StoreError::ChannelClosed`]: broadcast channel closed
    /// - [`StoreError::ShutdownInProgress`]: store is shutting down
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        let mut rx = self.action_broadcast.subscribe();

        self.send(action).await?;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Subscribe to every action produced by effects
    ///
    /// Actions sent through [`send`](Self::send) are not broadcast, only the
    /// ones effects feed back (lifecycle transitions, delayed actions). Each
    /// one is broadcast after the reducer has applied it.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let error = store.state(|s| s.registration_error.clone()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&*state)
    }

    /// Number of effect tasks currently running
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.pending_effects.load(Ordering::Acquire)
    }

    /// Initiate graceful shutdown with the configured default timeout
    ///
    /// # Errors
    ///
    /// See [`shutdown`](Self::shutdown).
    pub async fn shutdown_default(&self) -> Result<(), StoreError> {
        self.shutdown(self.config.default_shutdown_timeout).await
    }

    /// Initiate graceful shutdown of the store
    ///
    /// Rejects new actions, then waits for running effects to finish.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when `timeout` expires.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");
        metrics::counter!("store.shutdown.initiated").increment(1);

        self.shutdown.store(true, Ordering::Release);

        let start = Instant::now();
        let poll_interval = Duration::from_millis(10);

        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                metrics::counter!("store.shutdown.completed").increment(1);
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending_effects = pending, "Shutdown timeout");
                metrics::counter!("store.shutdown.timeout").increment(1);
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }
}
