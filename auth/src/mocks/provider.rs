//! Scriptable provider for testing.

use crate::config::BackendSelection;
use crate::error::{AuthError, Result};
use crate::providers::{AuthProvider, Operation};
use crate::state::Session;
use futures::future::BoxFuture;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Recorded provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `register_user`
    Register {
        /// Email passed in
        email: String,
    },
    /// `forget_password`
    ForgetPassword {
        /// Email passed in
        email: String,
    },
}

/// Releases a gated outcome.
///
/// Dropping the gate without opening it releases the outcome too.
#[derive(Debug)]
pub struct MockGate(oneshot::Sender<()>);

impl MockGate {
    /// Let the held outcome resolve.
    pub fn open(self) {
        let _ = self.0.send(());
    }
}

#[derive(Debug)]
enum Script<T> {
    Ready(Result<T>),
    Gated {
        outcome: Result<T>,
        gate: oneshot::Receiver<()>,
    },
    Panic(String),
}

impl<T: Send + 'static> Script<T> {
    fn into_future(self) -> BoxFuture<'static, Result<T>> {
        match self {
            Self::Ready(outcome) => Box::pin(futures::future::ready(outcome)),
            Self::Gated { outcome, gate } => Box::pin(async move {
                let _ = gate.await;
                outcome
            }),
            Self::Panic(message) => Box::pin(scripted_panic(message)),
        }
    }
}

#[allow(clippy::panic, clippy::unused_async)] // Scripted failure mode
async fn scripted_panic<T>(message: String) -> Result<T> {
    panic!("{message}")
}

#[derive(Debug, Default)]
struct Scripts {
    register: HashMap<String, Script<Session>>,
    reset: HashMap<String, Script<()>>,
    calls: Vec<MockCall>,
}

/// Mock auth provider.
///
/// Outcomes are scripted per email and consumed by the first call for that
/// email. Unscripted calls succeed: registration yields a `mock-token`
/// session, password reset yields unit.
///
/// # Example
///
/// ```ignore
/// let provider = MockAuthProvider::new(BackendSelection::Firebase)
///     .with_register_outcome("a@b.com", Ok(Session::new("tok123", BackendSelection::Firebase)));
/// let gate = provider.gate_reset("slow@b.com", Err(AuthError::provider("x", "rejected")));
/// // ... later
/// gate.open();
/// ```
#[derive(Debug, Clone)]
pub struct MockAuthProvider {
    backend: BackendSelection,
    unsupported: HashSet<Operation>,
    scripts: Arc<Mutex<Scripts>>,
}

impl MockAuthProvider {
    /// Create a mock posing as `backend` that supports every operation.
    #[must_use]
    pub fn new(backend: BackendSelection) -> Self {
        Self {
            backend,
            unsupported: HashSet::new(),
            scripts: Arc::new(Mutex::new(Scripts::default())),
        }
    }

    /// Mark an operation as unsupported.
    #[must_use]
    pub fn without(mut self, operation: Operation) -> Self {
        self.unsupported.insert(operation);
        self
    }

    /// Script the next registration outcome for `email`.
    #[must_use]
    pub fn with_register_outcome(self, email: &str, outcome: Result<Session>) -> Self {
        self.script_register(email, Script::Ready(outcome));
        self
    }

    /// Script the next password reset outcome for `email`.
    #[must_use]
    pub fn with_reset_outcome(self, email: &str, outcome: Result<()>) -> Self {
        self.script_reset(email, Script::Ready(outcome));
        self
    }

    /// Make the next registration for `email` panic.
    #[must_use]
    pub fn with_register_panic(self, email: &str, message: &str) -> Self {
        self.script_register(email, Script::Panic(message.to_string()));
        self
    }

    /// Hold the next registration outcome for `email` until the gate opens.
    #[must_use]
    pub fn gate_register(&self, email: &str, outcome: Result<Session>) -> MockGate {
        let (tx, gate) = oneshot::channel();
        self.script_register(email, Script::Gated { outcome, gate });
        MockGate(tx)
    }

    /// Hold the next password reset outcome for `email` until the gate opens.
    #[must_use]
    pub fn gate_reset(&self, email: &str, outcome: Result<()>) -> MockGate {
        let (tx, gate) = oneshot::channel();
        self.script_reset(email, Script::Gated { outcome, gate });
        MockGate(tx)
    }

    /// Calls received so far, in order.
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned.
    pub fn calls(&self) -> Result<Vec<MockCall>> {
        Ok(self.lock()?.calls.clone())
    }

    /// Number of calls received so far.
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned.
    pub fn call_count(&self) -> Result<usize> {
        Ok(self.lock()?.calls.len())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Scripts>> {
        self.scripts
            .lock()
            .map_err(|_| AuthError::Internal("Mutex lock failed".to_string()))
    }

    fn script_register(&self, email: &str, script: Script<Session>) {
        if let Ok(mut scripts) = self.lock() {
            scripts.register.insert(email.to_string(), script);
        }
    }

    fn script_reset(&self, email: &str, script: Script<()>) {
        if let Ok(mut scripts) = self.lock() {
            scripts.reset.insert(email.to_string(), script);
        }
    }
}

impl AuthProvider for MockAuthProvider {
    fn backend(&self) -> BackendSelection {
        self.backend
    }

    fn supports(&self, operation: Operation) -> bool {
        !self.unsupported.contains(&operation)
    }

    fn register_user(&self, email: &str, _password: &str) -> BoxFuture<'static, Result<Session>> {
        let mut scripts = match self.lock() {
            Ok(scripts) => scripts,
            Err(error) => return Box::pin(futures::future::ready(Err(error))),
        };

        scripts.calls.push(MockCall::Register {
            email: email.to_string(),
        });

        scripts
            .register
            .remove(email)
            .unwrap_or_else(|| Script::Ready(Ok(Session::new("mock-token", self.backend))))
            .into_future()
    }

    fn forget_password(&self, email: &str) -> BoxFuture<'static, Result<()>> {
        let mut scripts = match self.lock() {
            Ok(scripts) => scripts,
            Err(error) => return Box::pin(futures::future::ready(Err(error))),
        };

        scripts.calls.push(MockCall::ForgetPassword {
            email: email.to_string(),
        });

        scripts
            .reset
            .remove(email)
            .unwrap_or(Script::Ready(Ok(())))
            .into_future()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripts_are_consumed_once() {
        let provider = MockAuthProvider::new(BackendSelection::Firebase).with_reset_outcome(
            "a@b.com",
            Err(AuthError::provider("auth/user-not-found", "no user")),
        );

        assert!(provider.forget_password("a@b.com").await.is_err());
        assert!(provider.forget_password("a@b.com").await.is_ok());
        assert_eq!(provider.call_count().unwrap(), 2);
    }

    #[tokio::test]
    async fn gated_outcome_waits_for_gate() {
        let provider = MockAuthProvider::new(BackendSelection::Firebase);
        let gate = provider.gate_register("a@b.com", Ok(Session::new("late", BackendSelection::Firebase)));

        let mut pending = provider.register_user("a@b.com", "pw");
        assert!(futures::poll!(&mut pending).is_pending());

        gate.open();
        assert_eq!(pending.await.unwrap().token, "late");
    }

    #[test]
    fn unsupported_operations_are_reported() {
        let provider = MockAuthProvider::new(BackendSelection::Jwt).without(Operation::RequestPasswordReset);
        assert!(provider.supports(Operation::Register));
        assert!(!provider.supports(Operation::RequestPasswordReset));
    }
}
