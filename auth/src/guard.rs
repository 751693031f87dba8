//! Route access guard.
//!
//! A synchronous, stateless predicate over session presence. The session
//! store is read on every call, so a logout is observed on the next render.
//!
//! The token is not validated: any non-empty value renders the route.

use crate::config::AuthConfig;
use crate::session_store::SessionReader;

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the protected content.
    Render,
    /// Send the user elsewhere without rendering.
    Redirect {
        /// Target route
        to: String,
    },
}

/// Result of [`RouteGuard::guard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    /// The render closure ran and produced this.
    Rendered(T),
    /// The render closure did not run; redirect to this route.
    Redirect(String),
}

/// Gate for protected routes.
#[derive(Debug, Clone)]
pub struct RouteGuard<R> {
    reader: R,
    session_key: String,
    login_path: String,
}

impl<R: SessionReader> RouteGuard<R> {
    /// Create a guard using the configured session key and login path.
    #[must_use]
    pub fn new(reader: R, config: &AuthConfig) -> Self {
        Self {
            reader,
            session_key: config.session_key.clone(),
            login_path: config.login_path.clone(),
        }
    }

    /// Create a guard with the default `auth` key and `/login` route.
    #[must_use]
    pub fn with_defaults(reader: R) -> Self {
        Self::new(reader, &AuthConfig::default())
    }

    /// Whether a non-empty session value is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.reader
            .read(&self.session_key)
            .is_some_and(|token| !token.is_empty())
    }

    /// Decide whether the protected route may render.
    #[must_use]
    pub fn check(&self) -> GuardDecision {
        if self.is_authenticated() {
            GuardDecision::Render
        } else {
            tracing::debug!(to = %self.login_path, "No session, redirecting");
            GuardDecision::Redirect {
                to: self.login_path.clone(),
            }
        }
    }

    /// Run `render` only if the route may render.
    pub fn guard<T, F>(&self, render: F) -> Guarded<T>
    where
        F: FnOnce() -> T,
    {
        match self.check() {
            GuardDecision::Render => Guarded::Rendered(render()),
            GuardDecision::Redirect { to } => Guarded::Redirect(to),
        }
    }
}
