//! Authentication configuration.
//!
//! The backend selection is process-wide and read once. Everything else has a
//! sensible default so an empty environment yields a working (mock) setup.
//!
//! | variable | values | default |
//! |----------|--------|---------|
//! | `DASHBOARD_AUTH_BACKEND` | `firebase`, `jwt`, anything else | mock |
//! | `DASHBOARD_LOGIN_PATH` | route path | `/login` |
//! | `DASHBOARD_SESSION_KEY` | session store key | `auth` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Environment variable selecting the backend.
pub const BACKEND_ENV: &str = "DASHBOARD_AUTH_BACKEND";

/// Environment variable overriding the login route.
pub const LOGIN_PATH_ENV: &str = "DASHBOARD_LOGIN_PATH";

/// Environment variable overriding the session key.
pub const SESSION_KEY_ENV: &str = "DASHBOARD_SESSION_KEY";

/// Route unauthenticated users are sent to.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Session store key holding the auth token.
pub const DEFAULT_SESSION_KEY: &str = "auth";

/// Which authentication backend the process talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendSelection {
    /// Firebase Authentication.
    Firebase,

    /// Self-hosted JWT server.
    Jwt,

    /// In-process fake backend. Implements nothing.
    #[default]
    Mock,
}

impl BackendSelection {
    /// Parse a configuration value.
    ///
    /// Matching ignores surrounding whitespace and ASCII case. Anything
    /// unrecognized, including an absent value, selects [`Self::Mock`].
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("firebase") => Self::Firebase,
            Some("jwt") => Self::Jwt,
            _ => Self::Mock,
        }
    }

    /// Configuration spelling of this selection.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Firebase => "firebase",
            Self::Jwt => "jwt",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for BackendSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Selected backend. Immutable once read.
    pub backend: BackendSelection,

    /// Route the guard redirects to.
    ///
    /// Default: `/login`
    pub login_path: String,

    /// Session store key the guard reads.
    ///
    /// Default: `auth`
    pub session_key: String,
}

impl AuthConfig {
    /// Create configuration for a backend with default paths.
    #[must_use]
    pub fn new(backend: BackendSelection) -> Self {
        Self {
            backend,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }

    /// Set the login route.
    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Set the session key.
    #[must_use]
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Empty values fall back to defaults.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = Self {
            backend: BackendSelection::parse(lookup(BACKEND_ENV).as_deref()),
            login_path: non_empty(LOGIN_PATH_ENV)
                .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string()),
            session_key: non_empty(SESSION_KEY_ENV)
                .unwrap_or_else(|| DEFAULT_SESSION_KEY.to_string()),
        };

        tracing::debug!(
            backend = %config.backend,
            login_path = %config.login_path,
            session_key = %config.session_key,
            "Loaded auth configuration"
        );

        config
    }

    /// Process-wide configuration.
    ///
    /// Read from the environment on first call and never again, so the backend
    /// selection cannot change mid-operation.
    pub fn process() -> &'static Self {
        static CONFIG: OnceLock<AuthConfig> = OnceLock::new();
        CONFIG.get_or_init(Self::from_env)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(BackendSelection::default())
    }
}
