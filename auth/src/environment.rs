//! Authentication environment.
//!
//! Dependencies injected into the auth reducers.

use crate::config::AuthConfig;
use crate::selector::BackendSelector;

/// Authentication environment.
#[derive(Debug, Clone, Default)]
pub struct AuthEnvironment {
    /// Backend selector every operation goes through.
    pub selector: BackendSelector,
}

impl AuthEnvironment {
    /// Create a new environment.
    #[must_use]
    pub const fn new(selector: BackendSelector) -> Self {
        Self { selector }
    }

    /// Environment for the configured backend.
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(BackendSelector::from_config(config))
    }
}
