//! Fake provider used when no real backend is configured.
//!
//! Implements nothing: every operation is unsupported.

use super::{AuthProvider, Operation};
use crate::config::BackendSelection;

/// Fake provider.
#[derive(Debug, Clone, Default)]
pub struct FakeProvider {
    _private: (),
}

impl FakeProvider {
    /// Create a new fake provider.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl AuthProvider for FakeProvider {
    fn backend(&self) -> BackendSelection {
        BackendSelection::Mock
    }

    fn supports(&self, _operation: Operation) -> bool {
        false
    }
}
