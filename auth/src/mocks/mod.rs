//! Mock implementations for testing.
//!
//! Deterministic, in-memory stand-ins for the auth backends. Enabled by the
//! `test-utils` feature (on by default).

pub mod provider;

pub use provider::{MockAuthProvider, MockCall, MockGate};
