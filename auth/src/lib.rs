//! # Dashboard Sync Authentication
//!
//! Authentication state for the dashboard: backend selection, the
//! registration and password reset lifecycles, and the route access guard.
//!
//! ## Features
//!
//! - **Pluggable backends**: Firebase, JWT or a fake, chosen once by config
//! - **Lifecycle state**: `Pending → Succeeded | Failed` per operation family
//! - **No escaped errors**: backend failures, unsupported operations and
//!   panics all become state the UI renders
//! - **Route guard**: synchronous session check, redirect to login
//!
//! ## Architecture
//!
//! Authentication is implemented as reducers and effects:
//!
//! ```text
//! UI intent → AuthClient → Store queue → AuthReducer → lifecycle effect
//!                                ▲                          │
//!                                │      BackendSelector → AuthProvider
//!                                └───── Pending, then Succeeded | Failed
//! ```
//!
//! ## Example: Registration
//!
//! ```rust,ignore
//! use dashboard_sync_auth::*;
//!
//! let client = AuthClient::from_config(AuthConfig::process());
//!
//! let mut handle = client
//!     .invoke_register(Credentials::new("a@b.com", "hunter2"))
//!     .await?;
//! handle.wait().await;
//!
//! let state = client.state().await;
//! if let Some(error) = state.registration_error {
//!     println!("registration failed: {error}");
//! }
//!
//! // Protected route
//! let guard = RouteGuard::new(session_store, AuthConfig::process());
//! match guard.guard(|| render_dashboard()) {
//!     Guarded::Rendered(page) => page,
//!     Guarded::Redirect(to) => redirect(&to),
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod client;
pub mod config;
pub mod environment;
pub mod error;
pub mod guard;
pub mod providers;
pub mod reducers;
pub mod selector;
pub mod session_store;
pub mod state;

// Mock implementations (for testing)
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use actions::AuthAction;
pub use client::{AuthClient, AuthStore};
pub use config::{AuthConfig, BackendSelection};
pub use environment::AuthEnvironment;
pub use error::{AuthError, Result};
pub use guard::{GuardDecision, Guarded, RouteGuard};
pub use providers::{AuthProvider, Operation};
pub use reducers::AuthReducer;
pub use selector::BackendSelector;
pub use session_store::{MemorySessionStore, SessionReader, SessionStore};
pub use state::{AuthState, Credentials, ErrorDetail, ErrorKind, Session};
