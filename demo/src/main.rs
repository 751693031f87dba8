//! Dashboard auth demo binary
//!
//! Walks through the auth flow against whatever backend
//! `DASHBOARD_AUTH_BACKEND` selects (`firebase`, `jwt`, anything else: mock).
//!
//! ```text
//! DASHBOARD_AUTH_BACKEND=firebase cargo run -p dashboard-demo
//! ```

use anyhow::Context;
use dashboard_sync_auth::{
    AuthAction, AuthClient, AuthConfig, AuthState, Credentials, Guarded, MemorySessionStore,
    RouteGuard, Session, SessionStore,
};
use dashboard_sync_core::lifecycle::Transition;
use tokio::sync::broadcast;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EFFECT_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dashboard_demo=info,dashboard_sync_auth=debug,dashboard_sync_runtime=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AuthConfig::process();
    tracing::info!(backend = %config.backend, "Starting dashboard auth demo");

    println!("=== Dashboard Auth Demo (backend: {}) ===\n", config.backend);

    let client = AuthClient::from_config(config);
    let sessions = MemorySessionStore::new();
    let guard = RouteGuard::new(sessions.clone(), config);

    // Protected route before any session exists
    println!(">>> Visiting /orders without a session");
    print_route(&guard);

    // Registration
    println!("\n>>> Registering a@b.com");
    let mut transitions = client.subscribe();
    let mut handle = client
        .invoke_register(Credentials::new("a@b.com", "correct horse battery staple"))
        .await
        .context("store rejected registration")?;
    handle
        .wait_with_timeout(EFFECT_TIMEOUT)
        .await
        .context("registration did not settle")?;
    print_registration(&client.state().await);

    // The auth layer does not persist sessions; hand the issued token over here
    match issued_session(&mut transitions) {
        Some(session) if session.token.is_empty() => {
            println!("The {} backend issued an empty token", session.backend);
            sessions.write(&config.session_key, &session.token);
        },
        Some(session) => sessions.write(&config.session_key, &session.token),
        None => println!("No session issued"),
    }

    println!("\n>>> Visiting /orders again");
    print_route(&guard);

    // Password reset
    println!("\n>>> Requesting a password reset for a@b.com");
    let mut handle = client
        .invoke_forget_password("a@b.com")
        .await
        .context("store rejected password reset")?;
    handle
        .wait_with_timeout(EFFECT_TIMEOUT)
        .await
        .context("password reset did not settle")?;
    print_password_reset(&client.state().await);

    // Resets
    println!("\n>>> Clearing both outcomes");
    client.reset_registration_flag().await?;
    client.reset_forget_password().await?;
    let state = client.state().await;
    println!("State after reset: {state:?}");

    // Logout is observed on the very next check
    sessions.remove(&config.session_key);
    println!("\n>>> Visiting /orders after logout");
    print_route(&guard);

    client
        .store()
        .shutdown_default()
        .await
        .context("effects still running at shutdown")?;

    println!("\n=== Demo Complete ===");
    Ok(())
}

/// Session carried by the registration success transition, if any arrived
fn issued_session(transitions: &mut broadcast::Receiver<AuthAction>) -> Option<Session> {
    let mut issued = None;
    while let Ok(action) = transitions.try_recv() {
        if let AuthAction::Registration(Transition::Succeeded(session)) = action {
            issued = Some(session);
        }
    }
    issued
}

fn print_route(guard: &RouteGuard<MemorySessionStore>) {
    match guard.guard(|| "<orders table>") {
        Guarded::Rendered(page) => println!("Rendered {page}"),
        Guarded::Redirect(to) => println!("Redirected to {to}"),
    }
}

fn print_registration(state: &AuthState) {
    println!("Registration phase: {:?}", state.registration_phase);
    match &state.registration_error {
        Some(error) => println!("Registration error: {error}"),
        None if state.registration_success => println!("Registration succeeded"),
        None => {},
    }
}

fn print_password_reset(state: &AuthState) {
    println!("Password reset phase: {:?}", state.forget_password_phase);
    if let Some(message) = &state.forget_password_message {
        println!("Message: {message}");
    }
    if let Some(error) = &state.forget_password_error {
        println!("Password reset error: {error}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dashboard_sync_auth::BackendSelection;

    #[test]
    fn issued_session_comes_from_the_success_transition() {
        let (tx, mut rx) = broadcast::channel(8);
        tx.send(AuthAction::Registration(Transition::Pending)).unwrap();
        tx.send(AuthAction::Registration(Transition::Succeeded(Session::new(
            "tok123",
            BackendSelection::Firebase,
        ))))
        .unwrap();

        let session = issued_session(&mut rx).unwrap();
        assert_eq!(session.token, "tok123");
    }

    #[test]
    fn no_session_without_success() {
        let (tx, mut rx) = broadcast::channel(8);
        tx.send(AuthAction::Registration(Transition::Pending)).unwrap();
        assert!(issued_session(&mut rx).is_none());
    }
}
