use std::future::Future;
use std::time::Duration;

use mindmood_core::supabase::{AuthError, AuthMode, SupabaseClient};
use tokio::time;

use crate::events::UiEvent;

/// Shown when a request outlives the submit timeout.
pub const TIMEOUT_MESSAGE: &str = "The server took too long to respond";

/// Signs in or registers.
///
/// Pure async function - runtime spawns and sends result to inbox.
pub async fn authenticate(
    client: SupabaseClient,
    email: String,
    password: String,
    mode: AuthMode,
    timeout: Option<Duration>,
) -> UiEvent {
    let result = with_timeout(timeout, async {
        client
            .authenticate(&email, &password, mode)
            .await
            .map_err(AuthError::from)
    })
    .await;

    if let Err(error) = &result {
        tracing::warn!(?mode, error = error.message(), "authentication failed");
    }
    UiEvent::AuthResult(result)
}

/// Requests a recovery email.
///
/// Pure async function - runtime spawns and sends result to inbox.
pub async fn password_reset(
    client: SupabaseClient,
    email: String,
    timeout: Option<Duration>,
) -> UiEvent {
    let result = with_timeout(timeout, async {
        client
            .reset_password_for_email(&email)
            .await
            .map_err(AuthError::from)
    })
    .await;

    if let Err(error) = &result {
        tracing::warn!(error = error.message(), "password reset failed");
    }
    UiEvent::PasswordResetResult { email, result }
}

async fn with_timeout<T>(
    limit: Option<Duration>,
    fut: impl Future<Output = Result<T, AuthError>>,
) -> Result<T, AuthError> {
    match limit {
        Some(limit) => time::timeout(limit, fut)
            .await
            .unwrap_or_else(|_elapsed| Err(AuthError::Unreachable(TIMEOUT_MESSAGE.to_string()))),
        None => fut.await,
    }
}
