//! Non-interactive account commands.

use anyhow::{Context, Result};
use mindmood_core::supabase::{
    AuthError, AuthMode, AuthOutcome, Session, SupabaseClient, mask_token,
};
use mindmood_core::validation;

pub async fn login(
    client: &SupabaseClient,
    email: &str,
    password: &str,
    sign_up: bool,
) -> Result<()> {
    let errors = validation::validate_credentials(email, password);
    if !errors.is_empty() {
        anyhow::bail!("{errors}");
    }

    let mode = if sign_up {
        AuthMode::SignUp
    } else {
        AuthMode::SignIn
    };
    let action = match mode {
        AuthMode::SignIn => "sign in failed",
        AuthMode::SignUp => "sign up failed",
    };

    let outcome = client
        .authenticate(email, password, mode)
        .await
        .map_err(AuthError::from)
        .context(action)?;

    match outcome {
        AuthOutcome::SignedIn(session) => print_signed_in(&session),
        AuthOutcome::ConfirmationRequired { email } => {
            println!("Account created. Check {email} for a confirmation link, then sign in.");
        }
    }
    Ok(())
}

pub async fn logout(client: &SupabaseClient) -> Result<()> {
    if client.sign_out().await.context("sign out")? {
        println!("✓ Signed out");
    } else {
        println!("Not signed in (no saved session found).");
    }
    Ok(())
}

pub async fn whoami(client: &SupabaseClient) -> Result<()> {
    let Some(session) = client.current_session().await.context("load session")? else {
        println!("Not signed in.");
        return Ok(());
    };

    let user = client.user().await.context("fetch account")?;
    println!("Email:   {}", user.email.as_deref().unwrap_or("(none)"));
    println!("User ID: {}", user.id);
    println!("Token:   {}", mask_token(&session.access_token));
    if let Some(expires) = session.expires_at_time() {
        println!("Expires: {}", expires.to_rfc3339());
    }
    Ok(())
}

pub async fn reset_password(client: &SupabaseClient, email: &str) -> Result<()> {
    if let Some(error) = validation::validate_email(email) {
        anyhow::bail!("{}", error.message(validation::Field::Email));
    }

    client
        .reset_password_for_email(email)
        .await
        .map_err(AuthError::from)
        .context("password reset failed")?;

    println!("Password reset instructions sent to {email}.");
    Ok(())
}

pub fn print_signed_in(session: &Session) {
    let who = session
        .user
        .email
        .clone()
        .unwrap_or_else(|| session.user.id.to_string());
    println!("✓ Signed in as {who}");
}
