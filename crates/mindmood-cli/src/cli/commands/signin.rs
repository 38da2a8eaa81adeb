//! Interactive sign-in form.

use anyhow::{Context, Result};
use mindmood_core::config::Config;
use mindmood_core::supabase::SupabaseClient;

use super::auth::print_signed_in;

pub async fn run(client: &SupabaseClient, config: &Config) -> Result<()> {
    if let Some(session) = client.current_session().await.context("load session")? {
        print_signed_in(&session);
        println!("Run `mindmood logout` to switch accounts.");
        return Ok(());
    }

    run_form(client, config)
}

#[cfg(feature = "tui")]
fn run_form(client: &SupabaseClient, config: &Config) -> Result<()> {
    use mindmood_tui::SignInOutcome;

    let outcome = mindmood_tui::run_sign_in(client.clone(), config.submit_timeout())
        .context("sign-in form failed")?;

    match outcome {
        SignInOutcome::SignedIn(session) => print_signed_in(&session),
        SignInOutcome::Cancelled => println!("Sign-in cancelled."),
    }
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_form(_client: &SupabaseClient, _config: &Config) -> Result<()> {
    anyhow::bail!(
        "The sign-in form is disabled in this build (feature \"tui\").\n\
         Use `mindmood login --email <EMAIL> --password <PASSWORD>` instead."
    );
}
