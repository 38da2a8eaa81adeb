//! Full-screen sign-in form for MindMood.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};
use std::time::Duration;

use anyhow::Result;
pub use features::signin;
use mindmood_core::supabase::{Session, SupabaseClient};
pub use runtime::TuiRuntime;

/// How the form was left.
#[derive(Debug)]
pub enum SignInOutcome {
    SignedIn(Session),
    Cancelled,
}

/// Runs the sign-in form until the user authenticates or backs out.
///
/// Must be called from within a tokio runtime; requests are spawned on it.
///
/// # Errors
/// Returns an error if stderr is not a terminal or terminal I/O fails.
pub fn run_sign_in(
    client: SupabaseClient,
    submit_timeout: Option<Duration>,
) -> Result<SignInOutcome> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The sign-in form requires a terminal.\n\
             Use `mindmood login --email <EMAIL> --password <PASSWORD>` instead."
        );
    }

    let mut runtime = TuiRuntime::new(client, submit_timeout)?;
    let session = runtime.run()?;
    drop(runtime);

    Ok(session.map_or(SignInOutcome::Cancelled, SignInOutcome::SignedIn))
}
