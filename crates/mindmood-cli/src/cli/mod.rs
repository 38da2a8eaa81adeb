//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use mindmood_core::config::Config;
use mindmood_core::logging;
use mindmood_core::supabase::SupabaseClient;

mod commands;

#[derive(Parser)]
#[command(name = "mindmood")]
#[command(version)]
#[command(about = "MindMood account sign-in")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in (or create an account) without the interactive form
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "MINDMOOD_PASSWORD", hide_env_values = true)]
        password: String,

        /// Create a new account instead of signing in
        #[arg(long = "sign-up")]
        sign_up: bool,
    },

    /// Sign out and forget the saved session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Send a password recovery email
    ResetPassword {
        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("load config")?;

    // Held for the whole run; dropping it flushes the log file
    let _log_guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Warning: file logging disabled: {e:#}");
            None
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "mindmood starting");

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli, config).await })
}

async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let Some(command) = cli.command else {
        let client = build_client(&config)?;
        return commands::signin::run(&client, &config).await;
    };

    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },

        Commands::Login {
            email,
            password,
            sign_up,
        } => {
            let client = build_client(&config)?;
            commands::auth::login(&client, &email, &password, sign_up).await
        }
        Commands::Logout => commands::auth::logout(&build_client(&config)?).await,
        Commands::Whoami => commands::auth::whoami(&build_client(&config)?).await,
        Commands::ResetPassword { email } => {
            commands::auth::reset_password(&build_client(&config)?, &email).await
        }
    }
}

/// Builds the backend client. Fails fast when a secret is missing.
fn build_client(config: &Config) -> Result<SupabaseClient> {
    let supabase = config
        .supabase_config()
        .context("backend is not configured (set SUPABASE_URL and SUPABASE_ANON_KEY)")?;
    SupabaseClient::new(&supabase).context("create backend client")
}
