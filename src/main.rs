//! Graph App-Only Tutorial - interactive CLI
//!
//! Authenticates with app-only credentials and lists directory users and
//! applications through Microsoft Graph.

#![deny(clippy::all)]

mod auth;
mod config;
mod directory;
mod error;
mod graph;
mod menu;
mod session;

use anyhow::{Context, Result};
use std::io;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use error::{AppError, AuthError};
use menu::CommandLoop;

/// Log level used until configuration is available.
const FALLBACK_LOG_LEVEL: &str = "warn";

fn main() -> ExitCode {
    // Load .env.local / .env before anything else reads the environment
    config::load_env_files();

    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            init_logging(FALLBACK_LOG_LEVEL);
            error!("Failed to load configuration: {}", e);
            eprintln!("{}", e);
            eprintln!("\nPlease set the following environment variables (or add them to .env):");
            eprintln!("  AZURE_CLIENT_ID=<your-app-registration-client-id>");
            eprintln!("  AZURE_TENANT_ID=<your-tenant-id>");
            eprintln!("  AZURE_CLIENT_SECRET=<your-client-secret>");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging.level);
    info!("Starting {} v{}", config.app.name, config.app.version);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            if let Some(hint) = user_hint(&e) {
                eprintln!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing/logging. Logs go to stderr; stdout belongs to the menu.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

/// Bootstrap the session and run the menu until the user exits.
fn run(config: &Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    println!("{}", config.app.name);
    println!();

    let session = runtime.block_on(session::initialize(config))?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    runtime.block_on(
        CommandLoop::new(&session)
            .exit_on_error(config.menu.exit_on_error)
            .run(stdin.lock(), &mut stdout),
    )?;

    info!("Exiting");
    Ok(())
}

/// The first user-facing hint found in the error chain. Loop failures carry
/// an [`AppError`]; bootstrap failures carry the [`AuthError`] from the first
/// token request.
fn user_hint(err: &anyhow::Error) -> Option<&str> {
    err.chain().find_map(|cause| {
        cause
            .downcast_ref::<AppError>()
            .map(AppError::user_message)
            .or_else(|| cause.downcast_ref::<AuthError>().map(AuthError::user_message))
    })
}
