//! GoBarber CLI - a command-line client for the GoBarber scheduling API.
//!
//! Signs in, keeps the session between runs, and exposes the account flows
//! (registration, password recovery, profile edits) from the terminal.

mod app;
mod prompt;
mod routes;

use std::io;

use anyhow::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use gobarber_core::Config;

// ============================================================================
// Constants
// ============================================================================

/// Log file name prefix inside the cache directory
const LOG_FILE_NAME: &str = "gobarber.log";

const USAGE: &str = "\
Usage: gobarber <command>

Commands:
  login                    Sign in and remember the session
  logout                   Forget the session
  whoami                   Show the signed-in user
  open <path>              Show a page (e.g. /dashboard, /profile)
  signup                   Create an account
  forgot-password [email]  Request a password reset e-mail
  reset-password <token>   Set a new password from a reset link or token
  profile                  Edit name, e-mail or password
  avatar <file>            Upload a new avatar image";

/// Initialize the tracing subscriber for logging.
///
/// The returned guard flushes the log file on drop and must outlive `main`'s work.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let mut guard = None;
    let file_layer = if config.log_to_file {
        match config.cache_dir() {
            Ok(dir) => {
                let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
                let (writer, worker_guard) = tracing_appender::non_blocking(appender);
                guard = Some(worker_guard);
                Some(fmt::layer().with_ansi(false).with_writer(writer))
            }
            Err(e) => {
                eprintln!("File logging disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let (config, config_error) = match Config::load() {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let log_guard = init_tracing(&config);
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }
    info!("GoBarber CLI starting");

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str);
    let argument = args.get(2).map(String::as_str);

    if matches!(command, Some("help" | "--help" | "-h")) {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut app = App::new(config)?;

    let result = match (command, argument) {
        (None | Some("whoami"), _) => {
            app.whoami();
            Ok(())
        }
        (Some("login"), _) => app.login().await,
        (Some("logout"), _) => {
            app.logout();
            Ok(())
        }
        (Some("open"), path) => {
            app.open(path.unwrap_or("/dashboard"));
            Ok(())
        }
        (Some("signup"), _) => app.sign_up().await,
        (Some("forgot-password"), email) => app.forgot_password(email).await,
        (Some("reset-password"), token) => app.reset_password(token).await,
        (Some("profile"), _) => app.edit_profile().await,
        (Some("avatar"), Some(file)) => app.upload_avatar(file).await,
        (Some("avatar"), None) => Err(anyhow::anyhow!("Missing image file\n\n{}", USAGE)),
        (Some(other), _) => Err(anyhow::anyhow!("Unknown command: {}\n\n{}", other, USAGE)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        drop(log_guard);
        std::process::exit(1);
    }

    drop(log_guard);
    Ok(())
}
