//! hn-best-stories server binary
//!
//! Usage: `hn-best-stories [config.json]`
//!
//! Without a path the built-in defaults are used. `HN_BASE_URL` and
//! `HN_BIND_ADDRESS` override the file; `RUST_LOG` controls log output.

use hn_best_stories::{Config, run_with_shutdown};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(path = %path, "Loading configuration");
            Config::from_file(&path)?
        }
        None => Config::default(),
    };
    config.apply_env_overrides()?;

    if let Err(e) = run_with_shutdown(config).await {
        tracing::error!(error = %e, "Server exited with error");
        return Err(e.into());
    }

    Ok(())
}
