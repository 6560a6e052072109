//! # hn-best-stories
//!
//! Serves the highest-scored Hacker News stories over a small REST API.
//!
//! ## Design Philosophy
//!
//! hn-best-stories is designed to be:
//! - **Gentle on upstream** - ID list and items are cached with separate TTLs
//!   and item lookups run with bounded concurrency
//! - **Degrading, not failing** - a missing or broken item is skipped, an
//!   unreachable upstream yields an empty list
//! - **Cancellable** - every request carries a deadline that stops
//!   outstanding lookups
//!
//! ## Quick Start
//!
//! ```no_run
//! use hn_best_stories::{Config, HackerNewsSource, StoryAggregator};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let source = Arc::new(HackerNewsSource::new(&config.upstream, &config.cache)?);
//!     let aggregator = StoryAggregator::new(source, config.ranking.clone());
//!
//!     for story in aggregator.best_stories(10, &CancellationToken::new()).await? {
//!         println!("{:>5} {}", story.score_or_zero(), story.title.unwrap_or_default());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Best-stories ranking pipeline
pub mod aggregator;
/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Upstream item sources
pub mod source;
/// Core types
pub mod types;

use std::sync::Arc;

// Re-export commonly used types
pub use aggregator::{StoryAggregator, rank_stories, validate_limit};
pub use config::{Config, MAX_LIMIT};
pub use error::{ApiError, Error, ErrorDetail, Result, ToHttpStatus};
pub use source::{HackerNewsSource, ItemSource};
pub use types::{Fetched, Item, ItemId, StoryView};

/// Build the service from `config` and serve the API until a termination signal.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Example
///
/// ```no_run
/// use hn_best_stories::{Config, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_with_shutdown(Config::default()).await?;
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(config: Config) -> Result<()> {
    config.validate()?;

    let source = Arc::new(HackerNewsSource::new(&config.upstream, &config.cache)?);
    tracing::info!(
        source = source.name(),
        base_url = %source.base_url(),
        "Item source ready"
    );

    let aggregator = Arc::new(StoryAggregator::new(source, config.ranking.clone()));

    api::start_api_server(aggregator, Arc::new(config), wait_for_signal()).await
}

/// Resolve once the process receives a termination signal
#[cfg(unix)]
pub async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

/// Resolve once the process receives Ctrl+C
#[cfg(not(unix))]
pub async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
