//! Upstream item source
//!
//! The [`ItemSource`] trait is the seam between the ranking pipeline and the
//! upstream item API. Every lookup resolves to a [`Fetched`](crate::types::Fetched)
//! outcome: transport failures and missing items are absorbed here as
//! `Absent`, cancellation is passed through as `Cancelled`.
//!
//! - [`HackerNewsSource`]: reqwest client against the Hacker News Firebase API,
//!   caching the best-stories ID list and individual items with separate TTLs
//!
//! ## Usage
//!
//! ```no_run
//! use hn_best_stories::config::Config;
//! use hn_best_stories::source::{HackerNewsSource, ItemSource};
//! use hn_best_stories::types::Fetched;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let source = HackerNewsSource::new(&config.upstream, &config.cache)?;
//!     let cancel = CancellationToken::new();
//!
//!     if let Fetched::Found(ids) = source.best_ids(&cancel).await {
//!         println!("{} candidate stories", ids.len());
//!     }
//!     Ok(())
//! }
//! ```

mod http;
mod traits;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

pub use http::HackerNewsSource;
pub use traits::ItemSource;
