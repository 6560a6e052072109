//! Application state for the API server

use crate::Config;
use crate::aggregator::StoryAggregator;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone).
#[derive(Clone)]
pub struct AppState {
    /// Ranking pipeline serving the stories route
    pub aggregator: Arc<StoryAggregator>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(aggregator: Arc<StoryAggregator>, config: Arc<Config>) -> Self {
        Self { aggregator, config }
    }
}
