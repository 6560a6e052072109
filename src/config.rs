//! Configuration types for hn-best-stories

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, time::Duration};

/// Hard ceiling on the number of stories a single request may ask for
pub const MAX_LIMIT: usize = 100;

/// Main configuration
///
/// Fields are organized into logical sub-configs:
/// - [`upstream`](UpstreamConfig) - Hacker News API location and HTTP client settings
/// - [`cache`](CacheConfig) - TTLs and capacity for the ID list and item caches
/// - [`ranking`](RankingConfig) - fan-out bounds for the aggregation pipeline
/// - [`server`](ServerIntegrationConfig) - REST API settings
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream item API settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Aggregation pipeline settings
    #[serde(default)]
    pub ranking: RankingConfig,

    /// API and external server integration
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
            key: None,
        })
    }

    /// Override selected settings from environment variables
    ///
    /// - `HN_BASE_URL` - upstream base URL
    /// - `HN_BIND_ADDRESS` - API bind address (e.g. `0.0.0.0:8080`)
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("HN_BASE_URL") {
            self.upstream.base_url = base_url;
        }

        if let Ok(bind) = std::env::var("HN_BIND_ADDRESS") {
            self.server.api.bind_address = bind.parse().map_err(|e| Error::Config {
                message: format!("invalid bind address '{}': {}", bind, e),
                key: Some("server.api.bind_address".to_string()),
            })?;
        }

        Ok(())
    }

    /// Check the configuration for values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        self.upstream.parsed_base_url()?;

        if self.ranking.max_concurrency == 0 {
            return Err(Error::Config {
                message: "max_concurrency must be at least 1".to_string(),
                key: Some("ranking.max_concurrency".to_string()),
            });
        }

        if self.ranking.max_ids_to_fetch == 0 {
            return Err(Error::Config {
                message: "max_ids_to_fetch must be at least 1".to_string(),
                key: Some("ranking.max_ids_to_fetch".to_string()),
            });
        }

        if !(1..=MAX_LIMIT as i64).contains(&self.ranking.default_limit) {
            return Err(Error::Config {
                message: format!("default_limit must be between 1 and {}", MAX_LIMIT),
                key: Some("ranking.default_limit".to_string()),
            });
        }

        if self.server.api.rate_limit.enabled && self.server.api.rate_limit.requests_per_second == 0
        {
            return Err(Error::Config {
                message: "requests_per_second must be at least 1 when rate limiting is enabled"
                    .to_string(),
                key: Some("server.api.rate_limit.requests_per_second".to_string()),
            });
        }

        Ok(())
    }
}

/// Upstream item API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the item API (default: "https://hacker-news.firebaseio.com/v0/")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for a single upstream request (default: 10 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// User-Agent header sent upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl UpstreamConfig {
    /// Parse the base URL, normalizing it to end with `/` so relative joins
    /// keep the version segment.
    pub fn parsed_base_url(&self) -> Result<url::Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }

        let url = url::Url::parse(&raw).map_err(|e| Error::Config {
            message: format!("'{}' is not a valid absolute URL: {}", self.base_url, e),
            key: Some("upstream.base_url".to_string()),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::Config {
                message: format!("unsupported URL scheme '{}'", other),
                key: Some("upstream.base_url".to_string()),
            }),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Cache configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long the best-stories ID list stays fresh (default: 60 seconds)
    #[serde(default = "default_ids_ttl", with = "duration_serde")]
    pub ids_ttl: Duration,

    /// How long an individual item stays fresh (default: 300 seconds)
    #[serde(default = "default_item_ttl", with = "duration_serde")]
    pub item_ttl: Duration,

    /// Maximum number of cached items (None = unbounded)
    #[serde(default)]
    pub max_items: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ids_ttl: default_ids_ttl(),
            item_ttl: default_item_ttl(),
            max_items: None,
        }
    }
}

/// Aggregation pipeline configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Number of leading IDs whose details are fetched (default: 500)
    #[serde(default = "default_max_ids_to_fetch")]
    pub max_ids_to_fetch: usize,

    /// Maximum item fetches in flight at once (default: 20)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Limit used when a request does not specify one (default: 10)
    #[serde(default = "default_limit")]
    pub default_limit: i64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_ids_to_fetch: default_max_ids_to_fetch(),
            max_concurrency: default_max_concurrency(),
            default_limit: default_limit(),
        }
    }
}

/// API and external server integration configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Deadline for a single best-stories request (default: 30 seconds)
    #[serde(default = "default_api_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Enable CORS for browser access (default: false)
    #[serde(default)]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            request_timeout: default_api_request_timeout(),
            cors_enabled: false,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Rate limiting configuration (per client IP token bucket)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Tokens refilled per second per IP (default: 5)
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Burst size (default: 10)
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,

    /// Endpoints exempt from rate limiting
    #[serde(default = "default_exempt_paths")]
    pub exempt_paths: Vec<String>,

    /// IPs exempt from rate limiting
    #[serde(default)]
    pub exempt_ips: Vec<std::net::IpAddr>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: default_requests_per_second(),
            burst_size: default_burst_size(),
            exempt_paths: default_exempt_paths(),
            exempt_ips: Vec::new(),
        }
    }
}

fn default_base_url() -> String {
    "https://hacker-news.firebaseio.com/v0/".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    concat!("hn-best-stories/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_ids_ttl() -> Duration {
    Duration::from_secs(60)
}

fn default_item_ttl() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_max_ids_to_fetch() -> usize {
    500
}

fn default_max_concurrency() -> usize {
    20
}

fn default_limit() -> i64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_api_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_requests_per_second() -> u32 {
    5
}

fn default_burst_size() -> u32 {
    10
}

fn default_exempt_paths() -> Vec<String> {
    vec![
        "/api/v1/health".to_string(),
        "/api/v1/openapi.json".to_string(),
    ]
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
