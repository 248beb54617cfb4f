//! API configuration
//!
//! Settings come from `BILLING_`-prefixed environment variables, falling back
//! to the defaults below. `BILLING_NOTIFICATION_QUEUES` is a comma separated
//! list.

use serde::Deserialize;

use infra_queue::DEFAULT_QUEUE;

const ENV_PREFIX: &str = "BILLING";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Deployment environment name, only reported in logs
    pub environment: String,
    /// Database URL
    pub database_url: String,
    /// Upper bound on pooled database connections
    pub db_max_connections: u32,
    /// Redis URL; notifications are disabled when unset
    pub redis_url: Option<String>,
    /// Queues that receive every bill notification
    pub notification_queues: Vec<String>,
    /// Log level, overridden by `RUST_LOG`
    pub log_level: String,
    /// Log format
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50051,
            environment: "development".to_string(),
            database_url: "postgres://localhost/billing".to_string(),
            db_max_connections: 10,
            redis_url: None,
            notification_queues: vec![DEFAULT_QUEUE.to_string()],
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::load(None)
    }

    /// Loads configuration from an explicit set of variables instead of the
    /// process environment
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<config::Map<String, String>>();
        Self::load(Some(map))
    }

    fn load(vars: Option<config::Map<String, String>>) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port as i64)?
            .set_default("environment", defaults.environment)?
            .set_default("database_url", defaults.database_url)?
            .set_default("db_max_connections", defaults.db_max_connections as i64)?
            .set_default("notification_queues", defaults.notification_queues)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_format", "pretty")?
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("notification_queues")
                    .source(vars),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The Redis URL, treating an empty value as unset
    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
