use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: Server,
    pub db: Db,
    pub workers: Workers,
    pub delivery: Delivery,
    pub queues: Queues,
    pub observability: Observability,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Db {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Workers {
    pub count: usize,
    pub poll_interval_ms: u64,
    pub batch_size: u32,
    pub lease_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Delivery {
    /// Timeout for a single async delivery request.
    pub request_timeout_ms: u64,
    /// Hard timeout for a sync call made inside a business transaction.
    pub sync_timeout_ms: u64,
    pub max_retries: u8,
    pub retry_backoff_seconds: u64,
    pub backoff_max_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Queues {
    pub default: String,
    pub checkout_events: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Observability {
    pub service_name: String,
    pub enable_metrics: bool,
    pub log_filter: String,
}

/// Load settings from `config/default.toml`, `config/<env>.toml`, and env overrides.
pub fn load() -> Result<Settings, config::ConfigError> {
    let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
    config::Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{env_name}")).required(false))
        .add_source(config::Environment::with_prefix("HOOKRELAY").separator("__"))
        .build()?
        .try_deserialize()
}
