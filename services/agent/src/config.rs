use serde::Deserialize;

fn default_orchestrator() -> String {
    "http://localhost:8080".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_push_retries() -> u32 {
    5
}

fn default_push_retry_delay_ms() -> u64 {
    500
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Number of concurrent workers. Required: startup fails without it.
    pub computing_power: usize,

    #[serde(default = "default_orchestrator")]
    pub orchestrator: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_push_retries")]
    pub push_retries: u32,

    #[serde(default = "default_push_retry_delay_ms")]
    pub push_retry_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ::config::ConfigError> {
        ::config::Config::builder()
            .add_source(::config::Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }
}
