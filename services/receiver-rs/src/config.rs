use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Receiver settings. Defaults are the fixed values the fixture always ran with.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub concurrency_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            concurrency_limit: 32,
        }
    }
}

impl Config {
    // Config aus ENV: RECEIVER_HOST, RECEIVER_PORT, RECEIVER_CONCURRENCY_LIMIT
    pub fn load() -> Self {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Env::prefixed("RECEIVER_")),
        )
    }

    pub fn from_figment(figment: Figment) -> Self {
        figment.extract().unwrap_or_else(|e| {
            warn!("Invalid receiver config, using defaults: {}", e);
            Config::default()
        })
    }

    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

/// `RUST_LOG` directives, `info` when unset or unparsable.
pub fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
