use std::time::Duration;

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub refresh_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5003,
            refresh_secs: 5,
        }
    }
}

impl Config {
    // Config aus ENV: EMULATOR_HOST, EMULATOR_PORT, EMULATOR_REFRESH_SECS
    pub fn load() -> Self {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Env::prefixed("EMULATOR_")),
        )
    }

    pub fn from_figment(figment: Figment) -> Self {
        figment.extract().unwrap_or_else(|e| {
            warn!("Invalid emulator config, using defaults: {}", e);
            Config::default()
        })
    }

    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    /// Never zero; tokio intervals panic on a zero period.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }
}

/// `RUST_LOG` directives, `info` when unset or unparsable.
pub fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
