//! Runtime configuration, read from the environment (and `.env` via dotenv).

use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

/// How long callers may cache a response.
pub const DEFAULT_TTL_SECS: u64 = 60;
pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

pub const TTL_ENV: &str = "CIDR_SUBNET_TTL_SECS";
pub const LOG_CONFIG_ENV: &str = "CIDR_SUBNET_LOG_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TTL stamped on every response.
    pub ttl: Duration,
    /// log4rs config file for the binary.
    pub log_config: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            log_config: PathBuf::from(DEFAULT_LOG_CONFIG),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, Box<dyn Error>> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, Box<dyn Error>> {
        let mut config = Config::default();
        if let Some(ttl) = lookup(TTL_ENV) {
            let secs: u64 = ttl
                .trim()
                .parse()
                .map_err(|e| format!("Invalid {TTL_ENV}={ttl}: {e}"))?;
            config.ttl = Duration::from_secs(secs);
        }
        if let Some(path) = lookup(LOG_CONFIG_ENV) {
            if path.trim().is_empty() {
                return Err(format!("{LOG_CONFIG_ENV} must not be empty").into());
            }
            config.log_config = PathBuf::from(path);
        }
        log::debug!("config: {config:?}");
        Ok(config)
    }
}
