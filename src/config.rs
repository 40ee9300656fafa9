use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

use crate::error::{Result, WikiError};

pub const DEFAULT_BASE_URL: &str = "https://www.pwnwiki.org";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config::from_env()
});

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Wiki root, without the trailing `/api.php`.
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Upper bound on in-flight page lookups during a batch fetch.
    pub max_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            base_url: get_env_or_default("PWSEARCH_BASE_URL", DEFAULT_BASE_URL),
            user_agent: get_env_or_default("PWSEARCH_USER_AGENT", DEFAULT_USER_AGENT),
            timeout: Duration::from_secs(get_positive_env_or_default(
                "PWSEARCH_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )),
            max_concurrency: get_positive_env_or_default(
                "PWSEARCH_MAX_CONCURRENCY",
                DEFAULT_MAX_CONCURRENCY as u64,
            ) as usize,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(WikiError::InvalidArgument(
                "max_concurrency must be > 0".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(WikiError::InvalidArgument("timeout must be > 0".to_string()));
        }
        if reqwest::Url::parse(&self.base_url).is_err() {
            return Err(WikiError::InvalidArgument(format!(
                "base url is not a valid URL: {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_positive_env_or_default(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => parse_positive(&raw).unwrap_or_else(|| {
            tracing::warn!("ignoring {key}={raw:?}, expected a positive integer");
            default
        }),
        Err(_) => default,
    }
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|v| *v > 0)
}
