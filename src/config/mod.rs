//! Runtime configuration.
//!
//! Everything is read from environment variables with development
//! defaults. `Config::from_env` validates values up front so the binaries
//! fail at start-up rather than on first use.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use crate::fetcher::DEFAULT_MODEL_TYPE;

pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_LNK_API_BASE: &str = "LNK_API_BASE";
pub const ENV_CACHE_EXPIRY_SECS: &str = "CACHE_EXPIRY_SECS";
pub const ENV_CLEANUP_INTERVAL_SECS: &str = "CLEANUP_INTERVAL_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
pub const ENV_DEFAULT_MODEL_TYPE: &str = "DEFAULT_MODEL_TYPE";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_LNK_API_BASE: &str = "https://lnk.az";
const DEFAULT_CACHE_EXPIRY_SECS: u64 = 24 * 60 * 60;
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60 * 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    database_url: Option<String>,
    api_base: String,
    cache_expiry: Option<Duration>,
    cleanup_interval: Duration,
    request_timeout: Duration,
    default_model_type: String,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = var(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid(ENV_BIND_ADDR, e))?;

        let database_url = var(ENV_DATABASE_URL);
        if let Some(database_url) = &database_url
            && !database_url.starts_with("postgres://")
            && !database_url.starts_with("postgresql://")
        {
            return Err(ConfigError::invalid(
                ENV_DATABASE_URL,
                "expected a postgres:// URL",
            ));
        }

        let api_base = var(ENV_LNK_API_BASE).unwrap_or_else(|| DEFAULT_LNK_API_BASE.to_string());
        let parsed = Url::parse(&api_base).map_err(|e| ConfigError::invalid(ENV_LNK_API_BASE, e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(ENV_LNK_API_BASE, "expected an http(s) URL"));
        }

        // 0 disables read-time expiry
        let cache_expiry = match secs(&var, ENV_CACHE_EXPIRY_SECS, DEFAULT_CACHE_EXPIRY_SECS)? {
            0 => None,
            n => Some(Duration::from_secs(n)),
        };

        let cleanup_interval = positive_secs(&var, ENV_CLEANUP_INTERVAL_SECS, DEFAULT_CLEANUP_INTERVAL_SECS)?;
        let request_timeout = positive_secs(&var, ENV_REQUEST_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS)?;

        let default_model_type =
            var(ENV_DEFAULT_MODEL_TYPE).unwrap_or_else(|| DEFAULT_MODEL_TYPE.to_string());

        Ok(Self {
            bind_addr,
            database_url,
            api_base,
            cache_expiry,
            cleanup_interval,
            request_timeout,
            default_model_type,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// PostgreSQL URL; `None` keeps the persistent tier in memory.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// `None` means cached analyses never expire on read.
    pub fn cache_expiry(&self) -> Option<Duration> {
        self.cache_expiry
    }

    pub fn cleanup_interval(&self) -> Duration {
        self.cleanup_interval
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn default_model_type(&self) -> &str {
        &self.default_model_type
    }
}

fn secs<V>(var: &V, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.parse().map_err(|e| ConfigError::invalid(key, e)),
        None => Ok(default),
    }
}

fn positive_secs<V>(var: &V, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    V: Fn(&str) -> Option<String>,
{
    match secs(var, key, default)? {
        0 => Err(ConfigError::invalid(key, "must be greater than zero")),
        n => Ok(Duration::from_secs(n)),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Display) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.to_string(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ALL_KEYS: [&str; 7] = [
        ENV_BIND_ADDR,
        ENV_DATABASE_URL,
        ENV_LNK_API_BASE,
        ENV_CACHE_EXPIRY_SECS,
        ENV_CLEANUP_INTERVAL_SECS,
        ENV_REQUEST_TIMEOUT_SECS,
        ENV_DEFAULT_MODEL_TYPE,
    ];

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    fn field_of(err: ConfigError) -> &'static str {
        match err {
            ConfigError::InvalidValue { field, .. } => field,
        }
    }

    #[test]
    fn defaults_when_vars_missing() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.database_url(), None);
        assert_eq!(cfg.api_base(), DEFAULT_LNK_API_BASE);
        assert_eq!(cfg.cache_expiry(), Some(Duration::from_secs(86_400)));
        assert_eq!(cfg.cleanup_interval(), Duration::from_secs(3_600));
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.default_model_type(), "auto");
    }

    #[test]
    fn zero_expiry_means_unbounded() {
        let cfg = load(&[(ENV_CACHE_EXPIRY_SECS, "0")]).unwrap();
        assert_eq!(cfg.cache_expiry(), None);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = load(&[(ENV_DATABASE_URL, "  "), (ENV_BIND_ADDR, "")]).unwrap();
        assert_eq!(cfg.database_url(), None);
        assert_eq!(cfg.bind_addr(), DEFAULT_BIND_ADDR);
    }

    #[test]
    fn rejects_invalid_values() {
        let cases: [(&str, &str); 6] = [
            (ENV_BIND_ADDR, "localhost"),
            (ENV_DATABASE_URL, "mysql://db/x"),
            (ENV_LNK_API_BASE, "ftp://lnk.az"),
            (ENV_CACHE_EXPIRY_SECS, "a day"),
            (ENV_CLEANUP_INTERVAL_SECS, "0"),
            (ENV_REQUEST_TIMEOUT_SECS, "-5"),
        ];

        for (key, value) in cases {
            let err = load(&[(key, value)]).unwrap_err();
            assert_eq!(field_of(err), key, "{key}={value}");
        }
    }

    #[test]
    fn error_display_names_field() {
        let err = load(&[(ENV_CLEANUP_INTERVAL_SECS, "0")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for 'CLEANUP_INTERVAL_SECS': must be greater than zero"
        );
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        for key in ALL_KEYS {
            unsafe {
                env::remove_var(key);
            }
        }
        unsafe {
            env::set_var(ENV_DATABASE_URL, "postgres://user:pw@db:5432/lnk");
            env::set_var(ENV_BIND_ADDR, "0.0.0.0:9000");
            env::set_var(ENV_LNK_API_BASE, "http://127.0.0.1:4000");
            env::set_var(ENV_REQUEST_TIMEOUT_SECS, "5");
        }

        let cfg = Config::from_env().unwrap();

        assert_eq!(cfg.database_url(), Some("postgres://user:pw@db:5432/lnk"));
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.api_base(), "http://127.0.0.1:4000");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(5));

        for key in ALL_KEYS {
            unsafe {
                env::remove_var(key);
            }
        }
    }
}
