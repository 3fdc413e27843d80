use std::{env, fmt, path::PathBuf, time::Duration};

use thiserror::Error;

/// Runtime configuration, read from the process environment after an
/// optional `.env` file has been applied.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Public base URL of the wider service; company sign-in lives here.
    pub chs_url: String,
    pub api_url: String,
    pub oracle_query_api_url: String,
    pub account_url: String,
    pub chs_api_key: String,
    /// `host:port` of the Redis instance that holds sessions.
    pub cache_server: String,
    pub cookie_name: String,
    pub cookie_secret: String,
    pub cookie_domain: String,
    pub session_expiration: Duration,
    pub cdn_host: String,
    pub piwik_url: String,
    pub piwik_site_id: String,
    pub piwik_start_goal_id: String,
    pub log_level: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("chs_url", &self.chs_url)
            .field("api_url", &self.api_url)
            .field("oracle_query_api_url", &self.oracle_query_api_url)
            .field("account_url", &self.account_url)
            .field("cache_server", &self.cache_server)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_domain", &self.cookie_domain)
            .field("session_expiration", &self.session_expiration)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            chs_url: "http://chs.local".into(),
            api_url: "http://api.chs.local:4001".into(),
            oracle_query_api_url: "http://api.chs.local:4001".into(),
            account_url: "http://account.chs.local".into(),
            chs_api_key: "chs.api.key".into(),
            cache_server: "localhost:6379".into(),
            cookie_name: "__SID".into(),
            cookie_secret: "ChGovUk-XQrbf3sLj2abFxIY2TlapsJ".into(),
            cookie_domain: "chs.local".into(),
            session_expiration: Duration::from_secs(3600),
            cdn_host: "cdn.chs.local".into(),
            piwik_url: "https://matomo.platform.aws.chdev.org".into(),
            piwik_site_id: "24".into(),
            piwik_start_goal_id: "3".into(),
            log_level: "debug".into(),
        }
    }
}

impl Config {
    pub fn redis_url(&self) -> String {
        if self.cache_server.starts_with("redis://") || self.cache_server.starts_with("rediss://") {
            self.cache_server.clone()
        } else {
            format!("redis://{}", self.cache_server)
        }
    }

    /// Builds a config from whatever is currently in the environment, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigLoadError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            Err(_) => defaults.port,
        };
        let session_expiration = match env::var("DEFAULT_SESSION_EXPIRATION") {
            Ok(raw) => Duration::from_secs(raw.parse().map_err(|_| ConfigLoadError::Invalid {
                key: "DEFAULT_SESSION_EXPIRATION",
                value: raw,
            })?),
            Err(_) => defaults.session_expiration,
        };

        let var = |key: &str, default: String| env::var(key).unwrap_or(default);

        Ok(Self {
            host: defaults.host,
            port,
            chs_url: var("CHS_URL", defaults.chs_url),
            api_url: var("API_URL", defaults.api_url),
            oracle_query_api_url: var("ORACLE_QUERY_API_URL", defaults.oracle_query_api_url),
            account_url: var("ACCOUNT_URL", defaults.account_url),
            chs_api_key: var("CHS_API_KEY", defaults.chs_api_key),
            cache_server: var("CACHE_SERVER", defaults.cache_server),
            cookie_name: var("COOKIE_NAME", defaults.cookie_name),
            cookie_secret: var("COOKIE_SECRET", defaults.cookie_secret),
            cookie_domain: var("COOKIE_DOMAIN", defaults.cookie_domain),
            session_expiration,
            cdn_host: var("CDN_HOST", defaults.cdn_host),
            piwik_url: var("PIWIK_URL", defaults.piwik_url),
            piwik_site_id: var("PIWIK_SITE_ID", defaults.piwik_site_id),
            piwik_start_goal_id: var("PIWIK_START_GOAL_ID", defaults.piwik_start_goal_id),
            log_level: var("LOG_LEVEL", defaults.log_level).to_lowercase(),
        })
    }
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub env_file_loaded: bool,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    env_file: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Applies the `.env` file (a missing file is not an error), then reads
    /// the environment.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let loaded = match &self.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true),
            None => dotenvy::dotenv().map(|_| true),
        };
        let env_file_loaded = loaded.or_else(|err| match err {
            dotenvy::Error::Io(_) => Ok(false),
            _ => Err(err),
        })?;

        Ok(ConfigLoad {
            config: Config::from_env()?,
            env_file_loaded,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.cookie_name, "__SID");
        assert_eq!(config.session_expiration, Duration::from_secs(3600));
    }

    #[test]
    fn test_redis_url_adds_scheme() {
        let mut config = Config::default();
        assert_eq!(config.redis_url(), "redis://localhost:6379");

        config.cache_server = "redis://cache:6379/1".into();
        assert_eq!(config.redis_url(), "redis://cache:6379/1");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", Config::default());
        assert!(!rendered.contains("ChGovUk-XQrbf3sLj2abFxIY2TlapsJ"));
        assert!(!rendered.contains("chs.api.key"));
    }
}
