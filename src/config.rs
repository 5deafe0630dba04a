// Application configuration
//
// Loaded from environment variables (after `.env`, if present) with defaults
// for everything except the database URL.

use std::env;
use std::time::Duration;

/// Service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Interface to bind
    pub host: String,

    pub port: u16,

    pub db_max_connections: u32,

    /// Lifetime of the cached rule set; zero reloads rules on every calculation
    pub rule_cache_ttl: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingRequired("DATABASE_URL".to_string()))?;

        Self::from_lookup(database_url, |key| env::var(key).ok())
    }

    fn from_lookup<F>(database_url: String, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?;

        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?;

        let rule_cache_ttl_secs: u64 = lookup("RULE_CACHE_TTL_SECS")
            .unwrap_or_else(|| "60".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("RULE_CACHE_TTL_SECS".to_string()))?;

        Ok(Self {
            database_url,
            host,
            port,
            db_max_connections,
            rule_cache_ttl: Duration::from_secs(rule_cache_ttl_secs),
        })
    }

    /// Address the server listens on, as `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup("postgres://localhost/pricing".to_string(), |key| {
            vars.get(key).cloned()
        })
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.rule_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[("PORT", "3000"), ("RULE_CACHE_TTL_SECS", "0")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.rule_cache_ttl.is_zero());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for PORT");

        let err = load(&[("RULE_CACHE_TTL_SECS", "-1")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for RULE_CACHE_TTL_SECS");
    }
}
