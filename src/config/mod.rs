use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, treating empty values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        Ok(AppConfig {
            database_url,
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/uploads")])).unwrap();
        assert_eq!(config.database_url, "postgres://localhost/uploads");
        assert_eq!(config.port, 5001);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("UPLOAD_DIR", "/var/lib/uploads"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address(), ("127.0.0.1".to_string(), 8080));
        assert_eq!(config.upload_dir, PathBuf::from("/var/lib/uploads"));
    }

    #[test]
    fn database_url_is_required() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "5001")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));

        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn rejects_bad_port() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/app"),
            ("PORT", "70000"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("70000".to_string()));
    }
}
