//! Environment-driven configuration for the API binary.

use std::env;

use thiserror::Error;

/// Everything the API needs at boot: the database, the HTTP bind target, the
/// browser origin checkout redirects point back to, and the endpoints plus
/// credential of the payment gateway and identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    database_url: String,
    api_bind_address: String,
    client_origin: String,
    gateway_base_url: String,
    gateway_secret_key: String,
    identity_verify_url: String,
}

impl ApiConfig {
    /// Hydrates `.env` (when present) and reads the required variables. A
    /// missing or blank variable is a `ConfigError`, never a default.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        hydrate_env_file()?;

        Ok(Self {
            database_url: require_var("DATABASE_URL")?,
            api_bind_address: require_var("API_BIND_ADDRESS")?,
            client_origin: require_var("CLIENT_ORIGIN")?,
            gateway_base_url: require_var("GATEWAY_BASE_URL")?,
            gateway_secret_key: require_var("GATEWAY_SECRET_KEY")?,
            identity_verify_url: require_var("IDENTITY_VERIFY_URL")?,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn api_bind_address(&self) -> &str {
        &self.api_bind_address
    }

    pub fn client_origin(&self) -> &str {
        &self.client_origin
    }

    pub fn gateway_base_url(&self) -> &str {
        &self.gateway_base_url
    }

    pub fn gateway_secret_key(&self) -> &str {
        &self.gateway_secret_key
    }

    pub fn identity_verify_url(&self) -> &str {
        &self.identity_verify_url
    }
}

fn require_var(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(key))
}

pub fn hydrate_env_file() -> Result<(), ConfigError> {
    if env::var_os("CONTEST_HUB_SKIP_DOTENV").is_some() {
        return Ok(());
    }
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ConfigError::Dotenv(err)),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable `{0}` is required but unset or blank")]
    MissingVar(&'static str),
    #[error("failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_GUARD: Mutex<()> = Mutex::new(());

    fn set_env() {
        std::env::set_var("CONTEST_HUB_SKIP_DOTENV", "1");
        std::env::set_var("DATABASE_URL", "sqlite://test.db");
        std::env::set_var("API_BIND_ADDRESS", "127.0.0.1:8080");
        std::env::set_var("CLIENT_ORIGIN", "https://contesthub.test");
        std::env::set_var("GATEWAY_BASE_URL", "https://gateway.test");
        std::env::set_var("GATEWAY_SECRET_KEY", "sk_test_123");
        std::env::set_var("IDENTITY_VERIFY_URL", "https://identity.test/verify");
    }

    #[test]
    fn config_loader_reads_env() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        let config = ApiConfig::load_from_env().expect("config loads");
        assert_eq!(config.database_url(), "sqlite://test.db");
        assert_eq!(config.api_bind_address(), "127.0.0.1:8080");
        assert_eq!(config.client_origin(), "https://contesthub.test");
        assert_eq!(config.gateway_base_url(), "https://gateway.test");
        assert_eq!(config.gateway_secret_key(), "sk_test_123");
        assert_eq!(config.identity_verify_url(), "https://identity.test/verify");
    }

    #[test]
    fn required_env_vars_are_trimmed() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        std::env::set_var("DATABASE_URL", "  sqlite://trim.db  ");
        std::env::set_var("CLIENT_ORIGIN", " https://trimmed.test ");

        let config = ApiConfig::load_from_env().expect("config loads");
        assert_eq!(config.database_url(), "sqlite://trim.db");
        assert_eq!(config.client_origin(), "https://trimmed.test");

        set_env();
    }

    #[test]
    fn empty_required_env_var_is_treated_as_missing() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        std::env::set_var("GATEWAY_SECRET_KEY", "   ");

        let err = ApiConfig::load_from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("GATEWAY_SECRET_KEY")));

        set_env();
    }

    #[test]
    fn missing_required_env_var_is_reported() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        std::env::remove_var("IDENTITY_VERIFY_URL");

        let err = ApiConfig::load_from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("IDENTITY_VERIFY_URL")));

        set_env();
    }
}
