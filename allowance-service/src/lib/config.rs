use std::env;

use auth::EncryptionError;
use auth::EncryptionKey;
use auth::LockoutPolicy;
use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigBuilder as Sources;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    #[serde(default)]
    pub lockout: LockoutConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Secrets have no defaults; they must come from the environment or a
/// deployment-specific file.
#[derive(Debug, Deserialize, Clone)]
pub struct SecurityConfig {
    pub token_secret: String,
    pub encryption_key: String,
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LockoutConfig {
    #[serde(default = "default_max_failed_attempts")]
    pub max_failed_attempts: u32,
    pub unlock_after_seconds: Option<i64>,
}

fn default_token_ttl_seconds() -> i64 {
    auth::TokenManager::DEFAULT_TTL_SECONDS
}

fn default_max_failed_attempts() -> u32 {
    LockoutPolicy::DEFAULT_MAX_FAILED_ATTEMPTS
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: default_max_failed_attempts(),
            unlock_after_seconds: None,
        }
    }
}

impl SecurityConfig {
    pub fn encryption_key(&self) -> Result<EncryptionKey, EncryptionError> {
        EncryptionKey::from_hex(&self.encryption_key)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_seconds)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.token_ttl_seconds <= 0 {
            return Err(ConfigError::Message(format!(
                "security.token_ttl_seconds must be positive, got {}",
                self.token_ttl_seconds
            )));
        }
        Ok(())
    }
}

impl LockoutConfig {
    pub fn policy(&self) -> LockoutPolicy {
        let policy = LockoutPolicy::new(self.max_failed_attempts);
        match self.unlock_after_seconds {
            Some(seconds) => policy.with_unlock_after(chrono::Duration::seconds(seconds)),
            None => policy,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // A zero threshold would lock every identity before its first attempt
        if self.max_failed_attempts == 0 {
            return Err(ConfigError::Message(
                "lockout.max_failed_attempts must be at least 1".to_string(),
            ));
        }
        if let Some(seconds) = self.unlock_after_seconds {
            if seconds <= 0 {
                return Err(ConfigError::Message(format!(
                    "lockout.unlock_after_seconds must be positive, got {}",
                    seconds
                )));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SECURITY__TOKEN_SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// Missing secrets or out-of-range values fail the load
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let sources = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: SECURITY__ENCRYPTION_KEY=... overrides security.encryption_key
            .add_source(Environment::with_prefix("").separator("__"));

        Self::from_sources(sources)
    }

    fn from_sources(sources: Sources<DefaultState>) -> Result<Self, ConfigError> {
        let config: Config = sources.build()?.try_deserialize()?;

        config.security.validate()?;
        config.lockout.validate()?;

        Ok(config)
    }
}
