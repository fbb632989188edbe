use std::time::Duration;

use config::{Config, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

use super::constants::{CONFIG_FILE, defaults, env};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CivicSettings {
    pub application: ApplicationSettings,
    pub session: SessionSettings,
    pub auth: AuthSettings,
    pub websocket: WebsocketSettings,
    pub redis: RedisSettings,
    #[serde(default)]
    pub postgres: Option<PostgresSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub flash_cookie_name: String,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub login_route: String,
    pub after_login_route: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebsocketSettings {
    pub challenge_timeout_ms: u64,
}

impl WebsocketSettings {
    pub fn challenge_timeout(&self) -> Duration {
        Duration::from_millis(self.challenge_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    pub host_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
}

impl CivicSettings {
    /// Defaults, then `config/default.json` if present, then `CIVIC__*`
    /// environment variables (after reading `.env`).
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        Self::load_from(Environment::with_prefix(env::ENV_PREFIX))
    }

    fn load_from(environment: Environment) -> Result<Self, SettingsError> {
        let settings = Self::builder()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                environment
                    .prefix_separator(env::ENV_SEPARATOR)
                    .separator(env::ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, SettingsError> {
        Ok(Config::builder()
            .set_default("application.address", defaults::APP_ADDRESS)?
            .set_default("session.cookie_name", defaults::SESSION_COOKIE_NAME)?
            .set_default("session.flash_cookie_name", defaults::FLASH_COOKIE_NAME)?
            .set_default("session.ttl_seconds", defaults::SESSION_TTL_SECONDS)?
            .set_default("auth.login_route", defaults::LOGIN_ROUTE)?
            .set_default("auth.after_login_route", defaults::AFTER_LOGIN_ROUTE)?
            .set_default(
                "websocket.challenge_timeout_ms",
                defaults::CHALLENGE_TIMEOUT_MS,
            )?
            .set_default("redis.host_name", defaults::REDIS_HOST_NAME)?)
    }

    /// Built-in defaults only. No file, no environment.
    pub fn defaults() -> Result<Self, SettingsError> {
        Ok(Self::builder()?.build()?.try_deserialize()?)
    }

    pub fn postgres_url(&self) -> Result<&Secret<String>, SettingsError> {
        self.postgres
            .as_ref()
            .map(|postgres| &postgres.url)
            .ok_or(SettingsError::Missing("postgres.url"))
    }
}
