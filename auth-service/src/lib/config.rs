use std::env;
use std::time::Duration;

use auth::HashingParams;
use auth::TokenSettings;
use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Application configuration for auth-service.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

/// PostgreSQL connection and pool configuration.
#[derive(Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime_seconds: u64,
}

/// HTTP listeners configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub probe_port: u16,
}

/// JWT issuance configuration.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: String,
    pub signing_key: String,
    pub validity_seconds: u64,
}

/// Argon2id cost parameters for new password hashes.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// Flat variable names accepted on top of the nested `APP_SECTION__KEY` form.
const FLAT_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("JWT_ISSUER", "jwt.issuer"),
    ("JWT_AUDIENCE", "jwt.audience"),
    ("JWT_SIGNING_KEY", "jwt.signing_key"),
    ("JWT_VALIDITY", "jwt.validity_seconds"),
    ("AUTH_PORT", "server.port"),
    ("PROBE_PORT", "server.probe_port"),
];

impl Config {
    /// Load configuration from files with environment variable overrides.
    ///
    /// # Configuration Priority (highest to lowest)
    /// 1. Flat environment variables (JWT_SIGNING_KEY, DB_HOST, AUTH_PORT, etc.)
    /// 2. Nested environment variables (APP_JWT__SIGNING_KEY, APP_DATABASE__HOST, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    /// 5. Built-in defaults
    ///
    /// A `.env` file in the working directory is loaded into the process
    /// environment first; variables already set take precedence over it.
    ///
    /// # Errors
    /// Returns error if configuration values are malformed
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = Self::with_defaults(ConfigBuilder::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: APP_DATABASE__HOST=db overrides database.host
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        for (variable, key) in FLAT_ENV_OVERRIDES {
            let value = env::var(variable).ok().filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        builder.build()?.try_deserialize()
    }

    fn with_defaults(
        builder: config::ConfigBuilder<DefaultState>,
    ) -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "")?
            .set_default("database.name", "taskmango_db")?
            .set_default("database.max_connections", 100)?
            .set_default("database.min_connections", 10)?
            .set_default("database.max_lifetime_seconds", 3600)?
            .set_default("server.port", 9090)?
            .set_default("server.probe_port", 9091)?
            .set_default("jwt.issuer", "auth-service")?
            .set_default("jwt.audience", "task-manager")?
            .set_default("jwt.signing_key", "secret-key-change-me")?
            .set_default("jwt.validity_seconds", 3600)?
            .set_default("password.memory_kib", 64 * 1024)?
            .set_default("password.iterations", 3)?
            .set_default("password.parallelism", 4)
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_seconds)
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("max_lifetime_seconds", &self.max_lifetime_seconds)
            .finish()
    }
}

impl JwtConfig {
    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings::new(
            self.signing_key.as_bytes(),
            self.issuer.as_str(),
            self.audience.as_str(),
            Duration::from_secs(self.validity_seconds),
        )
    }
}

// Keeps the signing key out of the startup log line.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("signing_key", &"<redacted>")
            .field("validity_seconds", &self.validity_seconds)
            .finish()
    }
}

impl PasswordConfig {
    pub fn hashing_params(&self) -> HashingParams {
        HashingParams {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
            ..HashingParams::default()
        }
    }
}
