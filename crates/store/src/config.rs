//! Database configuration from the environment.

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// MySQL connection settings, read from `DB_*` variables at startup.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
}

impl DbConfig {
    /// Read the configuration from the environment. Fails naming the
    /// first missing variable instead of connecting with half a config.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_raw = required("DB_PORT")?;
        let port = port_raw.parse().map_err(|_| ConfigError::InvalidVar {
            var: "DB_PORT",
            value: port_raw,
        })?;
        Ok(Self {
            host: required("DB_HOST")?,
            port,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            database: required("DB_NAME")?,
            max_connections: 10,
        })
    }

    /// Build the process-scoped connection pool.
    pub async fn connect(&self) -> Result<MySqlPool, sqlx::Error> {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database);
        MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingVar(var))
}
