use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid {key} value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub frontend_origin: String,
}

impl Config {
    /// Reads the server configuration from the environment (call `dotenv` first).
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_raw = var_or("PORT", "3000");
        let port = port_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "PORT",
            value: port_raw.clone(),
        })?;

        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port,
            database_url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            frontend_origin: var_or("FRONTEND_ORIGIN", "http://localhost:3000"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        log::debug!("{} not set, using default: {}", key, default);
        default.to_string()
    })
}
