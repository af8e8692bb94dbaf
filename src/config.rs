use chrono::Duration;
use std::env;
use std::fmt;

const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;
const DEFAULT_BCRYPT_COST: u32 = 12;

/// Startup configuration error. Missing or malformed required settings are
/// fatal at process start; there is no fallback to insecure defaults.
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "required environment variable {} is not set", var),
            ConfigError::Invalid(var, value) => {
                write!(f, "environment variable {} has invalid value {:?}", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validated application configuration, assembled once at startup and shared
/// read-only afterwards.
pub struct Config {
    pub database_url: String,
    /// Server-wide token signing secret. Rotating it invalidates all
    /// outstanding tokens. Never logged.
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub server_host: String,
    pub server_port: u16,
}

// Manual Debug so the signing secret cannot end up in logs by accident.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_ttl_days = parse_or("TOKEN_TTL_DAYS", DEFAULT_TOKEN_TTL_DAYS)?;
        Ok(Self {
            database_url: require("DATABASE_URL")?,
            jwt_secret: require("JWT_SECRET")?,
            token_ttl: Duration::days(token_ttl_days),
            bcrypt_cost: parse_or("BCRYPT_COST", DEFAULT_BCRYPT_COST)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: parse_or("SERVER_PORT", 8080)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var)),
    }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid(var, value)),
        Err(_) => Ok(default),
    }
}
