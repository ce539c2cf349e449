use std::env;
use std::fmt;

/// Default signing secret for local development only.
const DEV_JWT_SECRET: &str = "your-secret-key-here";

/// Work factors bcrypt accepts.
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Runtime configuration, read from the environment (and `.env` via `dotenv` in `main`).
#[derive(Debug, Clone)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    /// Full connection string; takes precedence over the individual `DB_*` values.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    /// bcrypt work factor used when hashing new passwords.
    pub bcrypt_cost: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using the development default");
            DEV_JWT_SECRET.to_string()
        });

        let bcrypt_cost = parse_or("BCRYPT_COST", 10)?;
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Self {
            db_host: var_or("DB_HOST", "localhost"),
            db_port: parse_or("DB_PORT", 5432)?,
            db_user: var_or("DB_USER", "postgres"),
            db_password: var_or("DB_PASSWORD", ""),
            db_name: var_or("DB_NAME", "taskmate"),
            database_url: env::var("DATABASE_URL").ok(),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5)?,
            jwt_secret,
            server_host: var_or("HOST", "127.0.0.1"),
            server_port: parse_or("PORT", 5000)?,
            bcrypt_cost,
        })
    }

    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.db_user, self.db_password, self.db_host, self.db_port, self.db_name
            ),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
