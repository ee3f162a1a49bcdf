//! Connection configuration
//!
//! Sources, highest priority first:
//! 1. `DATABASE_URL` (a full connection string overrides the discrete fields)
//! 2. `PGHOST` / `PGPORT` / `PGDATABASE` / `PGUSER` / `PGPASSWORD`
//! 3. Built-in defaults (`localhost:5432`, database `lightbnb`, user `labber`)
//!
//! A `.env` file in the current directory is loaded first; it never
//! overrides variables that are already set. [`DbConfig::load`] reads the same
//! fields from a TOML file instead.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use tracing::{debug, info};

use crate::error::{DbError, Result};

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_DATABASE: &str = "lightbnb";
const DEFAULT_USER: &str = "labber";

/// Kept low; the route layer is the only client.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Which store backs `add_property`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyBackend {
    /// Process-local map, optionally seeded from a JSON fixture
    Memory,
    /// `properties` table, through the pool
    #[default]
    Postgres,
}

impl FromStr for PropertyBackend {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(DbError::config(format!(
                "unknown property store '{}' (expected 'memory' or 'postgres')",
                other
            ))),
        }
    }
}

/// Database and store configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Full connection string; overrides host/port/database/user/password
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: Option<String>,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection before failing
    pub acquire_timeout_secs: u64,
    pub property_store: PropertyBackend,
    /// JSON file used to seed the in-memory property store
    pub property_fixture: Option<PathBuf>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            user: DEFAULT_USER.to_string(),
            password: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            property_store: PropertyBackend::default(),
            property_fixture: None,
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("property_store", &self.property_store)
            .field("property_fixture", &self.property_fixture)
            .finish()
    }
}

impl DbConfig {
    /// Load configuration from the environment (after reading `.env`).
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded .env from {}", path.display()),
            Err(e) => debug!("No .env loaded: {}", e),
        }

        let config = Self::from_vars(|key| env::var(key).ok())?;
        info!(
            store = ?config.property_store,
            max_connections = config.max_connections,
            "database configuration loaded from environment"
        );
        Ok(config)
    }

    /// Load configuration from a TOML file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            DbError::config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Build configuration from a variable lookup.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| get(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        config.url = get("DATABASE_URL");
        if let Some(host) = get("PGHOST") {
            config.host = host;
        }
        if let Some(port) = get("PGPORT") {
            config.port = parse_var("PGPORT", &port)?;
        }
        if let Some(database) = get("PGDATABASE") {
            config.database = database;
        }
        if let Some(user) = get("PGUSER") {
            config.user = user;
        }
        config.password = get("PGPASSWORD");

        if let Some(max) = get("LIGHTBNB_MAX_CONNECTIONS") {
            config.max_connections = parse_var("LIGHTBNB_MAX_CONNECTIONS", &max)?;
        }
        if let Some(timeout) = get("LIGHTBNB_ACQUIRE_TIMEOUT_SECS") {
            config.acquire_timeout_secs = parse_var("LIGHTBNB_ACQUIRE_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(store) = get("LIGHTBNB_PROPERTY_STORE") {
            config.property_store = store.parse()?;
        }
        config.property_fixture = get("LIGHTBNB_PROPERTY_FIXTURE").map(PathBuf::from);

        Ok(config)
    }

    /// Connection options for the pool.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return url
                .parse::<PgConnectOptions>()
                .map_err(|e| DbError::config(format!("invalid DATABASE_URL: {}", e)));
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user);
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        Ok(options)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DbError::config(format!("{} must be a number, got '{}'", key, value)))
}
