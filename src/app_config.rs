//! Application configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Legacy variables (`DB_USERNAME`, `DB_PASSWORD`, `DB_CONNECTION_STRING`,
//!    `DB_NAME`, `PORT`)
//! 2. Environment variables prefixed with FITCHECK_, nested with `__`
//!    (e.g. `FITCHECK_DATABASE__CONNECTION_STRING`)
//! 3. Config file (config.toml)
//! 4. Default values
//!
//! Database credentials should be kept in environment variables, not in the
//! config file.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8088,
        }
    }
}

/// Document database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// URI scheme, `mongodb+srv` for hosted clusters or `mongodb` for a plain host
    pub scheme: String,
    /// Username (should be in env var DB_USERNAME)
    pub username: String,
    /// Password (should be in env var DB_PASSWORD)
    pub password: String,
    /// Host part of the URI, e.g. `cluster0.example.mongodb.net`
    pub connection_string: String,
    /// Database holding one collection per package
    pub name: String,
    /// Full connection URI; replaces the composed one when set
    pub uri: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            scheme: "mongodb+srv".to_string(),
            username: String::new(),
            password: String::new(),
            connection_string: "localhost".to_string(),
            name: "feature_toggles".to_string(),
            uri: None,
        }
    }
}

impl DatabaseConfig {
    /// Connection URI handed to the database driver.
    pub fn uri(&self) -> String {
        if let Some(uri) = self.uri.as_ref().filter(|uri| !uri.is_empty()) {
            return uri.clone();
        }

        if self.username.is_empty() {
            format!("{}://{}/{}", self.scheme, self.connection_string, self.name)
        } else {
            format!(
                "{}://{}:{}@{}/{}",
                self.scheme, self.username, self.password, self.connection_string, self.name
            )
        }
    }
}

/// Thresholds used by the insight evaluator and served by `/config`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub steps_goal_daily: i64,
    pub sleep_min_hours: f64,
    pub calories_recommended: i64,
    /// Calorie difference still reported as on target
    pub calories_tolerance: i64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            steps_goal_daily: 10000,
            sleep_min_hours: 7.0,
            calories_recommended: 2200,
            calories_tolerance: 150,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub insights: InsightsConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse::<i64>().ok());

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&AppConfig::default())?)
            // Add config file (optional)
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // Override with environment variables (FITCHECK_ prefix)
            .add_source(
                Environment::with_prefix("FITCHECK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.username", env::var("DB_USERNAME").ok())?
            .set_override_option("database.password", env::var("DB_PASSWORD").ok())?
            .set_override_option(
                "database.connection_string",
                env::var("DB_CONNECTION_STRING").ok(),
            )?
            .set_override_option("database.name", env::var("DB_NAME").ok())?
            .set_override_option("server.port", port)?
            .build()?;

        config.try_deserialize()
    }
}
