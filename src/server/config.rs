//! # Server Configuration Module
//!
//! Configuration management for the movie query service. Settings are read
//! from (in order of precedence) command-line arguments, environment
//! variables, and defaults, then validated once at startup.
//!
//! ## Recognized Environment Variables
//!
//! - `API_KEY` — the shared secret callers must present
//! - `PORT` — listen port (default 8000)
//! - `HOST` — listen address (default 0.0.0.0)
//! - `NODE_ENV` — `production` toggles error and log verbosity
//! - `MOVIE_DB_PATH` — path to the movie data file
//! - `LOG_LEVEL` — tracing level (error, warn, info, debug, trace)
//!
//! ## Security Considerations
//!
//! The API key is never logged. When no key is configured the server still
//! starts, but every request is rejected with 401; validation warns loudly
//! about this state.

use crate::error::{MovieWebError, Result};
use clap::Parser;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::{metadata::ParseLevelError, Level};

/// Wrapper for `tracing::Level` to handle serialization/deserialization
/// Used for logging configuration in the server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLevel(Level);

impl LogLevel {
    /// Returns the inner `tracing::Level` value.
    #[must_use]
    pub fn inner(&self) -> Level {
        self.0
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        Self(level)
    }
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        log_level.0
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl Serialize for LogLevel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self(s.parse().map_err(serde::de::Error::custom)?))
    }
}

/// Runtime mode of the service
///
/// `production` suppresses fault detail in 500 responses and switches the
/// log format to JSON. Any value other than `production` (including an unset
/// `NODE_ENV`) means development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Verbose errors, pretty-printed logs
    #[default]
    Development,
    /// Generic 500 bodies, JSON logs
    Production,
}

impl Environment {
    /// Whether the service runs in production mode
    #[must_use]
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = std::convert::Infallible;

    // Only the exact (case-insensitive) value "production" selects
    // production mode; every other value falls back to development.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("production") {
            Ok(Self::Production)
        } else {
            Ok(Self::Development)
        }
    }
}

impl Serialize for Environment {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

/// Complete server configuration
///
/// Constructed once at startup and passed by reference into the access
/// guard, the error responder, and the server loop. Immutable afterwards.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(
    name = "movie-web",
    about = "In-memory movie query service gated by a shared API key",
    version,
    long_about = None
)]
pub struct ServerConfig {
    /// Port to listen on
    ///
    /// The service binds `HOST:PORT`; port 0 asks the OS for a free port,
    /// which is mainly useful in tests.
    #[arg(
        short = 'p',
        long = "port",
        value_name = "PORT",
        default_value_t = crate::DEFAULT_PORT,
        env = "PORT",
        help = "Port to listen on"
    )]
    pub port: u16,

    /// Network address to bind the server to
    ///
    /// Use 0.0.0.0 to bind all interfaces, or 127.0.0.1 for localhost only.
    ///
    /// ## Security
    /// Binding to 0.0.0.0 exposes the server on all network interfaces.
    /// Only use this in trusted environments or behind a firewall.
    #[arg(
        long = "host",
        value_name = "ADDRESS",
        default_value = crate::DEFAULT_BIND_ADDR,
        env = "HOST",
        help = "Network address to bind the server to"
    )]
    pub host: IpAddr,

    /// Shared API key callers must present
    ///
    /// Compared against the token portion of the `Authorization` header.
    /// When unset or empty, every request is rejected with 401.
    #[arg(
        long = "api-key",
        value_name = "KEY",
        env = "API_KEY",
        help = "Shared API key callers must present"
    )]
    pub api_key: Option<String>,

    /// Runtime mode
    ///
    /// `production` returns generic 500 bodies and emits JSON logs; any
    /// other value selects development behavior.
    #[arg(
        long = "environment",
        value_name = "MODE",
        default_value = "development",
        env = "NODE_ENV",
        help = "Runtime mode (production suppresses error detail)"
    )]
    pub environment: Environment,

    /// Path to the movie data file
    ///
    /// A JSON array of movie objects, loaded once at startup. The process
    /// refuses to start when the file is missing or malformed.
    #[arg(
        short = 'd',
        long = "movie-db",
        value_name = "PATH",
        default_value = "data/moviedb.json",
        env = "MOVIE_DB_PATH",
        help = "Path to the movie data file (JSON array)"
    )]
    pub movie_db_path: PathBuf,

    /// Logging level for the server
    ///
    /// Controls the verbosity of server logging:
    /// - ERROR: Only critical errors
    /// - WARN: Errors and warnings
    /// - INFO: General operational information
    /// - DEBUG: Detailed debugging information
    /// - TRACE: Very detailed tracing (performance impact)
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        default_value = "info",
        env = "LOG_LEVEL",
        help = "Logging level (error, warn, info, debug, trace)"
    )]
    pub log_level: LogLevel,
}

impl ServerConfig {
    /// Create a new configuration with default values
    ///
    /// ## Example
    /// ```rust
    /// use movie_web::ServerConfig;
    ///
    /// let config = ServerConfig::new();
    /// assert_eq!(config.port, 8000);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from command-line arguments
    ///
    /// Parses command-line arguments with environment-variable fallbacks to
    /// create a complete server configuration.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Load configuration from environment variables only
    ///
    /// Creates configuration using only environment variables, with
    /// defaults for any missing values. Useful for embedding the server
    /// without a CLI front end.
    ///
    /// ## Errors
    /// - `MovieWebError::ConfigError`: if a variable is present but does
    ///   not parse
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("PORT") {
            config.port = port.parse().map_err(|e| {
                MovieWebError::config_error(
                    format!("Invalid port '{port}': {e}"),
                    Some(Box::new(e)),
                )
            })?;
        }

        if let Ok(host) = std::env::var("HOST") {
            config.host = host.parse().map_err(|e| {
                MovieWebError::config_error(
                    format!("Invalid host address '{host}': {e}"),
                    Some(Box::new(e)),
                )
            })?;
        }

        if let Ok(api_key) = std::env::var("API_KEY") {
            config.api_key = Some(api_key);
        }

        if let Ok(environment) = std::env::var("NODE_ENV") {
            // Infallible: unknown values mean development
            config.environment = environment.parse().unwrap_or_default();
        }

        if let Ok(path) = std::env::var("MOVIE_DB_PATH") {
            config.movie_db_path = PathBuf::from(path);
        }

        if let Ok(log_level) = std::env::var("LOG_LEVEL") {
            config.log_level = log_level.parse().map_err(|e| {
                MovieWebError::config_error(
                    format!("Invalid log level '{log_level}': {e}"),
                    Some(Box::new(e)),
                )
            })?;
        }

        Ok(config)
    }

    /// Validate the configuration for consistency
    ///
    /// ## Errors
    /// - `MovieWebError::ConfigError`: if the movie data file is missing or
    ///   not a regular file
    pub fn validate(&self) -> Result<()> {
        if self.host.is_unspecified() {
            tracing::warn!(
                "Binding to wildcard address {} - ensure this is secure for your environment",
                self.host
            );
        }

        match self.api_key.as_deref() {
            None | Some("") => {
                tracing::warn!(
                    "No API key configured - every request will be rejected with 401"
                );
            }
            Some(_) => {}
        }

        if !self.movie_db_path.exists() {
            return Err(MovieWebError::config_error(
                format!(
                    "Movie data file does not exist: {}",
                    self.movie_db_path.display()
                ),
                None,
            ));
        }

        if !self.movie_db_path.is_file() {
            return Err(MovieWebError::config_error(
                format!(
                    "Movie data path is not a file: {}",
                    self.movie_db_path.display()
                ),
                None,
            ));
        }

        Ok(())
    }

    /// The socket address the server binds
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: crate::DEFAULT_PORT,
            host: crate::DEFAULT_BIND_ADDR
                .parse()
                .expect("Default bind address should be valid"),
            api_key: None,
            environment: Environment::Development,
            movie_db_path: PathBuf::from("data/moviedb.json"),
            log_level: LogLevel::from(Level::INFO),
        }
    }
}
