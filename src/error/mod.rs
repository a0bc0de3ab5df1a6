//! # Error Handling Module
//!
//! Error handling for the movie query service, designed so that client-facing
//! responses stay stable and free of internal detail while server-side logs
//! keep the full story.
//!
//! ## Response Contract
//!
//! Every error maps to exactly one HTTP status and one JSON body shape:
//!
//! - Authorization failures → 401 `{"error": "Unauthorized request"}`
//! - Validation failures → 400 `{"Error": "<user-actionable message>"}`
//! - Everything else → 500, with fault detail included only outside of
//!   production mode
//!
//! ## Performance Characteristics
//!
//! - **Zero Allocation**: validation messages are `&'static str`
//! - **Fast Path**: status and client message lookups are constant-time
//! - **Thread Safe**: all error types implement `Send + Sync`

use thiserror::Error;

/// Result type alias for the movie-web library
///
/// This provides a convenient shorthand for `Result<T, MovieWebError>`
/// used throughout the codebase for consistent error handling.
pub type Result<T> = std::result::Result<T, MovieWebError>;

/// Error types for the movie query service
///
/// Each variant carries an internal message for logging; variants that wrap
/// lower-level failures also carry an optional source for error chain
/// analysis.
///
/// ## Error Categories
///
/// - **Authorization Errors**: missing, malformed, or mismatched API key
/// - **Validation Errors**: malformed or out-of-range query parameters, or
///   a filter step that matched nothing
/// - **Store Errors**: loading or decoding the movie record file
/// - **Configuration Errors**: invalid server configuration
/// - **Server/Internal Errors**: network faults and unexpected failures
#[derive(Error, Debug)]
pub enum MovieWebError {
    /// Request credential missing or mismatched
    ///
    /// Raised whenever the `Authorization` header is absent, malformed, or
    /// does not carry the configured API key. Also raised when no API key is
    /// configured at all, since no credential can then match.
    ///
    /// **Security**: external response is always `Unauthorized request`
    #[error("Unauthorized: {message}")]
    AuthError {
        /// Internal error message for logging
        message: String,
    },

    /// Query parameter failed validation or a filter matched nothing
    ///
    /// The message is user-actionable and is returned to the client verbatim
    /// in the `{"Error": ...}` body:
    /// - `No movies with that genre!`
    /// - `No movies in that country!`
    /// - `Average vote must be a number!`
    /// - `Average vote must be between 1 and 9.9!`
    #[error("Invalid query: {message}")]
    ValidationError {
        /// User-actionable message, returned to the client as-is
        message: &'static str,
    },

    /// Movie record store could not be loaded or decoded
    ///
    /// Covers missing data files, unreadable files, and malformed JSON.
    /// These only occur at startup; the store is immutable afterwards.
    #[error("Store error: {message}")]
    StoreError {
        /// Internal error message for logging
        message: String,
        /// Optional source error for error chain analysis
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Server configuration is invalid
    ///
    /// Covers bind address parsing, bad environment variable values, and
    /// missing data file paths. These should only occur at startup.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Internal error message for logging
        message: String,
        /// Optional source error for error chain analysis
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// HTTP server operation failed
    ///
    /// Covers listener startup failures, connection handling errors, and
    /// response generation errors.
    #[error("Server error: {message}")]
    ServerError {
        /// Internal error message for logging
        message: String,
        /// Optional source error for error chain analysis
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Unexpected internal failure
    ///
    /// Anything that does not fit the categories above. The client only ever
    /// sees a generic `server error` message for these.
    #[error("Internal error: {message}")]
    InternalError {
        /// Internal error message for logging
        message: String,
        /// Optional source error for error chain analysis
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl MovieWebError {
    /// Create a new authorization error with an internal message
    ///
    /// The message is only logged; clients always receive the generic
    /// `Unauthorized request` body.
    #[inline]
    pub fn auth_error<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        Self::AuthError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    ///
    /// The message doubles as the client-facing body, so it must be one of
    /// the fixed user-actionable messages.
    #[inline]
    #[must_use]
    pub fn validation_error(message: &'static str) -> Self {
        Self::ValidationError { message }
    }

    /// Create a new store error with message and optional source
    #[inline]
    pub fn store_error<T>(
        message: T,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self
    where
        T: Into<String>,
    {
        Self::StoreError {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error with message and optional source
    #[inline]
    pub fn config_error<T>(
        message: T,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self
    where
        T: Into<String>,
    {
        Self::ConfigError {
            message: message.into(),
            source,
        }
    }

    /// Create a new server error with message and optional source
    #[inline]
    pub fn server_error<T>(
        message: T,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self
    where
        T: Into<String>,
    {
        Self::ServerError {
            message: message.into(),
            source,
        }
    }

    /// Create a new internal error with message and optional source
    #[inline]
    pub fn internal_error<T>(
        message: T,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self
    where
        T: Into<String>,
    {
        Self::InternalError {
            message: message.into(),
            source,
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// ## Status Mapping
    /// - Authorization errors → 401
    /// - Validation errors → 400
    /// - Store/Config/Server/Internal errors → 500
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::AuthError { .. } => 401,
            Self::ValidationError { .. } => 400,
            Self::StoreError { .. }
            | Self::ConfigError { .. }
            | Self::ServerError { .. }
            | Self::InternalError { .. } => 500,
        }
    }

    /// Get the client-facing error message
    ///
    /// Validation messages are user-actionable and returned verbatim. All
    /// other categories collapse to a generic message so no internal detail
    /// can leak through this path.
    #[inline]
    #[must_use]
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::AuthError { .. } => "Unauthorized request",
            Self::ValidationError { message } => message,
            Self::StoreError { .. }
            | Self::ConfigError { .. }
            | Self::ServerError { .. }
            | Self::InternalError { .. } => "server error",
        }
    }

    /// Get the internal error message for logging
    ///
    /// May contain file paths and low-level failure detail. Never send this
    /// to clients in production mode.
    #[inline]
    #[must_use]
    pub fn internal_message(&self) -> &str {
        match self {
            Self::AuthError { message } => message,
            Self::ValidationError { message } => message,
            Self::StoreError { message, .. } => message,
            Self::ConfigError { message, .. } => message,
            Self::ServerError { message, .. } => message,
            Self::InternalError { message, .. } => message,
        }
    }

    /// Check if this error should be logged at ERROR level
    ///
    /// Authorization and validation failures are expected client errors and
    /// log at WARN; everything else indicates a server-side problem.
    #[inline]
    #[must_use]
    pub fn is_critical(&self) -> bool {
        match self {
            Self::AuthError { .. } | Self::ValidationError { .. } => false,
            Self::StoreError { .. }
            | Self::ConfigError { .. }
            | Self::ServerError { .. }
            | Self::InternalError { .. } => true,
        }
    }

    /// Render the JSON response body for this error
    ///
    /// Produces the exact body shape the HTTP surface promises for each
    /// status code. For 500s, `production` controls verbosity: in production
    /// the body is always `{"error": {"message": "server error"}}`; outside
    /// of it the internal message (and source, when present) is included so
    /// faults can be diagnosed from the response alone.
    #[must_use]
    pub fn response_body(&self, production: bool) -> serde_json::Value {
        match self.status_code() {
            400 => serde_json::json!({ "Error": self.client_message() }),
            401 => serde_json::json!({ "error": "Unauthorized request" }),
            _ => {
                if production {
                    serde_json::json!({ "error": { "message": "server error" } })
                } else {
                    let mut detail = serde_json::json!({ "message": self.internal_message() });
                    if let Some(source) = std::error::Error::source(self) {
                        detail["source"] = serde_json::Value::String(source.to_string());
                    }
                    serde_json::json!({ "error": detail })
                }
            }
        }
    }
}

// Implement common conversions for convenience
impl From<std::io::Error> for MovieWebError {
    #[inline]
    fn from(err: std::io::Error) -> Self {
        Self::server_error(format!("I/O error: {err}"), Some(Box::new(err)))
    }
}

impl From<serde_json::Error> for MovieWebError {
    #[inline]
    fn from(err: serde_json::Error) -> Self {
        Self::store_error(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<hyper::Error> for MovieWebError {
    #[inline]
    fn from(err: hyper::Error) -> Self {
        Self::server_error(format!("Hyper error: {err}"), Some(Box::new(err)))
    }
}
