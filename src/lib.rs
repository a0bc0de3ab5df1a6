//! # Movie Web Server Library
//!
//! A small HTTP query service that filters an in-memory, static collection
//! of movie records by genre, country, and minimum average vote, gated by a
//! single shared API key.
//!
//! ## Features
//!
//! - **In-Memory Store**: records are loaded once at startup and never
//!   mutated; concurrent reads need no locking
//! - **Shared-Secret Gate**: every endpoint sits behind an
//!   `Authorization: <scheme> <token>` check
//! - **Strict Validation**: query parameters are validated in a fixed
//!   order with stable, user-actionable error messages
//! - **Production-Safe Errors**: fault detail never leaks externally in
//!   production mode
//!
//! ## Architecture
//!
//! The library follows a modular design with clear separation of concerns:
//!
//! - [`error`] - Error taxonomy and JSON response body mapping
//! - [`store`] - Immutable movie record store and the query filter pipeline
//! - [`server`] - Hyper-based HTTP server, configuration, and middleware
//!
//! ## Request Pipeline
//!
//! 1. **Preflight**: `OPTIONS` requests get a CORS answer immediately
//! 2. **Access Guard**: the API key gate rejects unauthorized callers
//! 3. **Query Filter**: genre → country → avg_vote narrowing, in order
//! 4. **Error Responder**: any failure becomes a structured JSON body
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use movie_web::{start_server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = ServerConfig::new();
//!     config.api_key = Some("secret".to_string());
//!     config.movie_db_path = "data/moviedb.json".into();
//!
//!     start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Thread Safety
//!
//! All public APIs are thread-safe. The record store is read-only after
//! initialization and shared across request tasks behind an `Arc`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod server;
pub mod store;

// Re-export commonly used types for convenience
pub use error::{MovieWebError, Result};
pub use server::{start_server, MovieWebServer, ServerConfig};
pub use store::{Movie, MovieQuery, MovieStore};

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default server port
pub const DEFAULT_PORT: u16 = 8000;

/// Default bind address for the server
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// Lowest accepted `avg_vote` query threshold (inclusive)
///
/// Matches the lower edge of the vote domain; queries below it are
/// rejected before any record is inspected.
pub const MIN_AVG_VOTE: f64 = 1.0;

/// Upper bound on the `avg_vote` query threshold (exclusive)
///
/// Votes live in [1.0, 9.9], so a threshold of 10 or more can never match
/// and is rejected as out of range.
pub const AVG_VOTE_UPPER_BOUND: f64 = 10.0;
