//! # Movie Web Server Binary
//!
//! HTTP query service over an in-memory movie record store, gated by a
//! shared API key.
//!
//! ## Usage
//!
//! ```bash
//! # Basic usage with defaults
//! movie-web --api-key my-secret
//!
//! # Custom configuration
//! movie-web --port 8080 --movie-db /data/moviedb.json --environment production
//!
//! # With environment variables
//! export API_KEY=my-secret
//! export PORT=8000
//! export NODE_ENV=production
//! export MOVIE_DB_PATH=/data/moviedb.json
//! movie-web
//! ```

use movie_web::{server::ServerConfig, start_server};
use std::process;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the movie web server
///
/// Sets up logging, parses configuration, loads the record store, and runs
/// the server until a shutdown signal arrives.
///
/// ## Error Handling
/// All errors are logged and the process exits with appropriate exit codes:
/// - 0: Clean shutdown
/// - 1: Configuration error
/// - 2: Server startup or critical runtime error
/// - 3: Non-critical runtime error
///
/// ## Signal Handling
/// The server handles SIGINT and SIGTERM for graceful shutdown
#[tokio::main]
async fn main() {
    // Parse configuration from command line and environment
    let config = ServerConfig::from_args();

    // Initialize logging based on configuration
    if let Err(e) = setup_logging(&config) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    info!("Starting Movie Web Server v{}", movie_web::VERSION);
    display_startup_info(&config);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e.internal_message());
        process::exit(1);
    }

    // Setup graceful shutdown handler
    let shutdown_signal = setup_shutdown_handler();

    tokio::select! {
        // Server main loop
        result = start_server(config) => {
            match result {
                Ok(()) => {
                    info!("Server shut down cleanly");
                    process::exit(0);
                }
                Err(e) => {
                    error!("Server error: {}", e.internal_message());
                    if e.is_critical() {
                        process::exit(2);
                    } else {
                        process::exit(3);
                    }
                }
            }
        }

        // Graceful shutdown signal
        _ = shutdown_signal => {
            info!("Received shutdown signal, stopping server...");
            process::exit(0);
        }
    }
}

/// Setup structured logging based on configuration
///
/// The run mode decides the format: JSON structured logging in production,
/// pretty-printed with colors otherwise. The configured level seeds the
/// `EnvFilter`, so `RUST_LOG` can still override per-target verbosity.
fn setup_logging(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(config.log_level.inner().into())
        .from_env()?
        .add_directive("hyper=info".parse()?) // Reduce hyper verbosity
        .add_directive("tokio=info".parse()?) // Reduce tokio verbosity
        .add_directive("mio=warn".parse()?); // Reduce mio verbosity

    if config.environment.is_production() {
        // Production: JSON structured logging
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(true)
                    .with_target(true),
            )
            .init();

        info!("Initialized structured JSON logging for production");
    } else {
        // Development: Pretty-printed with colors
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .init();

        info!("Initialized pretty-printed logging for development");
    }

    Ok(())
}

/// Setup graceful shutdown signal handling
///
/// Creates a future that completes when SIGINT or SIGTERM is received.
async fn setup_shutdown_handler() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}

/// Log the effective configuration on startup
///
/// The API key itself is never logged, only whether one is configured.
fn display_startup_info(config: &ServerConfig) {
    info!("Bind Address: {}", config.bind_addr());
    info!("Environment: {}", config.environment);
    info!("Movie Data: {}", config.movie_db_path.display());
    info!("Log Level: {}", config.log_level);
    info!(
        "API Key: {}",
        if config.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
            "configured"
        } else {
            "NOT CONFIGURED (all requests will be rejected)"
        }
    );
    info!("Query endpoint: http://{}/movie", config.bind_addr());
    info!("Health endpoint: http://{}/health", config.bind_addr());
}
