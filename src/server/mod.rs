//! # HTTP Server Module
//!
//! The Hyper-based HTTP server for the movie query service. The server owns
//! the configuration, the record store, the access guard, and the request
//! handler, and wires them together per request:
//!
//! 1. `OPTIONS` preflight is answered immediately
//! 2. The access guard checks the `Authorization` header
//! 3. The route dispatches to the matching handler
//! 4. Any `Err` from steps 2-3 is rendered by the error responder, with
//!    fault detail suppressed in production mode
//!
//! ## Concurrency
//!
//! One Tokio task per connection; requests share nothing mutable. The
//! record store is read-only after startup, so no locking is involved.

pub mod config;
pub mod handlers;
pub mod middleware;

// Re-export commonly used types
pub use config::ServerConfig;
pub use handlers::MovieHandler;
pub use middleware::AuthGuard;

use crate::error::{MovieWebError, Result};
use crate::store::MovieStore;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use middleware::{apply_default_headers, preflight_response, RequestLog};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, instrument, warn};

/// Main server instance managing HTTP connections and request routing
///
/// Coordinates the access guard, the query handler, and error response
/// generation. All state is immutable after construction, so the server is
/// shared across connection tasks behind an `Arc`.
#[derive(Debug)]
pub struct MovieWebServer {
    /// Server configuration
    config: ServerConfig,
    /// Shared-secret request gate
    auth_guard: AuthGuard,
    /// Movie query handler
    movie_handler: MovieHandler,
    /// Shared movie record store
    store: Arc<MovieStore>,
}

impl MovieWebServer {
    /// Create a new movie web server instance
    ///
    /// Loads the record store from the configured data file; the store is
    /// immutable for the rest of the process lifetime.
    ///
    /// ## Errors
    /// - `MovieWebError::StoreError`: if the data file cannot be read or
    ///   decoded
    #[instrument(level = "info", name = "server_new", skip(config))]
    pub async fn new(config: ServerConfig) -> Result<Self> {
        info!(
            "Initializing movie web server ({} mode)",
            config.environment
        );

        let store = Arc::new(MovieStore::load(&config.movie_db_path).await?);
        let auth_guard = AuthGuard::new(config.api_key.clone());
        let movie_handler = MovieHandler::new(Arc::clone(&store));

        info!("Movie web server initialized with {} records", store.len());

        Ok(Self {
            config,
            auth_guard,
            movie_handler,
            store,
        })
    }

    /// Start the HTTP server and handle incoming connections
    ///
    /// Binds the configured address and blocks, handling connections
    /// concurrently on the Tokio runtime, until the process is stopped.
    ///
    /// ## Errors
    /// - `MovieWebError::ServerError`: if binding or accepting fails
    #[instrument(level = "info", name = "server_start", skip(self))]
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.bind_addr();

        let listener = TcpListener::bind(bind_addr).await.map_err(|e| {
            error!("Failed to bind to address {}: {}", bind_addr, e);
            MovieWebError::server_error(
                format!("Failed to bind to address {bind_addr}: {e}"),
                Some(Box::new(e)),
            )
        })?;

        info!("Server listening on http://{}", bind_addr);

        let server = Arc::new(self);

        loop {
            let (stream, remote_addr) = listener.accept().await.map_err(|e| {
                error!("Failed to accept connection: {}", e);
                MovieWebError::server_error(
                    format!("Failed to accept connection: {e}"),
                    Some(Box::new(e)),
                )
            })?;

            let server_clone = Arc::clone(&server);

            tokio::task::spawn(async move {
                if let Err(e) = hyper::server::conn::http1::Builder::new()
                    .serve_connection(
                        TokioIo::new(stream),
                        service_fn(move |req| {
                            let server = Arc::clone(&server_clone);
                            async move { server.handle_request(req, remote_addr).await }
                        }),
                    )
                    .await
                {
                    error!("Connection error from {}: {}", remote_addr, e);
                }
            });
        }
    }

    /// Handle an individual HTTP request
    ///
    /// Runs the request through preflight handling, the access guard, and
    /// routing, then converts any error into its JSON response. This is the
    /// single point where faults become responses, so nothing raised inside
    /// the pipeline can escape as a connection error.
    ///
    /// Generic over the body type because no endpoint reads a request body.
    async fn handle_request<B>(
        &self,
        request: Request<B>,
        remote_addr: SocketAddr,
    ) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
        let request_log = RequestLog::start();
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let mut response = match self.route(request, remote_addr).await {
            Ok(resp) => resp,
            Err(e) => {
                if e.is_critical() {
                    error!("Request error from {}: {}", remote_addr, e.internal_message());
                } else {
                    warn!("Request rejected from {}: {}", remote_addr, e.internal_message());
                }

                self.error_response(&e)
            }
        };

        apply_default_headers(&mut response);
        request_log.finish(response.status().as_u16(), method.as_str(), &path);

        Ok(response)
    }

    /// Route a request to the matching handler
    ///
    /// The preflight short-circuit runs before the access guard so browsers
    /// can discover the CORS policy; everything else sits behind the guard.
    async fn route<B>(
        &self,
        request: Request<B>,
        remote_addr: SocketAddr,
    ) -> Result<Response<Full<Bytes>>> {
        if request.method() == Method::OPTIONS {
            return Ok(preflight_response());
        }

        self.auth_guard.authorize(request.headers())?;

        match (request.method(), request.uri().path()) {
            (&Method::GET, "/movie") => self.movie_handler.handle(&request, remote_addr).await,
            (&Method::GET, "/health") => self.handle_health_check(),
            (method, path) => {
                warn!("Unknown endpoint: {} {}", method, path);
                Ok(json_response(
                    StatusCode::NOT_FOUND,
                    &serde_json::json!({ "error": "Not found" }),
                ))
            }
        }
    }

    /// Handle health check requests
    ///
    /// Reports service status, version, and the size of the record store.
    fn handle_health_check(&self) -> Result<Response<Full<Bytes>>> {
        let health_status = serde_json::json!({
            "status": "healthy",
            "version": crate::VERSION,
            "store": {
                "records": self.store.len(),
            }
        });

        Ok(json_response(StatusCode::OK, &health_status))
    }

    /// Render an error as its JSON response
    ///
    /// Body shape and verbosity follow [`MovieWebError::response_body`];
    /// the configured run mode decides whether 500 detail is suppressed.
    fn error_response(&self, error: &MovieWebError) -> Response<Full<Bytes>> {
        let status = StatusCode::from_u16(error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = error.response_body(self.config.environment.is_production());

        json_response(status, &body)
    }
}

/// Build a JSON response with the standard headers
///
/// Falls back to a plain 500 if response construction itself fails, so this
/// function always produces a response.
fn json_response(status: StatusCode, body: &serde_json::Value) -> Response<Full<Bytes>> {
    let body_string = serde_json::to_string(body)
        .unwrap_or_else(|_| r#"{"error":{"message":"server error"}}"#.to_string());

    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .header("cache-control", "no-cache")
        .body(Full::new(Bytes::from(body_string)))
        .unwrap_or_else(|_| {
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::new(Bytes::from("server error")))
                .unwrap()
        })
}

/// Convenience function to start a movie web server
///
/// ## Example
/// ```rust,no_run
/// use movie_web::{start_server, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut config = ServerConfig::new();
///     config.api_key = Some("secret".to_string());
///
///     start_server(config).await?;
///     Ok(())
/// }
/// ```
///
/// ## Errors
/// Returns any store-load or server startup error.
#[instrument(level = "info", name = "start_server", skip(config))]
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let server = MovieWebServer::new(config).await?;
    server.start().await
}

// Implement From<hyper::http::Error> for convenient error handling
impl From<hyper::http::Error> for MovieWebError {
    fn from(err: hyper::http::Error) -> Self {
        Self::server_error(format!("HTTP error: {err}"), Some(Box::new(err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::config::Environment;
    use http::header::AUTHORIZATION;
    use http_body_util::BodyExt;

    const SAMPLE: &str = r#"[
        {"title": "Alien", "genre": "Horror, Sci-Fi", "country": "UK, USA", "avg_vote": 8.4},
        {"title": "Clerks", "genre": "Comedy", "country": "USA", "avg_vote": 7.7}
    ]"#;

    fn test_server(environment: Environment) -> MovieWebServer {
        let store = Arc::new(MovieStore::from_json(SAMPLE.as_bytes()).unwrap());
        let mut config = ServerConfig::default();
        config.api_key = Some("secret".to_string());
        config.environment = environment;

        MovieWebServer {
            auth_guard: AuthGuard::new(config.api_key.clone()),
            movie_handler: MovieHandler::new(Arc::clone(&store)),
            store,
            config,
        }
    }

    fn authed_request(uri: &str) -> Request<()> {
        Request::builder()
            .uri(uri)
            .header(AUTHORIZATION, "Bearer secret")
            .body(())
            .unwrap()
    }

    fn remote() -> SocketAddr {
        "127.0.0.1:9999".parse().unwrap()
    }

    async fn body_json(response: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_request_without_credentials_is_401() {
        let server = test_server(Environment::Development);
        let request = Request::builder()
            .uri("/movie?genre=comedy")
            .body(())
            .unwrap();

        let response = server.handle_request(request, remote()).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Unauthorized request");
    }

    #[tokio::test]
    async fn test_authorized_query_succeeds() {
        let server = test_server(Environment::Development);
        let request = authed_request("/movie?genre=comedy");

        let response = server.handle_request(request, remote()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Default headers ride along on every response
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["title"], "Clerks");
    }

    #[tokio::test]
    async fn test_validation_error_body_uses_capitalized_key() {
        let server = test_server(Environment::Development);
        let request = authed_request("/movie?genre=western");

        let response = server.handle_request(request, remote()).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["Error"], "No movies with that genre!");
    }

    #[tokio::test]
    async fn test_preflight_bypasses_the_guard() {
        let server = test_server(Environment::Development);
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/movie")
            .body(())
            .unwrap();

        let response = server.handle_request(request, remote()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_health_check_reports_store_size() {
        let server = test_server(Environment::Development);
        let request = authed_request("/health");

        let response = server.handle_request(request, remote()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["store"]["records"], 2);
    }

    #[tokio::test]
    async fn test_unknown_endpoint_is_404_behind_the_guard() {
        let server = test_server(Environment::Development);

        let response = server
            .handle_request(authed_request("/movies"), remote())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Without credentials the guard answers first
        let request = Request::builder().uri("/movies").body(()).unwrap();
        let response = server.handle_request(request, remote()).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_fault_detail_suppressed_in_production() {
        let fault = MovieWebError::internal_error("record store went missing", None);

        let production = test_server(Environment::Production).error_response(&fault);
        assert_eq!(production.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(production).await;
        assert_eq!(json["error"]["message"], "server error");
        assert!(!json.to_string().contains("missing"));

        let development = test_server(Environment::Development).error_response(&fault);
        let json = body_json(development).await;
        assert_eq!(json["error"]["message"], "record store went missing");
    }

    #[test]
    fn test_json_response_shape() {
        let response = json_response(
            StatusCode::BAD_REQUEST,
            &serde_json::json!({ "Error": "No movies in that country!" }),
        );

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers()["cache-control"], "no-cache");
    }

    #[test]
    fn test_http_error_conversion() {
        let http_error: http::Error = http::uri::Builder::new()
            .scheme("invalid scheme")
            .authority("example.com")
            .path_and_query("/")
            .build()
            .unwrap_err()
            .into();
        let err: MovieWebError = http_error.into();

        assert_eq!(err.status_code(), 500);
        assert_eq!(err.client_message(), "server error");
    }
}
