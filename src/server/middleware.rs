//! # Middleware Module
//!
//! Request-gating and response-decorating components that sit around the
//! endpoint handlers:
//!
//! - **Access Guard**: shared-secret gate run before any endpoint logic
//! - **Request Logging**: per-request completion logging with latency
//! - **Default Headers**: CORS and security headers on every response

use crate::error::{MovieWebError, Result};
use http::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS, X_XSS_PROTECTION,
};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{HeaderMap, Response, StatusCode};
use std::time::Instant;
use tracing::{info, warn};

/// Shared-secret request gate
///
/// Compares the token portion of the `Authorization` header against the
/// configured API key before any endpoint logic runs. The guard is
/// constructed once from configuration and shared by every request.
///
/// ## Header Contract
/// The header format is `"<scheme> <token>"`; the token is the substring
/// after the first space and the scheme is not inspected. A header without
/// a space is treated as an authorization failure, never as a fault.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    /// Configured secret; `None` (or an empty string at construction)
    /// means no credential can ever match
    api_key: Option<String>,
}

impl AuthGuard {
    /// Create a guard for the configured API key
    ///
    /// An empty key is normalized to `None`: an empty shared secret must
    /// not make the gate trivially passable.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.is_empty()),
        }
    }

    /// Check the request credential against the configured secret
    ///
    /// ## Errors
    /// - `MovieWebError::AuthError` when no key is configured, the header
    ///   is missing or malformed, or the token does not match exactly
    pub fn authorize(&self, headers: &HeaderMap) -> Result<()> {
        let Some(expected) = self.api_key.as_deref() else {
            return Err(MovieWebError::auth_error("no API key is configured"));
        };

        let header = headers
            .get(AUTHORIZATION)
            .ok_or_else(|| MovieWebError::auth_error("missing Authorization header"))?
            .to_str()
            .map_err(|_| MovieWebError::auth_error("Authorization header is not valid UTF-8"))?;

        let token = header
            .split_once(' ')
            .map(|(_, token)| token)
            .ok_or_else(|| {
                MovieWebError::auth_error("malformed Authorization header (no scheme separator)")
            })?;

        if token != expected {
            return Err(MovieWebError::auth_error("API key mismatch"));
        }

        Ok(())
    }
}

/// Per-request timing and completion logging
///
/// Started when a request enters the service and finished once the response
/// status is known. 4xx/5xx completions log at WARN, everything else at
/// INFO.
#[derive(Debug, Clone)]
pub struct RequestLog {
    /// Request start time for latency calculation
    start_time: Instant,
}

impl RequestLog {
    /// Start timing a request
    #[must_use]
    pub fn start() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Log request completion with timing
    pub fn finish(&self, status_code: u16, method: &str, path: &str) {
        let elapsed = self.start_time.elapsed();

        if status_code >= 400 {
            warn!(
                "Request completed: {} {} - {} ({:.2}ms)",
                method,
                path,
                status_code,
                elapsed.as_secs_f64() * 1000.0
            );
        } else {
            info!(
                "Request completed: {} {} - {} ({:.2}ms)",
                method,
                path,
                status_code,
                elapsed.as_secs_f64() * 1000.0
            );
        }
    }
}

/// Add CORS and security headers to a response
///
/// Applied to every response the server produces, including error
/// responses. The set mirrors a permissive CORS policy plus the usual
/// browser hardening headers.
pub fn apply_default_headers(response: &mut Response<Full<Bytes>>) {
    let headers = response.headers_mut();

    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("authorization, content-type"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
    headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("0"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(
        HeaderName::from_static("x-dns-prefetch-control"),
        HeaderValue::from_static("off"),
    );
}

/// Build the CORS preflight response
///
/// `OPTIONS` requests are answered before the access guard runs so that
/// browsers can discover the `Authorization` requirement at all.
#[must_use]
pub fn preflight_response() -> Response<Full<Bytes>> {
    let mut response = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())));

    apply_default_headers(&mut response);
    response
}
