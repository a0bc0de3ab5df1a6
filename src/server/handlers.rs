//! # Request Handlers Module
//!
//! HTTP request handlers for the movie query service. The handler runs
//! after the access guard has admitted the request; its only job is to turn
//! the query string into a filter, run it against the record store, and
//! serialize the result.
//!
//! ## Handler Design Principles
//!
//! - **Validation First**: parameter shape errors surface before any record
//!   is serialized
//! - **Pure Reads**: handlers never mutate the store; no state is shared
//!   between requests
//! - **Error Handling**: every failure path returns a typed error for the
//!   central responder to render

use crate::error::Result;
use crate::store::{MovieQuery, MovieStore};
use http::header::{CACHE_CONTROL, CONTENT_TYPE};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Handler for the `GET /movie` endpoint
///
/// Holds the shared record store and answers each request by filtering it.
/// The store is read-only, so the handler is freely shared across
/// connection tasks.
#[derive(Debug)]
pub struct MovieHandler {
    /// Shared movie record store
    pub store: Arc<MovieStore>,
}

impl MovieHandler {
    /// Create a new movie query handler
    #[must_use]
    pub fn new(store: Arc<MovieStore>) -> Self {
        Self { store }
    }

    /// Handle `GET /movie` requests
    ///
    /// Parses `genre`, `country`, and `avg_vote` from the query string,
    /// applies the filter pipeline, and returns the matching records as a
    /// JSON array in original store order.
    ///
    /// The request body is never read, so the handler is generic over the
    /// body type.
    ///
    /// ## Errors
    /// - `MovieWebError::ValidationError`: malformed parameter or an empty
    ///   genre/country result
    /// - `MovieWebError::StoreError`: response serialization failure
    #[instrument(level = "debug", name = "movie_handler", skip(self, request))]
    pub async fn handle<B>(
        &self,
        request: &Request<B>,
        remote_addr: SocketAddr,
    ) -> Result<Response<Full<Bytes>>> {
        debug!("Processing movie query from {}", remote_addr);

        let query = MovieQuery::from_query_str(request.uri().query().unwrap_or(""));
        let matches = self.store.query(&query)?;

        debug!(
            "Query {:?} matched {} of {} records",
            query,
            matches.len(),
            self.store.len()
        );

        let body = serde_json::to_string(&matches)?;

        Ok(Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .body(Full::new(Bytes::from(body)))?)
    }
}
