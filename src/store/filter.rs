//! # Query Filter Module
//!
//! The genre/country/avg_vote narrowing pipeline — the core of the service.
//! A [`MovieQuery`] is a pure function of the record list plus the request's
//! query parameters: it validates parameter shapes and narrows the list, or
//! fails with a user-actionable validation error.
//!
//! ## Pipeline Contract
//!
//! Filters compose conjunctively (AND semantics) and run strictly in the
//! order genre → country → avg_vote. An empty result after the genre or
//! country step stops the pipeline immediately with a 400; an empty result
//! after the avg_vote step is a valid outcome and is returned as an empty
//! list. Surviving records keep their original store order.

use crate::error::{MovieWebError, Result};
use crate::store::Movie;
use std::collections::HashMap;

/// Per-request query parameters for the `/movie` endpoint
///
/// All parameters are optional and combinable; an absent parameter imposes
/// no filter. `avg_vote` stays a raw string here so that format validation
/// happens inside the pipeline, at its defined position, rather than during
/// parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieQuery {
    /// Case-insensitive substring match against the record's genre
    pub genre: Option<String>,
    /// Case-insensitive substring match against the record's country
    pub country: Option<String>,
    /// Inclusive lower bound on the record's average vote, unparsed
    pub avg_vote: Option<String>,
}

impl MovieQuery {
    /// Parse a query from a raw URL query string
    ///
    /// Percent-decoding and pair splitting are delegated to
    /// `url::form_urlencoded`; when a key appears more than once, the last
    /// occurrence wins. A parameter supplied with an empty value is treated
    /// as absent, so `/movie?genre=` imposes no genre filter.
    ///
    /// ## Example
    /// ```rust
    /// use movie_web::store::MovieQuery;
    ///
    /// let query = MovieQuery::from_query_str("genre=action&avg_vote=7.5");
    /// assert_eq!(query.genre.as_deref(), Some("action"));
    /// assert_eq!(query.country, None);
    /// assert_eq!(query.avg_vote.as_deref(), Some("7.5"));
    /// ```
    #[must_use]
    pub fn from_query_str(query: &str) -> Self {
        let mut params: HashMap<String, String> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        let mut take = |key: &str| params.remove(key).filter(|value| !value.is_empty());

        Self {
            genre: take("genre"),
            country: take("country"),
            avg_vote: take("avg_vote"),
        }
    }

    /// Run the filter pipeline over `movies`
    ///
    /// Returns references into the input slice, preserving input order;
    /// nothing is cloned on the happy path.
    ///
    /// ## Errors
    /// - `MovieWebError::ValidationError` with `No movies with that genre!`
    ///   when the genre step matches nothing
    /// - `MovieWebError::ValidationError` with `No movies in that country!`
    ///   when the country step matches nothing
    /// - `MovieWebError::ValidationError` with a format or range message
    ///   when `avg_vote` does not parse or lies outside [1, 10)
    pub fn apply<'a>(&self, movies: &'a [Movie]) -> Result<Vec<&'a Movie>> {
        let mut matches: Vec<&Movie> = movies.iter().collect();

        if let Some(genre) = &self.genre {
            let needle = genre.to_lowercase();
            matches.retain(|movie| movie.genre.to_lowercase().contains(&needle));
            if matches.is_empty() {
                return Err(MovieWebError::validation_error("No movies with that genre!"));
            }
        }

        if let Some(country) = &self.country {
            let needle = country.to_lowercase();
            matches.retain(|movie| movie.country.to_lowercase().contains(&needle));
            if matches.is_empty() {
                return Err(MovieWebError::validation_error("No movies in that country!"));
            }
        }

        if let Some(raw) = &self.avg_vote {
            let threshold = parse_avg_vote(raw)?;
            // No empty-result check here: an empty list is a valid response
            matches.retain(|movie| movie.avg_vote >= threshold);
        }

        Ok(matches)
    }
}

/// Validate and parse the `avg_vote` parameter
///
/// The value must parse as a number and lie in the half-open interval
/// [1, 10). NaN counts as non-numeric; infinities fall to the range check.
fn parse_avg_vote(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| MovieWebError::validation_error("Average vote must be a number!"))?;

    if value.is_nan() {
        return Err(MovieWebError::validation_error(
            "Average vote must be a number!",
        ));
    }

    if value >= crate::AVG_VOTE_UPPER_BOUND || value < crate::MIN_AVG_VOTE {
        return Err(MovieWebError::validation_error(
            "Average vote must be between 1 and 9.9!",
        ));
    }

    Ok(value)
}
