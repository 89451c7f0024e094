//! TMDB (The Movie Database) search backend.
//!
//! Implements [`SearchProvider`] against the TMDB v3 REST API. The client
//! deliberately carries no retry or throttling logic: the pipeline
//! serializes requests and inserts a fixed inter-record delay, which is
//! the whole rate-limit policy for this tool.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::provider::{Category, SearchCandidate, SearchProvider, VideoEntry};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Combined series+movie result cap per search.
const RESULT_CAP: usize = 20;

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbResults<T> {
    results: Vec<T>,
}

/// Search hit shape shared by `/search/tv` and `/search/movie`; the two
/// endpoints use different field names for the same data.
#[derive(Debug, Deserialize)]
struct TmdbSearchHit {
    id: u64,
    name: Option<String>,
    title: Option<String>,
    original_name: Option<String>,
    original_title: Option<String>,
    poster_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// TMDB search client.
///
/// The base URL is configurable so tests can point the client at a local
/// mock server; production callers use [`DEFAULT_BASE_URL`].
pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    /// Create a client for the given API key against [`DEFAULT_BASE_URL`].
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a client against a custom API root (no trailing slash).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            api_key,
            base_url,
        }
    }

    fn search_url(&self, category: Category, title: &str) -> String {
        format!(
            "{}/search/{}?api_key={}&query={}&page=1",
            self.base_url,
            category.path_segment(),
            self.api_key,
            urlencoded(title)
        )
    }

    fn videos_url(&self, category: Category, id: u64) -> String {
        format!(
            "{}/{}/{}/videos?api_key={}",
            self.base_url,
            category.path_segment(),
            id,
            self.api_key
        )
    }

    /// Single-category search, first results page only.
    async fn search_category(
        &self,
        category: Category,
        title: &str,
    ) -> anyhow::Result<Vec<SearchCandidate>> {
        let url = self.search_url(category, title);
        debug!(%category, title, "TMDB search");

        let body: TmdbResults<TmdbSearchHit> = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("TMDB {category} search request failed"))?
            .error_for_status()
            .with_context(|| format!("TMDB {category} search returned error status"))?
            .json()
            .await
            .with_context(|| format!("failed to parse TMDB {category} search response"))?;

        Ok(body
            .results
            .into_iter()
            .map(|hit| SearchCandidate {
                id: hit.id,
                category,
                name: hit.name.or(hit.title),
                original_name: hit.original_name.or(hit.original_title),
                poster_path: hit.poster_path,
            })
            .collect())
    }
}

#[async_trait]
impl SearchProvider for TmdbClient {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    /// Query both categories independently. A failure in one category
    /// degrades to zero results for it; the search as a whole fails only
    /// when both queries fail.
    async fn search(&self, title: &str) -> anyhow::Result<Vec<SearchCandidate>> {
        let series = self.search_category(Category::Series, title).await;
        let movies = self.search_category(Category::Movie, title).await;

        if let (Err(series_err), Err(movie_err)) = (&series, &movies) {
            anyhow::bail!("series search failed ({series_err:#}); movie search failed ({movie_err:#})");
        }

        let mut candidates = Vec::new();
        for result in [series, movies] {
            match result {
                Ok(mut batch) => candidates.append(&mut batch),
                Err(err) => {
                    warn!(title, error = %err, "one search category failed, continuing with the other")
                }
            }
        }
        candidates.truncate(RESULT_CAP);
        Ok(candidates)
    }

    async fn videos(&self, category: Category, id: u64) -> anyhow::Result<Vec<VideoEntry>> {
        let url = self.videos_url(category, id);
        debug!(%category, id, "TMDB video listing");

        let body: TmdbResults<VideoEntry> = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("TMDB video request failed for {category}/{id}"))?
            .error_for_status()
            .with_context(|| format!("TMDB video request returned error status for {category}/{id}"))?
            .json()
            .await
            .context("failed to parse TMDB video response")?;

        Ok(body.results)
    }
}

/// Minimal percent-encoding for query parameter values.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(byte as char);
        } else if byte == b' ' {
            out.push('+');
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
