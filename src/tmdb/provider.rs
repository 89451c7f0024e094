//! Trait definition and types for catalog search providers.
//!
//! This module defines the [`SearchProvider`] trait that search backends
//! implement, along with the shared data types returned by provider
//! queries. The production backend is [`TmdbClient`](super::TmdbClient);
//! tests substitute in-process fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Content category a candidate was found under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// TV series (`/search/tv`).
    #[serde(rename = "tv")]
    Series,
    /// Feature film (`/search/movie`).
    #[serde(rename = "movie")]
    Movie,
}

impl Category {
    /// URL path segment used by the provider API (`tv` or `movie`).
    pub fn path_segment(&self) -> &'static str {
        match self {
            Category::Series => "tv",
            Category::Movie => "movie",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// A single result returned from a title search.
///
/// Candidates are ephemeral: they feed the match resolver and are never
/// persisted beyond the audit and review logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCandidate {
    /// Provider-side numeric identifier for this item.
    pub id: u64,
    /// Category the candidate was found under.
    pub category: Category,
    /// Primary display name (`name` for series, `title` for movies).
    pub name: Option<String>,
    /// Original-language name, if different from `name`.
    pub original_name: Option<String>,
    /// Poster path fragment (e.g. `/abc.jpg`), if the item has artwork.
    pub poster_path: Option<String>,
}

impl SearchCandidate {
    /// Best human-readable name for logs and review entries.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.original_name.as_deref())
            .unwrap_or("")
    }
}

/// One entry from an item's video listing.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoEntry {
    /// Hosting site reported by the provider (e.g. `"YouTube"`).
    #[serde(default)]
    pub site: String,
    /// Video type (e.g. `"Trailer"`, `"Teaser"`, `"Clip"`).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Site-specific video key.
    #[serde(default)]
    pub key: String,
    /// Whether the provider flags the video as official. Absent on older
    /// records, which is treated as official-enough.
    pub official: Option<bool>,
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async trait for title search backends.
///
/// Implementations must honor the partial-failure contract of [`search`]:
/// a failed query for one category degrades to zero results for that
/// category, and only a failure of *both* categories surfaces as an error.
///
/// [`search`]: SearchProvider::search
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Search both categories for `title` and return the unified candidate
    /// list: series results first, then movies, capped at 20 entries.
    async fn search(&self, title: &str) -> anyhow::Result<Vec<SearchCandidate>>;

    /// Fetch the video listing for an item.
    async fn videos(&self, category: Category, id: u64) -> anyhow::Result<Vec<VideoEntry>>;
}
