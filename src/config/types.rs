use serde::{Deserialize, Serialize};

use crate::tmdb::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchingConfig {
    /// Minimum similarity score required to auto-accept a candidate.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Prefer an exact case-insensitive name match over the highest
    /// fuzzy score when picking a winner.
    #[serde(default)]
    pub prefer_exact: bool,

    /// How many scored candidates a manual-review entry carries.
    #[serde(default = "default_review_candidates")]
    pub review_candidates: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Fixed delay after each record, in milliseconds. Not adaptive; this
    /// is the only request throttling the tool performs.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Host substring marking an image URL as a placeholder in need of
    /// enrichment.
    #[serde(default = "default_placeholder_host")]
    pub placeholder_host: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// API root, no trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// CDN base prepended to poster path fragments (fixed width variant).
    #[serde(default = "default_image_base")]
    pub image_base: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Filename of the patched document, written next to the input.
    #[serde(default = "default_document")]
    pub document: String,

    /// Audit log path, relative to the working directory.
    #[serde(default = "default_audit_log")]
    pub audit_log: String,

    /// Manual-review log path, relative to the working directory.
    #[serde(default = "default_review_log")]
    pub review_log: String,
}

fn default_threshold() -> f64 {
    0.5
}
fn default_review_candidates() -> usize {
    8
}
fn default_delay_ms() -> u64 {
    350
}
fn default_placeholder_host() -> String {
    "images.unsplash.com".to_string()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_image_base() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}
fn default_document() -> String {
    "content.final.js".to_string()
}
fn default_audit_log() -> String {
    "posters-replaced.json".to_string()
}
fn default_review_log() -> String {
    "posters-candidates.json".to_string()
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            prefer_exact: false,
            review_candidates: default_review_candidates(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            placeholder_host: default_placeholder_host(),
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base: default_image_base(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            document: default_document(),
            audit_log: default_audit_log(),
            review_log: default_review_log(),
        }
    }
}
