//! The enrichment pipeline: drives the per-record workflow over a source
//! document and accumulates the audit and manual-review logs.
//!
//! Records are processed strictly sequentially with a fixed delay after
//! each one. That is the politeness policy toward the search provider;
//! there is deliberately no parallel fan-out and no adaptive backoff.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::document::{Document, Fragment};
use crate::resolve::{self, MatchedTitle, Resolution, ScoredCandidate};
use crate::tmdb::{Category, SearchProvider};

/// Which fields a run is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Visit only fragments whose image is a placeholder; update posters.
    PostersOnly,
    /// Visit every fragment; posters and trailers update independently.
    PostersAndTrailers,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Mode::PostersOnly => "posters-only",
            Mode::PostersAndTrailers => "posters-and-trailers",
        })
    }
}

/// Terminal state of one processed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Ok,
    NeedsReview,
    Error,
}

/// One audit row per processed record, append-only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub title: String,
    pub old_image: String,
    pub new_image: Option<String>,
    pub old_trailer: Option<String>,
    pub new_trailer: Option<String>,
    pub tmdb_id: Option<u64>,
    pub tmdb_type: Option<Category>,
    pub status: AuditStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    fn base(frag: &Fragment, status: AuditStatus) -> Self {
        Self {
            title: frag.title.clone(),
            old_image: frag.image.clone(),
            new_image: None,
            old_trailer: frag.trailer.clone(),
            new_trailer: None,
            tmdb_id: None,
            tmdb_type: None,
            status,
            error: None,
            timestamp: Utc::now(),
        }
    }

    fn ok(frag: &Fragment, matched: &MatchedTitle, new_trailer: Option<String>) -> Self {
        Self {
            new_image: Some(matched.poster_url.clone()),
            new_trailer,
            tmdb_id: Some(matched.id),
            tmdb_type: Some(matched.category),
            ..Self::base(frag, AuditStatus::Ok)
        }
    }

    fn needs_review(frag: &Fragment) -> Self {
        Self::base(frag, AuditStatus::NeedsReview)
    }

    fn error(frag: &Fragment, message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::base(frag, AuditStatus::Error)
        }
    }
}

/// Manual-review row: the top scored candidates for a human to adjudicate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub title: String,
    pub old_image: String,
    pub candidates: Vec<ReviewCandidate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewCandidate {
    pub id: u64,
    #[serde(rename = "type")]
    pub category: Category,
    pub name: String,
    pub score: f64,
    pub poster_path: Option<String>,
}

impl ReviewEntry {
    fn new(frag: &Fragment, scored: &[ScoredCandidate]) -> Self {
        Self {
            title: frag.title.clone(),
            old_image: frag.image.clone(),
            candidates: scored
                .iter()
                .map(|s| ReviewCandidate {
                    id: s.candidate.id,
                    category: s.candidate.category,
                    name: s.candidate.display_name().to_string(),
                    score: s.score,
                    poster_path: s.candidate.poster_path.clone(),
                })
                .collect(),
        }
    }
}

/// Everything a run produces. The caller writes the document and both
/// logs once, after the full pass, so a mid-run crash never leaves a
/// partially patched file behind.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub document: String,
    pub audit: Vec<AuditEntry>,
    pub review: Vec<ReviewEntry>,
}

impl PipelineOutcome {
    pub fn count(&self, status: AuditStatus) -> usize {
        self.audit.iter().filter(|e| e.status == status).count()
    }
}

/// The orchestrator. Owns the provider handle and configuration; the
/// document and both logs are confined here for the duration of a run.
pub struct Pipeline {
    provider: Arc<dyn SearchProvider>,
    config: Config,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn SearchProvider>, config: Config) -> Self {
        Self { provider, config }
    }

    /// Run the full enrichment pass over `text`.
    ///
    /// Per-record failures (search errors, patch precondition violations)
    /// are recorded as ERROR audit entries and never abort the run.
    pub async fn run(&self, text: String, mode: Mode) -> PipelineOutcome {
        let mut doc = Document::new(text);
        let fragments = doc.fragments();
        let total_found = fragments.len();

        let targets: Vec<Fragment> = match mode {
            Mode::PostersOnly => fragments
                .into_iter()
                .filter(|f| f.needs_enrichment(&self.config.pipeline.placeholder_host))
                .collect(),
            Mode::PostersAndTrailers => fragments,
        };

        info!(%mode, total_found, eligible = targets.len(), "starting enrichment run");
        println!("Found {} fragments, {} to process", total_found, targets.len());

        let mut audit = Vec::with_capacity(targets.len());
        let mut review = Vec::new();

        for (i, frag) in targets.iter().enumerate() {
            println!("[{}/{}] {}", i + 1, targets.len(), frag.title);

            let entry = self.process_record(&mut doc, frag, mode, &mut review).await;
            match &entry.status {
                AuditStatus::Ok => {
                    if let Some(url) = &entry.new_image {
                        println!("  poster: {url}");
                    }
                    if let Some(url) = &entry.new_trailer {
                        println!("  trailer: {url}");
                    }
                }
                AuditStatus::NeedsReview => println!("  needs manual review"),
                AuditStatus::Error => {
                    println!("  error: {}", entry.error.as_deref().unwrap_or("unknown"))
                }
            }
            audit.push(entry);

            // Fixed inter-record delay, applied regardless of outcome.
            tokio::time::sleep(Duration::from_millis(self.config.pipeline.delay_ms)).await;
        }

        PipelineOutcome {
            document: doc.into_text(),
            audit,
            review,
        }
    }

    async fn process_record(
        &self,
        doc: &mut Document,
        frag: &Fragment,
        mode: Mode,
        review: &mut Vec<ReviewEntry>,
    ) -> AuditEntry {
        let candidates = match self.provider.search(&frag.title).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(title = %frag.title, error = %err, "search failed for record");
                return AuditEntry::error(frag, format!("{err:#}"));
            }
        };

        let resolution = resolve::resolve(
            &frag.title,
            candidates,
            &self.config.matching,
            &self.config.tmdb.image_base,
        );

        match resolution {
            Resolution::Matched(matched) => {
                let patched = match doc.patch_image(frag, &matched.poster_url) {
                    Ok(patched) => patched,
                    Err(err) => {
                        warn!(title = %frag.title, error = %err, "image patch rejected");
                        return AuditEntry::error(frag, err.to_string());
                    }
                };

                let mut new_trailer = None;
                if mode == Mode::PostersAndTrailers {
                    new_trailer = self.fetch_trailer(&matched).await;
                    if let Some(url) = new_trailer.clone() {
                        if let Err(err) = doc.patch_trailer(&patched, &url) {
                            warn!(title = %frag.title, error = %err, "trailer patch rejected");
                            new_trailer = None;
                        }
                    }
                }

                AuditEntry::ok(frag, &matched, new_trailer)
            }
            Resolution::NeedsReview(scored) => {
                info!(
                    title = %frag.title,
                    candidates = scored.len(),
                    "no confident match, queueing for manual review"
                );
                review.push(ReviewEntry::new(frag, &scored));
                AuditEntry::needs_review(frag)
            }
        }
    }

    /// Trailer lookup is a best-effort enrichment on top of a poster
    /// match; a failure here is logged and never blocks the record.
    async fn fetch_trailer(&self, matched: &MatchedTitle) -> Option<String> {
        match self.provider.videos(matched.category, matched.id).await {
            Ok(videos) => resolve::pick_trailer(&videos),
            Err(err) => {
                warn!(
                    id = matched.id,
                    category = %matched.category,
                    error = %err,
                    "video lookup failed, leaving trailer unset"
                );
                None
            }
        }
    }
}
