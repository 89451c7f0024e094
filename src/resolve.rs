//! Match resolution: scoring search candidates against a source title and
//! picking a winner under the acceptance threshold.

use std::cmp::Ordering;

use crate::config::MatchingConfig;
use crate::similarity;
use crate::tmdb::{Category, SearchCandidate, VideoEntry};

const VIDEO_SITE: &str = "YouTube";

/// A candidate together with its similarity score against the source title.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: SearchCandidate,
    pub score: f64,
}

/// An auto-accepted match.
#[derive(Debug, Clone)]
pub struct MatchedTitle {
    /// Full poster URL (CDN base + poster path).
    pub poster_url: String,
    pub id: u64,
    pub category: Category,
    pub matched_name: String,
}

/// Outcome of resolving a source title against its candidates.
///
/// Search failures are not represented here; they surface as errors from
/// the provider and become ERROR audit entries in the pipeline.
#[derive(Debug, Clone)]
pub enum Resolution {
    Matched(MatchedTitle),
    /// Best score fell short (or the winner had no poster): the top
    /// scored candidates go to a human instead of guessing.
    NeedsReview(Vec<ScoredCandidate>),
}

/// Score every candidate against `title` and resolve a winner.
///
/// Each candidate scores the maximum similarity across its name variants;
/// a missing variant scores against the empty string. Candidates are then
/// stably sorted by descending score, so equal scores keep provider order
/// (series before movies). The top candidate wins only when it has a
/// poster and its score meets the threshold; anything else produces a
/// review set of at most `review_candidates` entries with scores rounded
/// to three decimals.
///
/// With `prefer_exact` set, the first exact case-insensitive name match
/// that has a poster wins outright before the best-score rule applies.
pub fn resolve(title: &str, candidates: Vec<SearchCandidate>, cfg: &MatchingConfig, image_base: &str) -> Resolution {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let score = similarity::score(title, candidate.name.as_deref().unwrap_or(""))
                .max(similarity::score(title, candidate.original_name.as_deref().unwrap_or("")));
            ScoredCandidate { candidate, score }
        })
        .collect();

    // Vec::sort_by is stable: ties keep original provider order.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    if cfg.prefer_exact {
        let exact = scored
            .iter()
            .find(|s| s.candidate.poster_path.is_some() && exact_name_match(title, &s.candidate));
        if let Some(winner) = exact {
            return Resolution::Matched(matched(winner, image_base));
        }
    }

    if let Some(top) = scored.first() {
        if top.score >= cfg.threshold && top.candidate.poster_path.is_some() {
            return Resolution::Matched(matched(top, image_base));
        }
    }

    scored.truncate(cfg.review_candidates);
    for entry in &mut scored {
        entry.score = round3(entry.score);
    }
    Resolution::NeedsReview(scored)
}

/// Pick a trailer URL from an item's video listing.
///
/// Prefers the first YouTube entry typed Trailer or Teaser whose official
/// flag is true or absent (absent is tolerated on older records), falling
/// back to the first YouTube entry of any type.
pub fn pick_trailer(videos: &[VideoEntry]) -> Option<String> {
    let preferred = videos.iter().find(|v| {
        v.site == VIDEO_SITE
            && (v.kind == "Trailer" || v.kind == "Teaser")
            && v.official != Some(false)
    });
    let chosen = preferred.or_else(|| videos.iter().find(|v| v.site == VIDEO_SITE))?;
    Some(format!("https://www.youtube.com/watch?v={}", chosen.key))
}

fn matched(winner: &ScoredCandidate, image_base: &str) -> MatchedTitle {
    let poster_path = winner
        .candidate
        .poster_path
        .as_deref()
        .unwrap_or_default();
    MatchedTitle {
        poster_url: format!("{image_base}{poster_path}"),
        id: winner.candidate.id,
        category: winner.candidate.category,
        matched_name: winner.candidate.display_name().to_string(),
    }
}

fn exact_name_match(title: &str, candidate: &SearchCandidate) -> bool {
    let title = title.to_lowercase();
    [candidate.name.as_deref(), candidate.original_name.as_deref()]
        .into_iter()
        .flatten()
        .any(|name| name.to_lowercase() == title)
}

fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

    fn candidate(id: u64, category: Category, name: &str, poster: Option<&str>) -> SearchCandidate {
        SearchCandidate {
            id,
            category,
            name: Some(name.to_string()),
            original_name: None,
            poster_path: poster.map(str::to_string),
        }
    }

    fn cfg() -> MatchingConfig {
        MatchingConfig::default()
    }

    #[test]
    fn exact_title_with_poster_matches() {
        let cands = vec![
            candidate(10, Category::Series, "Stranger Things", Some("/abc.jpg")),
            candidate(11, Category::Movie, "Strange Days", Some("/def.jpg")),
        ];
        match resolve("Stranger Things", cands, &cfg(), IMAGE_BASE) {
            Resolution::Matched(m) => {
                assert_eq!(m.poster_url, "https://image.tmdb.org/t/p/w500/abc.jpg");
                assert_eq!(m.id, 10);
                assert_eq!(m.category, Category::Series);
                assert_eq!(m.matched_name, "Stranger Things");
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn below_threshold_never_matches_even_with_poster() {
        let cands = vec![candidate(1, Category::Movie, "Completely Unrelated", Some("/x.jpg"))];
        assert!(matches!(
            resolve("Dark", cands, &cfg(), IMAGE_BASE),
            Resolution::NeedsReview(_)
        ));
    }

    #[test]
    fn top_candidate_without_poster_goes_to_review() {
        // Only the top candidate is eligible; a lower-ranked candidate
        // with a poster does not get promoted.
        let cands = vec![
            candidate(1, Category::Series, "Dark", None),
            candidate(2, Category::Movie, "Darko", Some("/p.jpg")),
        ];
        match resolve("Dark", cands, &cfg(), IMAGE_BASE) {
            Resolution::NeedsReview(scored) => {
                assert_eq!(scored[0].candidate.id, 1);
            }
            other => panic!("expected review, got {other:?}"),
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        // "abcd" vs "abxy": distance 2 over max len 4 = exactly 0.5.
        let cands = vec![candidate(1, Category::Movie, "abxy", Some("/p.jpg"))];
        assert!(matches!(
            resolve("abcd", cands, &cfg(), IMAGE_BASE),
            Resolution::Matched(_)
        ));
    }

    #[test]
    fn review_order_is_non_increasing_and_stable() {
        let cands = vec![
            candidate(1, Category::Series, "zzzzzzzz", Some("/a.jpg")),
            candidate(2, Category::Series, "Dar", Some("/b.jpg")),
            candidate(3, Category::Movie, "Dar", Some("/c.jpg")),
        ];
        let mut cfg = cfg();
        cfg.threshold = 0.9;
        match resolve("Dark", cands, &cfg, IMAGE_BASE) {
            Resolution::NeedsReview(scored) => {
                for pair in scored.windows(2) {
                    assert!(pair[0].score >= pair[1].score);
                }
                // Equal scores keep provider order: id 2 before id 3.
                assert_eq!(scored[0].candidate.id, 2);
                assert_eq!(scored[1].candidate.id, 3);
                assert_eq!(scored[2].candidate.id, 1);
            }
            other => panic!("expected review, got {other:?}"),
        }
    }

    #[test]
    fn review_is_capped_and_rounded() {
        let cands: Vec<_> = (0..12)
            .map(|i| candidate(i, Category::Movie, "Unrelated Title", Some("/p.jpg")))
            .collect();
        match resolve("Xyz", cands, &cfg(), IMAGE_BASE) {
            Resolution::NeedsReview(scored) => {
                assert_eq!(scored.len(), 8);
                for entry in &scored {
                    assert_eq!(entry.score, round3(entry.score));
                }
            }
            other => panic!("expected review, got {other:?}"),
        }
    }

    #[test]
    fn missing_name_variant_scores_against_empty() {
        let cands = vec![SearchCandidate {
            id: 1,
            category: Category::Series,
            name: None,
            original_name: Some("Dark".to_string()),
            poster_path: Some("/p.jpg".to_string()),
        }];
        assert!(matches!(
            resolve("Dark", cands, &cfg(), IMAGE_BASE),
            Resolution::Matched(_)
        ));
    }

    #[test]
    fn prefer_exact_promotes_exact_match_with_poster() {
        // The posterless exact hit ranks first; with prefer_exact the
        // next exact hit that has a poster wins instead of a review.
        let cands = vec![
            candidate(1, Category::Series, "Dark", None),
            candidate(2, Category::Movie, "dark", Some("/movie.jpg")),
        ];
        let mut cfg = cfg();
        cfg.prefer_exact = true;
        match resolve("Dark", cands, &cfg, IMAGE_BASE) {
            Resolution::Matched(m) => assert_eq!(m.id, 2),
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn empty_candidate_list_goes_to_review() {
        match resolve("Dark", Vec::new(), &cfg(), IMAGE_BASE) {
            Resolution::NeedsReview(scored) => assert!(scored.is_empty()),
            other => panic!("expected review, got {other:?}"),
        }
    }

    #[test]
    fn trailer_prefers_official_trailer_or_teaser() {
        let videos = vec![
            VideoEntry {
                site: "YouTube".into(),
                kind: "Clip".into(),
                key: "clip".into(),
                official: Some(true),
            },
            VideoEntry {
                site: "YouTube".into(),
                kind: "Trailer".into(),
                key: "trailer".into(),
                official: Some(true),
            },
        ];
        assert_eq!(
            pick_trailer(&videos).as_deref(),
            Some("https://www.youtube.com/watch?v=trailer")
        );
    }

    #[test]
    fn trailer_tolerates_missing_official_flag() {
        let videos = vec![VideoEntry {
            site: "YouTube".into(),
            kind: "Teaser".into(),
            key: "teaser".into(),
            official: None,
        }];
        assert_eq!(
            pick_trailer(&videos).as_deref(),
            Some("https://www.youtube.com/watch?v=teaser")
        );
    }

    #[test]
    fn trailer_skips_unofficial_then_falls_back_to_any_youtube() {
        let videos = vec![
            VideoEntry {
                site: "Vimeo".into(),
                kind: "Trailer".into(),
                key: "vimeo".into(),
                official: Some(true),
            },
            VideoEntry {
                site: "YouTube".into(),
                kind: "Trailer".into(),
                key: "fan-cut".into(),
                official: Some(false),
            },
        ];
        // The unofficial trailer loses the preferred pass but wins the
        // any-YouTube fallback.
        assert_eq!(
            pick_trailer(&videos).as_deref(),
            Some("https://www.youtube.com/watch?v=fan-cut")
        );
    }

    #[test]
    fn no_youtube_entry_means_no_trailer() {
        let videos = vec![VideoEntry {
            site: "Vimeo".into(),
            kind: "Trailer".into(),
            key: "v".into(),
            official: Some(true),
        }];
        assert_eq!(pick_trailer(&videos), None);
    }
}
