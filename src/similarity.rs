//! Normalized string similarity used to score search candidates.
//!
//! Scoring is `1 - editDistance(a, b) / max(len(a), len(b))` over
//! case-folded input, where the edit distance is the classic unit-cost
//! insert/delete/substitute distance. The comparison is codepoint-level;
//! no Unicode normalization is applied beyond lowercase folding.

/// Unit-cost edit distance between `a` and `b`, case-insensitive.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two-row DP over the (len(a)+1) x (len(b)+1) distance matrix.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Similarity score in `[0, 1]`.
///
/// Two empty strings score 0: an all-empty comparison carries no
/// information, so callers must not read a 0 here as a confident
/// mismatch without checking for that case. An empty string against a
/// nonempty one scores 0 as well (distance equals the nonempty length).
pub fn score(a: &str, b: &str) -> f64 {
    // Fold case up front so the length normalizer counts the same
    // characters the distance saw.
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(score("Stranger Things", "Stranger Things"), 1.0);
        assert_eq!(score("a", "a"), 1.0);
    }

    #[test]
    fn case_is_folded() {
        assert_eq!(score("DARK", "dark"), 1.0);
        assert_eq!(levenshtein("Breaking Bad", "breaking bad"), 0);
    }

    #[test]
    fn both_empty_scores_zero() {
        assert_eq!(score("", ""), 0.0);
    }

    #[test]
    fn empty_vs_nonempty_scores_zero() {
        // Distance equals the nonempty length, so the score bottoms out.
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(score("", "abc"), 0.0);
        assert_eq!(score("abc", ""), 0.0);
    }

    #[test]
    fn symmetric() {
        let pairs = [("Alien", "Aliens"), ("Dune", "Dune: Part Two"), ("", "x")];
        for (a, b) in pairs {
            assert_eq!(score(a, b), score(b, a));
        }
    }

    #[test]
    fn single_edit() {
        assert_eq!(levenshtein("kitten", "sitten"), 1);
        assert_eq!(levenshtein("Alien", "Aliens"), 1);
        let s = score("Alien", "Aliens");
        assert!((s - (1.0 - 1.0 / 6.0)).abs() < 1e-9);
    }

    #[test]
    fn disjoint_strings() {
        assert_eq!(levenshtein("abc", "xyz"), 3);
        assert_eq!(score("abc", "xyz"), 0.0);
    }

    #[test]
    fn score_within_unit_interval() {
        let cases = [
            ("The Office", "The Office (US)"),
            ("Dark", "Darker"),
            ("x", "yyyyyyyy"),
        ];
        for (a, b) in cases {
            let s = score(a, b);
            assert!((0.0..=1.0).contains(&s), "score({a:?}, {b:?}) = {s}");
        }
    }
}
