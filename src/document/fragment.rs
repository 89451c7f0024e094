use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Matches the innermost balanced `{ ... }` containing a `title` and an
/// `image` string field, with an optional `trailer` field after `image`.
///
/// This is a shallow scan over the serialization format, not a parse: a
/// fragment containing nested braces (nested objects or arrays) breaks
/// the `[^{}]` character classes and is skipped or mis-extracted. That
/// limitation is inherited from the format this tool operates on and is
/// deliberate.
static FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\{([^{}]*?title\s*:\s*"([^"]+)"[^{}]*?image\s*:\s*"([^"]*)"(?:[^{}]*?trailer\s*:\s*"([^"]*)")?[^{}]*?)\}"#,
    )
    .expect("fragment regex is valid")
});

/// One record-like `{ ... }` span extracted from the source document.
///
/// `raw` reproduces the matched span byte-for-byte and doubles as the
/// patch precondition: a patch only applies while the document still
/// contains `raw` at the fragment's (shift-adjusted) span.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Verbatim matched text, including the outer braces.
    pub raw: String,
    /// Text between the outer braces.
    pub inner: String,
    /// Value of the `title` field.
    pub title: String,
    /// Value of the `image` field (may be empty).
    pub image: String,
    /// Value of the `trailer` field, when one was present after `image`.
    pub trailer: Option<String>,
    /// Byte range of `raw` in the document text at extraction time.
    pub span: Range<usize>,
    /// Document shift at the time `span` was recorded.
    pub(crate) base_shift: i64,
}

impl Fragment {
    /// Whether this fragment's image is a placeholder that should be
    /// replaced by a real poster.
    pub fn needs_enrichment(&self, placeholder_host: &str) -> bool {
        self.image.contains(placeholder_host)
    }
}

/// Scan `text` for record fragments in document order.
pub(crate) fn extract(text: &str, base_shift: i64) -> Vec<Fragment> {
    FRAGMENT_RE
        .captures_iter(text)
        .map(|caps| {
            let whole = caps.get(0).expect("capture 0 always present");
            Fragment {
                raw: whole.as_str().to_string(),
                inner: caps[1].to_string(),
                title: caps[2].to_string(),
                image: caps[3].to_string(),
                trailer: caps.get(4).map(|m| m.as_str().to_string()),
                span: whole.range(),
                base_shift,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
export const content = [
  {
    id: 1,
    title: "Stranger Things",
    image: "https://images.unsplash.com/photo-1.jpg",
    genre: "Sci-Fi",
  },
  {
    id: 2,
    title: "Dark",
    image: "https://image.tmdb.org/t/p/w500/dark.jpg",
    trailer: "https://www.youtube.com/watch?v=abc",
  },
];
"#;

    #[test]
    fn extracts_every_well_formed_fragment() {
        let frags = extract(DOC, 0);
        assert_eq!(frags.len(), 2);

        assert_eq!(frags[0].title, "Stranger Things");
        assert_eq!(frags[0].image, "https://images.unsplash.com/photo-1.jpg");
        assert_eq!(frags[0].trailer, None);

        assert_eq!(frags[1].title, "Dark");
        assert_eq!(
            frags[1].trailer.as_deref(),
            Some("https://www.youtube.com/watch?v=abc")
        );
    }

    #[test]
    fn raw_reproduces_source_span_exactly() {
        let frags = extract(DOC, 0);
        for frag in &frags {
            assert_eq!(&DOC[frag.span.clone()], frag.raw);
            assert!(frag.raw.starts_with('{') && frag.raw.ends_with('}'));
        }
    }

    #[test]
    fn fragments_without_title_or_image_are_ignored() {
        let doc = r#"{ id: 3, name: "no title field", image: "x" } { title: "no image" }"#;
        assert!(extract(doc, 0).is_empty());
    }

    #[test]
    fn nested_braces_break_extraction() {
        // Known limitation: the inner object terminates the character
        // class, so the outer fragment is not matched.
        let doc = r#"{ title: "Nested", meta: { lang: "en" }, image: "u" }"#;
        let frags = extract(doc, 0);
        assert!(frags.iter().all(|f| f.title != "Nested"));
    }

    #[test]
    fn empty_image_value_is_extracted() {
        let doc = r#"{ title: "Blank", image: "" }"#;
        let frags = extract(doc, 0);
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].image, "");
    }

    #[test]
    fn placeholder_detection() {
        let frags = extract(DOC, 0);
        assert!(frags[0].needs_enrichment("images.unsplash.com"));
        assert!(!frags[1].needs_enrichment("images.unsplash.com"));
    }
}
