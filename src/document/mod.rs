//! Source document handling: fragment extraction and in-place patching.
//!
//! The document is a semi-structured JS-like text blob holding many record
//! fragments. Patching rewrites only the bytes inside a fragment's span;
//! everything around it is preserved exactly. Instead of whole-document
//! substring replacement, patches splice by byte offset with a cumulative
//! shift, so two textually identical fragments patch independently.

mod fragment;

pub use fragment::Fragment;

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static IMAGE_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"image\s*:\s*"[^"]*""#).expect("image field regex is valid"));

static TRAILER_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"trailer\s*:\s*"[^"]*""#).expect("trailer field regex is valid"));

/// A patch precondition failed: the document no longer contains the
/// fragment's text at its recorded span.
///
/// Raised when a caller applies patches out of document order or holds a
/// fragment extracted from an older revision of the text. The legacy
/// behavior here was a silent no-op; surfacing it keeps a bad patch from
/// vanishing without a trace.
#[derive(Debug, Error)]
#[error("fragment {title:?} no longer matches the document at its recorded span")]
pub struct PatchError {
    pub title: String,
}

/// The mutable source document.
///
/// Fragments are extracted with byte spans; each applied patch records the
/// resulting length change so later fragments' spans stay addressable.
/// Patches must be applied in document order (left to right), and a
/// re-patch of the same record must use the fragment returned by the
/// previous patch.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    /// Cumulative byte-length change from all applied patches.
    shift: i64,
}

impl Document {
    pub fn new(text: String) -> Self {
        Self { text, shift: 0 }
    }

    /// Current document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the document, returning the final text.
    pub fn into_text(self) -> String {
        self.text
    }

    /// Extract record fragments from the current text, in document order.
    pub fn fragments(&self) -> Vec<Fragment> {
        fragment::extract(&self.text, self.shift)
    }

    /// Replace the fragment's image URL and splice the patched fragment
    /// back into the document. Every occurrence of the old URL inside the
    /// fragment span is rewritten; an empty old value falls back to
    /// rewriting the `image` field itself (replacing an empty string
    /// occurrence-wise would corrupt the fragment).
    ///
    /// Returns the updated fragment for use in any follow-up patch.
    pub fn patch_image(&mut self, frag: &Fragment, new_image: &str) -> Result<Fragment, PatchError> {
        let span = self.locate(frag)?;

        let new_raw = if frag.image.is_empty() {
            IMAGE_FIELD_RE
                .replace(&frag.raw, regex::NoExpand(&format!("image: \"{new_image}\"")))
                .into_owned()
        } else {
            frag.raw.replace(&frag.image, new_image)
        };

        Ok(self.splice(frag, span, new_raw, new_image.to_string(), frag.trailer.clone()))
    }

    /// Set the fragment's trailer URL: replace the existing `trailer`
    /// field value, or inject a new field just before the closing brace.
    ///
    /// Returns the updated fragment for use in any follow-up patch.
    pub fn patch_trailer(
        &mut self,
        frag: &Fragment,
        trailer_url: &str,
    ) -> Result<Fragment, PatchError> {
        let span = self.locate(frag)?;

        let replacement = format!("trailer: \"{trailer_url}\"");
        let new_raw = if TRAILER_FIELD_RE.is_match(&frag.raw) {
            TRAILER_FIELD_RE
                .replace(&frag.raw, regex::NoExpand(&replacement))
                .into_owned()
        } else {
            // `raw` always ends with the closing brace; inject before it.
            format!("{}, {replacement}}}", &frag.raw[..frag.raw.len() - 1])
        };

        Ok(self.splice(
            frag,
            span,
            new_raw,
            frag.image.clone(),
            Some(trailer_url.to_string()),
        ))
    }

    /// Resolve the fragment's span against the current text and verify
    /// the patch precondition.
    fn locate(&self, frag: &Fragment) -> Result<Range<usize>, PatchError> {
        let start = frag.span.start as i64 + (self.shift - frag.base_shift);
        let start = usize::try_from(start).map_err(|_| PatchError {
            title: frag.title.clone(),
        })?;
        let end = start + frag.raw.len();

        if self.text.get(start..end) != Some(frag.raw.as_str()) {
            return Err(PatchError {
                title: frag.title.clone(),
            });
        }
        Ok(start..end)
    }

    fn splice(
        &mut self,
        frag: &Fragment,
        span: Range<usize>,
        new_raw: String,
        image: String,
        trailer: Option<String>,
    ) -> Fragment {
        let old_len = span.end - span.start;
        self.text.replace_range(span.clone(), &new_raw);
        self.shift += new_raw.len() as i64 - old_len as i64;

        // The returned span is in current-text coordinates, so it pairs
        // with the just-updated shift as its base.
        let inner = new_raw[1..new_raw.len() - 1].to_string();
        let new_span = span.start..span.start + new_raw.len();
        Fragment {
            raw: new_raw,
            inner,
            title: frag.title.clone(),
            image,
            trailer,
            span: new_span,
            base_shift: self.shift,
        }
    }
}
