// src/resolver/classify.rs
// =============================================================================
// Decides what a single href/src value points at.
//
// Every target ends up in exactly one bucket:
// - External: another origin or a non-navigational scheme (mailto:, tel:,
//   data:, javascript:), a same-page "#fragment", or a blank value
// - Resolved: an internal path that exists in the file index
// - Broken:   an internal path that does not
//
// Classification only reads the FileIndex, so any number of documents can be
// classified at the same time against one shared index.
// =============================================================================

use super::path::{
    normalize_path, page_identity, split_url, strip_index_document, with_trailing_slash,
};
use crate::index::{FileIndex, INDEX_DOCUMENT};
use percent_encoding::percent_decode_str;
use url::Url;

// Prefixes that always mean "not a file in this site" (compared lowercase)
const EXTERNAL_PREFIXES: &[&str] = &[
    "http://",
    "https://",
    "//",
    "mailto:",
    "tel:",
    "data:",
    "javascript:",
    "#",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Hyperlink,
    ImageSource,
}

/// One href/src value found in a document, exactly as authored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    pub raw_target: String,
    pub kind: LinkKind,
    /// Root-relative path of the document holding the reference.
    pub origin_document: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Root-relative path, query and fragment removed. Index directories
    /// are always in their trailing-slash form ("/docs/").
    pub canonical_path: String,
    /// `canonical_path` with the authored query and fragment put back.
    pub url: String,
}

impl ResolvedTarget {
    /// The two spellings recorded as reachable: without and with the
    /// trailing slash.
    pub fn reachability_keys(&self) -> [String; 2] {
        let bare = self.canonical_path.trim_end_matches('/');
        [bare.to_string(), format!("{}/", bare)]
    }

    /// True when this target is the page `document` itself.
    pub fn points_to(&self, document: &str) -> bool {
        page_identity(&self.canonical_path) == page_identity(document)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    External {
        /// The target uses plain http://
        insecure: bool,
    },
    Resolved(ResolvedTarget),
    Broken,
}

// True when `raw` must never be looked up in the file index
//
// Blank values count as external: an empty href is a no-op, not a broken
// link.
pub fn is_external(raw: &str) -> bool {
    let target = raw.trim();
    if target.is_empty() {
        return true;
    }

    let lower = target.to_ascii_lowercase();
    if EXTERNAL_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
        return true;
    }

    // Any other "scheme:..." value (ftp:, sms:, about:). Relative paths
    // fail to parse without a base URL.
    Url::parse(target).is_ok()
}

pub fn is_insecure(raw: &str) -> bool {
    raw.trim().to_ascii_lowercase().starts_with("http://")
}

// Classifies one link target
//
// Parameters:
//   raw_target: the attribute value as authored
//   current_dir: directory of the document holding it ("/a/b", root is "/")
//   index: the file index for this run
//
// Example, with "/docs/index.html" in the index:
//   classify("/docs", "/", &index)            -> Resolved("/docs/")
//   classify("docs/index.html", "/", &index)  -> Resolved("/docs/")
//   classify("/nope.html", "/", &index)       -> Broken
pub fn classify(raw_target: &str, current_dir: &str, index: &FileIndex) -> Classification {
    let target = raw_target.trim();
    if is_external(target) {
        return Classification::External {
            insecure: is_insecure(target),
        };
    }

    let parts = split_url(target);

    // The path as authored first; a file may really have '%' in its name.
    let raw = normalize_path(parts.path, current_dir);
    let normalized = if exists_in(index, &raw) {
        raw
    } else {
        let decoded = percent_decode_str(parts.path).decode_utf8_lossy();
        let decoded = normalize_path(&decoded, current_dir);
        if !exists_in(index, &decoded) {
            return Classification::Broken;
        }
        decoded
    };
    let slashed = with_trailing_slash(&normalized);

    let canonical_path = if index.is_index_dir(&slashed) {
        slashed
    } else {
        match strip_index_document(&normalized) {
            Some(dir) if index.is_index_dir(dir) => dir.to_string(),
            _ => normalized,
        }
    };
    let url = format!("{}{}{}", canonical_path, parts.query, parts.fragment);

    Classification::Resolved(ResolvedTarget {
        canonical_path,
        url,
    })
}

// A file, an index directory, or a directory holding index.html
fn exists_in(index: &FileIndex, normalized: &str) -> bool {
    let slashed = with_trailing_slash(normalized);
    index.contains_file(normalized)
        || index.is_index_dir(&slashed)
        || index.contains_file(&format!("{}{}", slashed, INDEX_DOCUMENT))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does classify() return an enum instead of Option<String>?
//    - Three outcomes exist, not two: external, resolved, broken
//    - match on Classification makes the caller handle all three
//
// 2. What is Cow (from decode_utf8_lossy)?
//    - "Clone on write": borrows the input when nothing was decoded,
//      allocates only when a %XX sequence had to be replaced
//    - &decoded turns it back into a &str
//
// 3. Why [String; 2] for reachability_keys?
//    - Exactly two keys always exist, so a fixed-size array says so in the
//      type; callers can still iterate over it
// -----------------------------------------------------------------------------
