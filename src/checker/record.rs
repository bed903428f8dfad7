// src/checker/record.rs
// =============================================================================
// PageRecord: everything the audit learns about one HTML page.
//
// One record is produced per successfully analyzed document and never
// changed afterwards. The report writer reads these; the JSON inventory is
// a straight serialization of them.
// =============================================================================

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageRecord {
    /// Root-relative path ("/about/index.html")
    pub path: String,

    // Head metadata
    pub title: String,
    pub title_length: usize,
    pub description: String,
    pub desc_length: usize,
    pub lang: String,
    pub canonical: String,
    pub hreflang: String,
    pub has_viewport: bool,
    pub charset: String,
    pub has_robots_meta: bool,
    pub has_og_tags: bool,
    pub has_twitter_cards: bool,
    pub has_schema: bool,
    pub has_structured_data_errors: bool,
    pub has_favicon: bool,

    // Content
    pub h1: String,
    pub multiple_h1: bool,
    pub h2_count: usize,
    pub word_count: usize,
    pub keyword_densities: BTreeMap<String, f64>,
    pub has_language_switcher: bool,
    pub content_size_kb: f64,

    // Links
    pub internal_links: usize,
    pub external_links: usize,
    pub broken_links: Vec<String>,
    /// No insecure http:// reference and the canonical, if any, is https.
    pub has_https: bool,

    // Images
    pub images: usize,
    pub missing_alt_images: usize,
    pub poor_alt_images: usize,
    pub broken_images: Vec<String>,
    pub missing_image_dimensions: usize,
    pub has_lazy_loading: bool,

    #[serde(skip)]
    pub external_targets: Vec<String>,
}

impl PageRecord {
    pub fn has_broken_references(&self) -> bool {
        !self.broken_links.is_empty() || !self.broken_images.is_empty()
    }
}
