// src/checker/mod.rs
// =============================================================================
// This module turns one HTML page into a PageRecord.
//
// Submodules:
// - html: parses the page with scraper, extracts references and metadata
// - links: classifies references and feeds the reachability set
// - keywords: keyword density patterns
// - record: the PageRecord type itself
// - http: optional network check of external links
// =============================================================================

mod html;
mod http;
mod keywords;
mod links;
mod record;

pub use html::{analyze_page, PageContext};
pub use http::{check_links, LinkCheckResult};
pub use keywords::KeywordMatcher;
pub use record::PageRecord;
