// src/checker/links.rs
// =============================================================================
// Classifies every reference on one page and tallies the outcome.
//
// For each LinkReference:
// - external  -> counted (hyperlinks), insecure http:// noted
// - resolved  -> counted as internal, recorded in the shared ReachabilitySet
//                unless it points back at the page itself
// - broken    -> kept verbatim in broken_links / broken_images
//
// The FileIndex is only read. The ReachabilitySet only grows.
// =============================================================================

use crate::graph::ReachabilitySet;
use crate::index::FileIndex;
use crate::resolver::{classify, document_dir, Classification, LinkKind, LinkReference};
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub internal_links: usize,
    pub external_links: usize,
    pub broken_links: Vec<String>,
    pub broken_images: Vec<String>,
    /// Some hyperlink or image uses plain http://
    pub insecure: bool,
    /// External http(s) hyperlink targets, for the optional liveness check.
    pub external_targets: Vec<String>,
}

// Resolves all references of a page against the index
//
// Parameters:
//   document: root-relative path of the page ("/a/b/page.html")
//   references: everything extracted from that page
//   index: the run's file index
//   reachable: the run's shared reachability accumulator
pub fn resolve_references(
    document: &str,
    references: &[LinkReference],
    index: &FileIndex,
    reachable: &ReachabilitySet,
) -> LinkSummary {
    let current_dir = document_dir(document);
    let mut summary = LinkSummary::default();

    for reference in references {
        let classification = classify(&reference.raw_target, &current_dir, index);

        match (&classification, reference.kind) {
            (Classification::External { insecure }, kind) => {
                summary.insecure |= *insecure;
                if kind == LinkKind::Hyperlink {
                    summary.external_links += 1;
                    if is_checkable_link(&reference.raw_target) {
                        summary.external_targets.push(reference.raw_target.trim().to_string());
                    }
                }
            }
            (Classification::Resolved(target), kind) => {
                if kind == LinkKind::Hyperlink {
                    summary.internal_links += 1;
                }
                if !target.points_to(document) {
                    reachable.record(target);
                }
            }
            (Classification::Broken, LinkKind::Hyperlink) => {
                debug!(
                    "broken link {} in {}",
                    reference.raw_target, reference.origin_document
                );
                summary.internal_links += 1;
                summary.broken_links.push(reference.raw_target.clone());
            }
            (Classification::Broken, LinkKind::ImageSource) => {
                debug!(
                    "broken image {} in {}",
                    reference.raw_target, reference.origin_document
                );
                summary.broken_images.push(reference.raw_target.clone());
            }
        }
    }

    summary
}

// Only absolute http/https URLs can be checked over the network; the
// "//host/path" form has no scheme to request with.
fn is_checkable_link(raw: &str) -> bool {
    Url::parse(raw.trim())
        .map(|url| url.scheme() == "http" || url.scheme() == "https")
        .unwrap_or(false)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why match on a tuple (classification, kind)?
//    - The outcome depends on both: a broken image goes to broken_images,
//      a broken hyperlink to broken_links
//    - The compiler checks every combination is handled
//
// 2. Why &ReachabilitySet and not &mut?
//    - Many pages run at once and all of them record into the same set
//    - The set handles its own locking, so a shared reference is enough
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(raw: &str, kind: LinkKind, origin: &str) -> LinkReference {
        LinkReference {
            raw_target: raw.to_string(),
            kind,
            origin_document: origin.to_string(),
        }
    }

    fn index() -> FileIndex {
        FileIndex::from_paths([
            "/index.html",
            "/about.html",
            "/docs/index.html",
            "/img/logo.png",
        ])
    }

    #[test]
    fn test_counts_and_broken_lists() {
        let refs = vec![
            reference("about.html", LinkKind::Hyperlink, "/index.html"),
            reference("https://example.com/x", LinkKind::Hyperlink, "/index.html"),
            reference("mailto:hi@example.com", LinkKind::Hyperlink, "/index.html"),
            reference("/nope/missing.html", LinkKind::Hyperlink, "/index.html"),
            reference("img/logo.png", LinkKind::ImageSource, "/index.html"),
            reference("img/gone.png", LinkKind::ImageSource, "/index.html"),
        ];
        let reachable = ReachabilitySet::new();
        let summary = resolve_references("/index.html", &refs, &index(), &reachable);

        assert_eq!(summary.internal_links, 2);
        assert_eq!(summary.external_links, 2);
        assert_eq!(summary.broken_links, vec!["/nope/missing.html"]);
        assert_eq!(summary.broken_images, vec!["img/gone.png"]);
        assert_eq!(summary.external_targets, vec!["https://example.com/x"]);
        assert!(!summary.insecure);
        assert!(reachable.contains("/about.html"));
        assert!(reachable.contains("/img/logo.png"));
    }

    #[test]
    fn test_broken_target_is_kept_as_authored() {
        let refs = vec![reference("../Missing Page.html?x=1", LinkKind::Hyperlink, "/docs/index.html")];
        let summary =
            resolve_references("/docs/index.html", &refs, &index(), &ReachabilitySet::new());
        assert_eq!(summary.broken_links, vec!["../Missing Page.html?x=1"]);
    }

    #[test]
    fn test_self_links_do_not_count_as_reachable() {
        let refs = vec![
            reference("./", LinkKind::Hyperlink, "/docs/index.html"),
            reference("index.html#top", LinkKind::Hyperlink, "/docs/index.html"),
        ];
        let reachable = ReachabilitySet::new();
        let summary = resolve_references("/docs/index.html", &refs, &index(), &reachable);

        assert_eq!(summary.internal_links, 2);
        assert!(reachable.is_empty());
    }

    #[test]
    fn test_insecure_external_reference() {
        let refs = vec![reference("http://example.com/logo.png", LinkKind::ImageSource, "/index.html")];
        let summary = resolve_references("/index.html", &refs, &index(), &ReachabilitySet::new());
        assert!(summary.insecure);
        assert_eq!(summary.external_links, 0);
    }

    #[test]
    fn test_fragment_only_links_are_external() {
        let refs = vec![reference("#faq", LinkKind::Hyperlink, "/about.html")];
        let summary = resolve_references("/about.html", &refs, &index(), &ReachabilitySet::new());
        assert_eq!(summary.external_links, 1);
        assert!(summary.external_targets.is_empty());
        assert!(summary.broken_links.is_empty());
    }
}
