// src/graph/orphans.rs
// =============================================================================
// Finds HTML pages that no other page links to.
//
// Runs once, after every document worker has finished. It only compares the
// file index against the reachability set; no file is opened.
//
// A page counts as linked if any of these is in the set:
//   its identity            "/docs"       (index.html and trailing '/' removed)
//   its identity + '/'      "/docs/"
//   its full path           "/docs/index.html"
//
// The home page (root index.html) is usually never linked from elsewhere
// under its own name. With `treat_root_as_reachable` it is skipped
// explicitly, and the skip is logged.
// =============================================================================

use super::ReachabilitySet;
use crate::index::FileIndex;
use crate::resolver::page_identity;
use tracing::{debug, info};

// Returns orphan document paths, sorted
pub fn find_orphans(
    index: &FileIndex,
    reachable: &ReachabilitySet,
    treat_root_as_reachable: bool,
) -> Vec<String> {
    let mut orphans = Vec::new();

    for document in index.html_documents() {
        let identity = page_identity(document);

        if identity.is_empty() && treat_root_as_reachable {
            debug!("treating entry document {} as reachable", document);
            continue;
        }

        let linked = reachable.contains(identity)
            || reachable.contains(&format!("{}/", identity))
            || reachable.contains(document);
        if !linked {
            orphans.push(document.to_string());
        }
    }

    // html_documents() is already ordered; sort anyway so the contract does
    // not depend on the index's storage.
    orphans.sort();
    info!("found {} orphan pages", orphans.len());
    orphans
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why three contains() checks per page?
//    - A link to "/docs/" is stored as "/docs" and "/docs/"
//    - A link to "/about.html" is stored as "/about.html" and "/about.html/"
//    - Checking the identity, identity + "/" and the full path covers both
//      without caring which spelling the linking page used
//
// 2. Why does this take &ReachabilitySet and not the DashSet?
//    - Callers only see the operations the set promises (record, contains)
//    - How it is stored can change without touching this file
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{classify, ResolvedTarget};

    fn record(set: &ReachabilitySet, raw: &str, dir: &str, index: &FileIndex) {
        if let crate::resolver::Classification::Resolved(target) = classify(raw, dir, index) {
            set.record(&target);
        }
    }

    #[test]
    fn test_three_page_site_with_root_bypass() {
        // A = home, B = about, C = never linked
        let index = FileIndex::from_paths(["/index.html", "/about.html", "/hidden.html"]);
        let set = ReachabilitySet::new();
        record(&set, "about.html", "/", &index);

        let orphans = find_orphans(&index, &set, true);
        assert_eq!(orphans, vec!["/hidden.html"]);
    }

    #[test]
    fn test_root_reported_without_bypass() {
        let index = FileIndex::from_paths(["/index.html", "/about.html"]);
        let set = ReachabilitySet::new();
        record(&set, "/about.html", "/", &index);

        let orphans = find_orphans(&index, &set, false);
        assert_eq!(orphans, vec!["/index.html"]);
    }

    #[test]
    fn test_directory_pages_match_any_slash_style() {
        let index = FileIndex::from_paths(["/index.html", "/docs/index.html", "/blog/index.html"]);
        let set = ReachabilitySet::new();
        set.record(&ResolvedTarget {
            canonical_path: "/docs".to_string(),
            url: "/docs".to_string(),
        });
        set.record(&ResolvedTarget {
            canonical_path: "/blog/".to_string(),
            url: "/blog/".to_string(),
        });

        assert!(find_orphans(&index, &set, true).is_empty());
    }

    #[test]
    fn test_suffix_lookalike_is_not_over_stripped() {
        // "/media/thin.html" must stay "/media/thin.html", not "/media/t"
        let index = FileIndex::from_paths(["/index.html", "/media/thin.html", "/media/t"]);
        let set = ReachabilitySet::new();
        record(&set, "/media/t", "/", &index);

        assert_eq!(find_orphans(&index, &set, true), vec!["/media/thin.html"]);
    }

    #[test]
    fn test_non_html_files_are_never_orphans() {
        let index = FileIndex::from_paths(["/index.html", "/robots.txt", "/img/a.png"]);
        let set = ReachabilitySet::new();
        assert!(find_orphans(&index, &set, true).is_empty());
    }

    #[test]
    fn test_orphans_are_sorted() {
        let index = FileIndex::from_paths(["/z.html", "/a.html", "/m/index.html"]);
        let set = ReachabilitySet::new();
        assert_eq!(
            find_orphans(&index, &set, true),
            vec!["/a.html", "/m/index.html", "/z.html"]
        );
    }
}
