// src/graph/reachability.rs
// =============================================================================
// The set of canonical paths that some other page links to.
//
// Every document worker writes into the same set while it runs, so the set
// has to accept inserts from many threads at once. Inserts are unions only:
// order does not matter and inserting a path twice is a no-op, so the final
// contents are the same for any interleaving of workers.
//
// Reads (contains / snapshot) are meant for after all workers have joined.
// =============================================================================

use crate::resolver::ResolvedTarget;
use dashmap::DashSet;
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct ReachabilitySet {
    paths: DashSet<String>,
}

impl ReachabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a resolved target under both trailing-slash spellings.
    pub fn record(&self, target: &ResolvedTarget) {
        for key in target.reachability_keys() {
            self.paths.insert(key);
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Ordered copy of the current contents.
    pub fn snapshot(&self) -> BTreeSet<String> {
        self.paths.iter().map(|entry| entry.key().clone()).collect()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why DashSet instead of Mutex<HashSet>?
//    - DashSet splits its contents into shards, each with its own lock
//    - Two workers inserting different paths rarely wait on each other
//    - insert() takes &self, so the set can sit behind a plain Arc
//
// 2. Why is snapshot() a BTreeSet?
//    - DashSet iterates in no particular order
//    - A BTreeSet is sorted, so two snapshots compare equal with ==
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn target(path: &str) -> ResolvedTarget {
        ResolvedTarget {
            canonical_path: path.to_string(),
            url: path.to_string(),
        }
    }

    #[test]
    fn test_record_inserts_both_forms() {
        let set = ReachabilitySet::new();
        set.record(&target("/docs/"));
        assert!(set.contains("/docs"));
        assert!(set.contains("/docs/"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_duplicate_record_is_harmless() {
        let set = ReachabilitySet::new();
        set.record(&target("/about.html"));
        set.record(&target("/about.html"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_concurrent_inserts_match_sequential() {
        let paths: Vec<String> = (0..200).map(|i| format!("/p{}.html", i % 50)).collect();

        let sequential = ReachabilitySet::new();
        for p in &paths {
            sequential.record(&target(p));
        }

        let shared = Arc::new(ReachabilitySet::new());
        let handles: Vec<_> = paths
            .chunks(25)
            .map(|chunk| {
                let shared = Arc::clone(&shared);
                let chunk = chunk.to_vec();
                std::thread::spawn(move || {
                    for p in chunk.iter().rev() {
                        shared.record(&target(p));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.snapshot(), sequential.snapshot());
    }
}
