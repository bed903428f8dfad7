// src/audit/mod.rs
// =============================================================================
// Runs a whole audit.
//
// How it works:
// 1. Validate the config (missing root = stop here)
// 2. Build the file index once; from now on it is read-only
// 3. Fan out: one blocking task per HTML document, at most `workers` at a
//    time. Every task reads the shared index and adds to the shared
//    reachability set. A failed document is logged and skipped.
// 4. Wait for every task. Only then derive orphans, duplicates and
//    site files, and optionally check external links.
//
// Submodules:
// - config: AuditConfig and defaults
// - worker: per-document read + analyze
// - site: duplicates and root-level site files
// =============================================================================

mod config;
mod site;
mod worker;

pub use config::{default_workers, AuditConfig, DEFAULT_BASE_URL};
pub use site::{Duplicates, SiteFiles};

use crate::checker::{check_links, KeywordMatcher, LinkCheckResult, PageContext, PageRecord};
use crate::error::DocumentAnalysisError;
use crate::graph::{find_orphans, ReachabilitySet};
use crate::index::{build_file_index, FileIndex};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct AuditOutcome {
    /// One record per analyzed document, sorted by path.
    pub records: Vec<PageRecord>,
    /// Documents that could not be analyzed, sorted.
    pub failed_documents: Vec<String>,
    pub orphans: Vec<String>,
    pub duplicates: Duplicates,
    pub site_files: SiteFiles,
    /// Empty unless external checking was requested.
    pub external_results: Vec<LinkCheckResult>,
}

impl AuditOutcome {
    pub fn broken_link_count(&self) -> usize {
        self.records.iter().map(|r| r.broken_links.len()).sum()
    }

    pub fn broken_image_count(&self) -> usize {
        self.records.iter().map(|r| r.broken_images.len()).sum()
    }

    pub fn broken_external(&self) -> impl Iterator<Item = &LinkCheckResult> {
        self.external_results.iter().filter(|r| !r.is_ok())
    }

    /// True when anything the audit can point at as broken was found.
    pub fn has_broken(&self) -> bool {
        self.records.iter().any(PageRecord::has_broken_references)
            || self.broken_external().next().is_some()
    }
}

pub async fn run_audit(config: &AuditConfig) -> Result<AuditOutcome> {
    config.validate()?;

    let index = Arc::new(build_file_index(&config.root)?);
    let keywords =
        Arc::new(KeywordMatcher::new(&config.keywords).context("invalid keyword pattern")?);
    let reachable = Arc::new(ReachabilitySet::new());

    let (records, failed_documents) =
        analyze_documents(&config.root, &index, &reachable, &keywords, config.workers).await;

    // Every worker has joined; the reachability set is final.
    if reachable.is_empty() {
        warn!("no internal link resolved; every page except the root is an orphan");
    }
    info!("{} distinct reachable paths recorded", reachable.len());
    debug!("reachable: {:?}", reachable.snapshot());
    let orphans = find_orphans(&index, &reachable, config.treat_root_as_reachable);
    let duplicates = site::find_duplicates(&records);
    let site_files = site::check_site_files(&config.root);

    let external_results = if config.check_external {
        let targets: BTreeSet<String> = records
            .iter()
            .flat_map(|r| r.external_targets.iter().cloned())
            .collect();
        check_links(targets.into_iter().collect()).await?
    } else {
        Vec::new()
    };

    Ok(AuditOutcome {
        records,
        failed_documents,
        orphans,
        duplicates,
        site_files,
        external_results,
    })
}

// Analyzes every HTML document in the index, `workers` at a time
//
// Returns: (records sorted by path, failed document paths sorted)
async fn analyze_documents(
    root: &Path,
    index: &Arc<FileIndex>,
    reachable: &Arc<ReachabilitySet>,
    keywords: &Arc<KeywordMatcher>,
    workers: usize,
) -> (Vec<PageRecord>, Vec<String>) {
    let documents: Vec<String> = index.html_documents().map(str::to_string).collect();
    info!(
        "analyzing {} HTML documents with {} workers",
        documents.len(),
        workers
    );

    let tasks = documents.into_iter().map(|document| {
        let root = root.to_path_buf();
        let index = Arc::clone(index);
        let reachable = Arc::clone(reachable);
        let keywords = Arc::clone(keywords);

        async move {
            let name = document.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let ctx = PageContext {
                    index: &index,
                    reachable: &reachable,
                    keywords: &keywords,
                };
                worker::analyze_file(&root, &document, ctx)
            });

            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(DocumentAnalysisError::Task {
                    path: name.clone(),
                    message: e.to_string(),
                }),
            };
            (name, result)
        }
    });

    let results: Vec<_> = stream::iter(tasks)
        .buffer_unordered(workers.max(1))
        .collect()
        .await;

    let mut records = Vec::with_capacity(results.len());
    let mut failed = Vec::new();
    for (document, result) in results {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                error!("error analyzing {}: {}", document, e);
                failed.push(document);
            }
        }
    }

    records.sort_by(|a, b| a.path.cmp(&b.path));
    failed.sort();
    (records, failed)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is spawn_blocking?
//    - Reading a file and parsing HTML is CPU and disk work, not waiting
//    - Doing it directly in async code would stall tokio's worker threads
//    - spawn_blocking moves the closure onto a separate thread pool made
//      for this kind of work, and gives back a handle we can .await
//
// 2. What does buffer_unordered(workers) do?
//    - Takes a stream of futures and keeps at most `workers` running
//    - Yields results in completion order, not input order
//    - That is why records are sorted by path afterwards
//
// 3. Why Arc::clone for every task?
//    - Each spawned task must own what it uses ('static)
//    - Arc::clone only bumps a counter; the index itself is not copied
//
// 4. Where is the "barrier"?
//    - collect().await on the stream only returns once every task is done
//    - Orphans are derived after that line, so no worker can still be
//      adding to the reachability set
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn page(links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|l| format!(r#"<a href="{}">x</a>"#, l))
            .collect();
        format!("<html><head><title>t</title></head><body>{}</body></html>", anchors)
    }

    // A = home, B = about, C = never linked
    fn three_page_site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.html", &page(&["about/", "/missing.html"]));
        write(dir.path(), "about/index.html", &page(&["../", "../img/a.png"]));
        write(dir.path(), "c.html", &page(&["/about/"]));
        write(dir.path(), "img/a.png", "png");
        dir
    }

    #[tokio::test]
    async fn test_three_page_site() {
        let site = three_page_site();
        let config = AuditConfig::new(site.path());
        let outcome = run_audit(&config).await.unwrap();

        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.orphans, vec!["/c.html"]);
        assert_eq!(outcome.broken_link_count(), 1);
        assert!(outcome.has_broken());
        assert!(outcome.failed_documents.is_empty());

        let home = &outcome.records[2];
        assert_eq!(home.path, "/index.html");
        assert_eq!(home.broken_links, vec!["/missing.html"]);
    }

    #[tokio::test]
    async fn test_without_root_bypass_home_is_orphan_when_unlinked() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.html", &page(&["a.html"]));
        write(dir.path(), "a.html", &page(&[]));

        let mut config = AuditConfig::new(dir.path());
        config.treat_root_as_reachable = false;
        let outcome = run_audit(&config).await.unwrap();
        assert_eq!(outcome.orphans, vec!["/index.html"]);
    }

    #[tokio::test]
    async fn test_missing_root_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = AuditConfig::new(dir.path().join("nope"));
        let err = run_audit(&config).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_matches_sequential() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..40 {
            let links = [format!("p{}.html", (i + 1) % 40), format!("p{}.html", (i * 7) % 40)];
            let refs: Vec<&str> = links.iter().map(String::as_str).collect();
            write(dir.path(), &format!("p{}.html", i), &page(&refs));
        }
        let index = Arc::new(build_file_index(dir.path()).unwrap());
        let keywords = Arc::new(KeywordMatcher::new(&[]).unwrap());

        let sequential = Arc::new(ReachabilitySet::new());
        let (seq_records, _) =
            analyze_documents(dir.path(), &index, &sequential, &keywords, 1).await;

        let parallel = Arc::new(ReachabilitySet::new());
        let (par_records, _) =
            analyze_documents(dir.path(), &index, &parallel, &keywords, 16).await;

        assert_eq!(sequential.snapshot(), parallel.snapshot());
        assert_eq!(seq_records, par_records);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_document_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.html", &page(&["locked.html"]));
        write(dir.path(), "locked.html", &page(&[]));
        let locked = dir.path().join("locked.html");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root can read anything; nothing to test in that case
        if fs::read(&locked).is_ok() {
            return;
        }

        let outcome = run_audit(&AuditConfig::new(dir.path())).await.unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.failed_documents, vec!["/locked.html"]);
    }
}
