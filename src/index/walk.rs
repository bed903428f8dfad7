// src/index/walk.rs
// =============================================================================
// Walks the document root once and records every file.
//
// How it works:
// 1. Check the root exists and is a directory (otherwise: ConfigurationError)
// 2. Walk it recursively, pruning SKIP_DIRS before descending
// 3. Turn each file path into "/a/b/c.html" form, always with '/'
//
// No file content is read here. Entries that cannot be read while walking
// (permissions, races with deletions) are logged and skipped.
// =============================================================================

use super::{FileIndex, SKIP_DIRS};
use crate::error::ConfigurationError;
use std::path::{Component, Path};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

// Builds the file index for `root`
//
// Returns: the index, or ConfigurationError if the root is unusable
pub fn build_file_index(root: &Path) -> Result<FileIndex, ConfigurationError> {
    if !root.exists() {
        return Err(ConfigurationError::MissingRoot(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ConfigurationError::NotADirectory(root.to_path_buf()));
    }

    let mut paths = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(rel) = root_relative(root, entry.path()) {
            paths.push(rel);
        }
    }

    let index = FileIndex::from_paths(paths);

    debug!(
        "index directories: {}",
        index.index_dirs().collect::<Vec<_>>().join(", ")
    );
    info!(
        "indexed {} files and {} index directories",
        index.file_count(),
        index.index_dir_count()
    );

    Ok(index)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}

// Converts an on-disk path under `root` into "/x/y" form
//
// Joins the normal components with '/', so the result is the same on
// every host OS.
fn root_relative(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut out = String::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            out.push('/');
            out.push_str(&part.to_string_lossy());
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does filter_entry do?
//    - It decides, per entry, whether the walker goes on with it
//    - Returning false for a directory skips everything below it, so
//      node_modules is never even opened
//    - depth() == 0 is the root itself, which is always kept
//
// 2. Why Result<FileIndex, ConfigurationError> and not anyhow::Result?
//    - Callers can match on the exact variant (MissingRoot, NotADirectory)
//    - anyhow is used higher up, where only the message matters
//
// 3. What is Option<String> with ? inside root_relative()?
//    - strip_prefix(...).ok()? returns None early if the path is not under
//      the root, the same way ? returns an Err early
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<html></html>").unwrap();
    }

    #[test]
    fn test_builds_files_and_index_dirs() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.html");
        write(dir.path(), "about/index.html");
        write(dir.path(), "about/team.html");
        write(dir.path(), "css/site.css");

        let index = build_file_index(dir.path()).unwrap();
        let files: Vec<_> = index.files().collect();
        assert_eq!(
            files,
            vec!["/about/index.html", "/about/team.html", "/css/site.css", "/index.html"]
        );
        let dirs: Vec<_> = index.index_dirs().collect();
        assert_eq!(dirs, vec!["/", "/about/"]);
    }

    #[test]
    fn test_skips_excluded_directories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.html");
        write(dir.path(), ".git/index.html");
        write(dir.path(), "node_modules/pkg/readme.html");
        write(dir.path(), "backups/old/index.html");

        let index = build_file_index(dir.path()).unwrap();
        assert_eq!(index.file_count(), 1);
        assert!(!index.is_index_dir("/backups/old/"));
    }

    #[test]
    fn test_skip_applies_to_directories_only() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "backups");

        let index = build_file_index(dir.path()).unwrap();
        assert!(index.contains_file("/backups"));
    }

    #[test]
    fn test_rebuild_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.html");
        write(dir.path(), "a/b/c.html");
        write(dir.path(), "a/index.html");

        let first = build_file_index(dir.path()).unwrap();
        let second = build_file_index(dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_disk_index_matches_in_memory_index() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.html");
        write(dir.path(), "docs/INDEX.html");
        write(dir.path(), "docs/a b.html");

        let from_disk = build_file_index(dir.path()).unwrap();
        let in_memory = FileIndex::from_paths(["/index.html", "/docs/INDEX.html", "/docs/a b.html"]);
        assert_eq!(from_disk, in_memory);
        assert!(from_disk.is_index_dir("/docs/"));
    }

    #[test]
    fn test_missing_root_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = build_file_index(&missing).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingRoot(_)));
    }

    #[test]
    fn test_file_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "page.html");
        let err = build_file_index(&dir.path().join("page.html")).unwrap_err();
        assert!(matches!(err, ConfigurationError::NotADirectory(_)));
    }
}
