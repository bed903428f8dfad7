// src/index/mod.rs
// =============================================================================
// The file index: every file under the document root, as root-relative
// absolute paths ("/about/index.html"), plus every directory that holds an
// index.html ("/about/").
//
// Submodules:
// - walk: builds the index from disk with walkdir
//
// The index is built once, before any document is analyzed, and is only
// read afterwards. It is shared across worker tasks behind an Arc.
// =============================================================================

mod walk;

pub use walk::build_file_index;

use std::collections::BTreeSet;

/// Directory names never descended into.
pub const SKIP_DIRS: &[&str] = &["backups", ".git", "node_modules", "__pycache__"];

/// Name of the implicit directory document (compared case-insensitively).
pub const INDEX_DOCUMENT: &str = "index.html";

// BTreeSet keeps both sets ordered, so two builds over the same tree
// compare (and serialize) identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIndex {
    files: BTreeSet<String>,
    index_dirs: BTreeSet<String>,
}

impl FileIndex {
    /// Builds an index from root-relative paths without touching the disk.
    ///
    /// Paths are expected in "/dir/file.html" form; a missing leading slash
    /// is added.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = FileIndex::default();
        for path in paths {
            index.insert_file(path.as_ref());
        }
        index
    }

    // Records one file and, if it is an index document, its directory.
    fn insert_file(&mut self, path: &str) {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        if let Some(slash) = path.rfind('/') {
            let name = &path[slash + 1..];
            if name.eq_ignore_ascii_case(INDEX_DOCUMENT) {
                self.index_dirs.insert(path[..=slash].to_string());
            }
        }

        self.files.insert(path);
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    /// `dir` must carry its trailing slash ("/docs/").
    pub fn is_index_dir(&self, dir: &str) -> bool {
        self.index_dirs.contains(dir)
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    pub fn index_dirs(&self) -> impl Iterator<Item = &str> {
        self.index_dirs.iter().map(String::as_str)
    }

    /// All indexed HTML documents, in path order.
    pub fn html_documents(&self) -> impl Iterator<Item = &str> {
        self.files().filter(|path| is_html(path))
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn index_dir_count(&self) -> usize {
        self.index_dirs.len()
    }
}

/// True for paths ending in ".html", any case.
pub fn is_html(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 5 && bytes[bytes.len() - 5..].eq_ignore_ascii_case(b".html")
}
