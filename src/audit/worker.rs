// src/audit/worker.rs
// =============================================================================
// The blocking work done for a single document: read it, decode it,
// analyze it. Runs on tokio's blocking pool, one call per document.
// =============================================================================

use crate::checker::{analyze_page, PageContext, PageRecord};
use crate::error::DocumentAnalysisError;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::bytes::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

// How far into a file a charset declaration is looked for
const PRESCAN_BYTES: usize = 1024;

// Reads and analyzes the document at root-relative `document`
pub fn analyze_file(
    root: &Path,
    document: &str,
    ctx: PageContext<'_>,
) -> Result<PageRecord, DocumentAnalysisError> {
    let path = disk_path(root, document);
    let source = read_document(&path)?;
    Ok(analyze_page(&source, document, ctx))
}

fn disk_path(root: &Path, document: &str) -> PathBuf {
    document
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

// Reads a file as text
//
// UTF-8 when the bytes are valid UTF-8. Otherwise the charset declared in a
// <meta> tag near the top of the file, and windows-1252 when there is none
// (what browsers use for "latin-1" and undeclared legacy pages). Decoding
// never fails: unmappable bytes become U+FFFD.
pub fn read_document(path: &Path) -> Result<String, DocumentAnalysisError> {
    let bytes = std::fs::read(path).map_err(|source| DocumentAnalysisError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            let bytes = e.into_bytes();
            let encoding = declared_encoding(&bytes).unwrap_or(WINDOWS_1252);
            debug!("{} is not UTF-8, decoding as {}", path.display(), encoding.name());

            let (text, _, had_errors) = encoding.decode(&bytes);
            if had_errors {
                warn!("{} has bytes invalid in {}", path.display(), encoding.name());
            }
            Ok(text.into_owned())
        }
    }
}

// The encoding named by <meta charset=...> or <meta http-equiv content=...>
//
// A UTF-8 (or UTF-16) declaration is ignored: the bytes were already shown
// not to be UTF-8, so the legacy fallback applies.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    static META_CHARSET: OnceLock<Regex> = OnceLock::new();
    let pattern = META_CHARSET.get_or_init(|| {
        Regex::new(r#"(?i-u)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_.:-]+)"#).unwrap()
    });

    let head = &bytes[..bytes.len().min(PRESCAN_BYTES)];
    let label = pattern.captures(head)?.get(1)?.as_bytes();
    Encoding::for_label(label)
        .map(Encoding::output_encoding)
        .filter(|encoding| *encoding != UTF_8)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is OnceLock?
//    - A cell that is filled the first time get_or_init() runs
//    - The charset regex is compiled once and shared by every worker thread
//
// 2. Why regex::bytes::Regex?
//    - The file is not valid UTF-8 at that point, so it cannot be a &str
//    - (?-u) makes [^>] match any single byte
//
// 3. What is Cow in encoding.decode()?
//    - decode() returns Cow<str>: borrowed when no conversion was needed,
//      owned otherwise. into_owned() always gives us a String
// -----------------------------------------------------------------------------
