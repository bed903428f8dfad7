// src/resolver/path.rs
// =============================================================================
// Pure string helpers for root-relative site paths.
//
// Nothing in here touches the filesystem or the working directory: every
// function takes its inputs explicitly and returns a new String.
//
// Path shapes used throughout the crate:
//   document path   "/guides/visa/index.html"
//   document dir    "/guides/visa"            (root is "/")
//   index dir       "/guides/visa/"           (always a trailing slash)
//   identity        "/guides/visa"            (root is "")
// =============================================================================

use crate::index::INDEX_DOCUMENT;

// A link target cut into its three parts
//
// query keeps its leading '?', fragment keeps its leading '#', so
// path + query + fragment rebuilds the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitUrl<'a> {
    pub path: &'a str,
    pub query: &'a str,
    pub fragment: &'a str,
}

// Splits "a/b.html?x=1#top" into ("a/b.html", "?x=1", "#top")
//
// The fragment is cut first, so a '?' inside a fragment stays there.
pub fn split_url(raw: &str) -> SplitUrl<'_> {
    let (rest, fragment) = match raw.find('#') {
        Some(i) => (&raw[..i], &raw[i..]),
        None => (raw, ""),
    };
    let (path, query) = match rest.find('?') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };
    SplitUrl {
        path,
        query,
        fragment,
    }
}

// Directory of a document, used as the base for relative links
//
// Examples:
//   "/a/b/page.html" -> "/a/b"
//   "/index.html"    -> "/"
pub fn document_dir(document: &str) -> String {
    match document.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => document[..i].to_string(),
    }
}

// Lexically resolves `path` against `current_dir` and collapses "." / ".."
//
// Absolute paths ignore `current_dir`. ".." never climbs above the root.
// The result always starts with '/' and never ends with one (except "/").
pub fn normalize_path(path: &str, current_dir: &str) -> String {
    let joined;
    let source: &str = if path.starts_with('/') {
        path
    } else {
        joined = format!("{}/{}", current_dir, path);
        &joined
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in source.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

pub fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

// "/docs/index.html" -> Some("/docs/"), matching the file name exactly
// (ASCII case-insensitive) rather than any run of those letters.
pub fn strip_index_document(path: &str) -> Option<&str> {
    let bytes = path.as_bytes();
    let name_len = INDEX_DOCUMENT.len();
    if bytes.len() <= name_len || bytes[bytes.len() - name_len - 1] != b'/' {
        return None;
    }
    let name = &bytes[bytes.len() - name_len..];
    if name.eq_ignore_ascii_case(INDEX_DOCUMENT.as_bytes()) {
        Some(&path[..path.len() - name_len])
    } else {
        None
    }
}

// The form used to compare pages and link targets
//
// Drops a trailing "index.html" and then any trailing slash:
//   "/docs/index.html" -> "/docs"
//   "/docs/"           -> "/docs"
//   "/about.html"      -> "/about.html"
//   "/index.html"      -> ""
pub fn page_identity(path: &str) -> &str {
    strip_index_document(path)
        .unwrap_or(path)
        .trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_url_all_parts() {
        let split = split_url("guide.html?lang=pt#faq");
        assert_eq!(split.path, "guide.html");
        assert_eq!(split.query, "?lang=pt");
        assert_eq!(split.fragment, "#faq");
    }

    #[test]
    fn test_split_url_question_mark_in_fragment() {
        let split = split_url("/a.html#why?");
        assert_eq!(split.path, "/a.html");
        assert_eq!(split.query, "");
        assert_eq!(split.fragment, "#why?");
    }

    #[test]
    fn test_document_dir() {
        assert_eq!(document_dir("/a/b/page.html"), "/a/b");
        assert_eq!(document_dir("/index.html"), "/");
    }

    #[test]
    fn test_normalize_relative_parent() {
        assert_eq!(normalize_path("../c/page2.html", "/a/b"), "/a/c/page2.html");
    }

    #[test]
    fn test_normalize_absolute_ignores_dir() {
        assert_eq!(normalize_path("/a/c/page2.html", "/x/y"), "/a/c/page2.html");
        assert_eq!(normalize_path("/a/c/page2.html", "/"), "/a/c/page2.html");
    }

    #[test]
    fn test_normalize_cannot_escape_root() {
        assert_eq!(normalize_path("../../../etc/passwd", "/a"), "/etc/passwd");
        assert_eq!(normalize_path("..", "/"), "/");
    }

    #[test]
    fn test_normalize_drops_dots_and_slashes() {
        assert_eq!(normalize_path("./x//y/./z/", "/"), "/x/y/z");
        assert_eq!(normalize_path("", "/docs"), "/docs");
    }

    #[test]
    fn test_strip_index_document_is_suffix_exact() {
        assert_eq!(strip_index_document("/docs/index.html"), Some("/docs/"));
        assert_eq!(strip_index_document("/docs/INDEX.html"), Some("/docs/"));
        assert_eq!(strip_index_document("/docs/myindex.html"), None);
        assert_eq!(strip_index_document("index.html"), None);
    }

    #[test]
    fn test_page_identity_does_not_over_strip() {
        // Every letter of "html" and "index" appears at the end of this name
        assert_eq!(page_identity("/media/thin.html"), "/media/thin.html");
        assert_eq!(page_identity("/docs/index.html"), "/docs");
        assert_eq!(page_identity("/docs/"), "/docs");
        assert_eq!(page_identity("/index.html"), "");
        assert_eq!(page_identity("/"), "");
    }
}
