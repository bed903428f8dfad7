// src/resolver/mod.rs
// =============================================================================
// Link resolution: turns authored href/src values into "external",
// "resolved to this canonical path" or "broken".
//
// Submodules:
// - path: pure string helpers (split, normalize, identity)
// - classify: the classification itself, against a FileIndex
// =============================================================================

mod classify;
mod path;

pub use classify::{classify, Classification, LinkKind, LinkReference, ResolvedTarget};
pub use path::{document_dir, page_identity};
