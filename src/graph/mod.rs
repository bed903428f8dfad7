// src/graph/mod.rs
// =============================================================================
// The site link graph, reduced to what the audit needs:
// - reachability: which canonical paths are linked from some other page
// - orphans: which HTML pages never show up in that set
// =============================================================================

mod orphans;
mod reachability;

pub use orphans::find_orphans;
pub use reachability::ReachabilitySet;
