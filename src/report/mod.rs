// src/report/mod.rs
// =============================================================================
// Turns an AuditOutcome into output.
//
// Submodules:
// - markdown: site-audit.md
// - inventory: site-inventory.json and site-inventory.csv
//
// This file also holds the compact Summary printed by --json.
// =============================================================================

mod inventory;
mod markdown;

use inventory::{write_csv_inventory, write_inventory};
use markdown::render_report;

use crate::audit::AuditOutcome;
use crate::checker::LinkCheckResult;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const REPORT_FILE: &str = "site-audit.md";
pub const INVENTORY_FILE: &str = "site-inventory.json";
pub const CSV_INVENTORY_FILE: &str = "site-inventory.csv";

/// Paths of the files written by `write_reports`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenReports {
    pub report: PathBuf,
    pub inventory: PathBuf,
    pub csv_inventory: PathBuf,
}

// Writes site-audit.md and both inventories into `output_dir`
pub fn write_reports(
    outcome: &AuditOutcome,
    output_dir: &Path,
    base_url: &str,
    keywords: &[String],
) -> Result<WrittenReports> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("cannot create output directory {}", output_dir.display()))?;

    let written = WrittenReports {
        report: output_dir.join(REPORT_FILE),
        inventory: output_dir.join(INVENTORY_FILE),
        csv_inventory: output_dir.join(CSV_INVENTORY_FILE),
    };

    write_inventory(&outcome.records, &written.inventory)?;
    write_csv_inventory(&outcome.records, &written.csv_inventory)?;
    write_output(&written.report, &render_report(outcome, base_url, keywords))?;

    Ok(written)
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("cannot write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Broken references of a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageProblems {
    pub path: String,
    pub broken_links: Vec<String>,
    pub broken_images: Vec<String>,
}

/// What --json prints.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub pages_scanned: usize,
    pub failed_documents: Vec<String>,
    pub internal_links: usize,
    pub external_links: usize,
    pub broken_links: usize,
    pub broken_images: usize,
    /// Only pages with at least one broken reference.
    pub pages: Vec<PageProblems>,
    pub orphans: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub broken_external: Vec<LinkCheckResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written: Option<WrittenReports>,
}

impl Summary {
    pub fn new(outcome: &AuditOutcome, written: Option<WrittenReports>) -> Self {
        Self {
            pages_scanned: outcome.records.len(),
            failed_documents: outcome.failed_documents.clone(),
            internal_links: outcome.records.iter().map(|r| r.internal_links).sum(),
            external_links: outcome.records.iter().map(|r| r.external_links).sum(),
            broken_links: outcome.broken_link_count(),
            broken_images: outcome.broken_image_count(),
            pages: outcome
                .records
                .iter()
                .filter(|r| r.has_broken_references())
                .map(|r| PageProblems {
                    path: r.path.clone(),
                    broken_links: r.broken_links.clone(),
                    broken_images: r.broken_images.clone(),
                })
                .collect(),
            orphans: outcome.orphans.clone(),
            broken_external: outcome.broken_external().cloned().collect(),
            written,
        }
    }
}
