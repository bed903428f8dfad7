// src/report/inventory.rs
// =============================================================================
// The per-page inventories, in path order:
// - site-inventory.json: every PageRecord, pretty-printed
// - site-inventory.csv:  one flat row per PageRecord, for spreadsheets
//
// CSV cells cannot hold lists or maps, so broken_links / broken_images are
// joined with ", " and keyword_densities is written as a JSON object.
// =============================================================================

use crate::checker::PageRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

pub fn render_inventory(records: &[PageRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("failed to serialize page inventory")
}

pub fn write_inventory(records: &[PageRecord], path: &Path) -> Result<()> {
    let json = render_inventory(records)?;
    super::write_output(path, &json)
}

/// One CSV row: PageRecord with its list and map fields flattened.
#[derive(Debug, Serialize)]
struct InventoryRow<'a> {
    path: &'a str,
    title: &'a str,
    title_length: usize,
    description: &'a str,
    desc_length: usize,
    lang: &'a str,
    canonical: &'a str,
    hreflang: &'a str,
    has_viewport: bool,
    charset: &'a str,
    has_robots_meta: bool,
    has_og_tags: bool,
    has_twitter_cards: bool,
    has_schema: bool,
    has_structured_data_errors: bool,
    has_favicon: bool,
    h1: &'a str,
    multiple_h1: bool,
    h2_count: usize,
    word_count: usize,
    keyword_densities: String,
    has_language_switcher: bool,
    content_size_kb: f64,
    internal_links: usize,
    external_links: usize,
    broken_links: String,
    has_https: bool,
    images: usize,
    missing_alt_images: usize,
    poor_alt_images: usize,
    broken_images: String,
    missing_image_dimensions: usize,
    has_lazy_loading: bool,
}

impl<'a> InventoryRow<'a> {
    fn new(r: &'a PageRecord) -> Result<Self> {
        Ok(Self {
            path: &r.path,
            title: &r.title,
            title_length: r.title_length,
            description: &r.description,
            desc_length: r.desc_length,
            lang: &r.lang,
            canonical: &r.canonical,
            hreflang: &r.hreflang,
            has_viewport: r.has_viewport,
            charset: &r.charset,
            has_robots_meta: r.has_robots_meta,
            has_og_tags: r.has_og_tags,
            has_twitter_cards: r.has_twitter_cards,
            has_schema: r.has_schema,
            has_structured_data_errors: r.has_structured_data_errors,
            has_favicon: r.has_favicon,
            h1: &r.h1,
            multiple_h1: r.multiple_h1,
            h2_count: r.h2_count,
            word_count: r.word_count,
            keyword_densities: serde_json::to_string(&r.keyword_densities)
                .context("failed to serialize keyword densities")?,
            has_language_switcher: r.has_language_switcher,
            content_size_kb: r.content_size_kb,
            internal_links: r.internal_links,
            external_links: r.external_links,
            broken_links: r.broken_links.join(", "),
            has_https: r.has_https,
            images: r.images,
            missing_alt_images: r.missing_alt_images,
            poor_alt_images: r.poor_alt_images,
            broken_images: r.broken_images.join(", "),
            missing_image_dimensions: r.missing_image_dimensions,
            has_lazy_loading: r.has_lazy_loading,
        })
    }
}

pub fn render_csv_inventory(records: &[PageRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer
            .serialize(InventoryRow::new(record)?)
            .with_context(|| format!("failed to write CSV row for {}", record.path))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV inventory: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV inventory is not UTF-8")
}

pub fn write_csv_inventory(records: &[PageRecord], path: &Path) -> Result<()> {
    let csv = render_csv_inventory(records)?;
    super::write_output(path, &csv)
}
