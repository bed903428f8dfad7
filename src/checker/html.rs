// src/checker/html.rs
// =============================================================================
// This module reads one HTML page and produces its PageRecord.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM, the way a browser would (html5ever)
// - Never fails: broken markup still yields a usable tree
// - Supports CSS selectors for finding elements
//
// Two kinds of references are pulled out of the page:
// - hyperlinks: the href of every element that has one (<a>, <link>, <area>)
// - image sources: the src of every <img>
// Blank values are dropped here, so they are never counted or reported.
// =============================================================================

use super::keywords::{round2, KeywordMatcher};
use super::links::resolve_references;
use super::record::PageRecord;
use crate::graph::ReachabilitySet;
use crate::index::FileIndex;
use crate::resolver::{LinkKind, LinkReference};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;

// Alt texts that say nothing about the image (compared lowercase)
const GENERIC_ALTS: &[&str] = &["image", "img", "photo"];

// Alt texts shorter than this are reported as poor
const MIN_ALT_CHARS: usize = 5;

/// Shared, read-only inputs for analyzing a page.
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    pub index: &'a FileIndex,
    pub reachable: &'a ReachabilitySet,
    pub keywords: &'a KeywordMatcher,
}

// Analyzes a page
//
// Parameters:
//   source: the page's text
//   document: its root-relative path ("/about/index.html")
//   ctx: index, reachability set and keyword patterns for this run
//
// Internal references that resolve are recorded in ctx.reachable.
pub fn analyze_page(source: &str, document: &str, ctx: PageContext<'_>) -> PageRecord {
    let html = Html::parse_document(source);

    let references = extract_references(&html, document);
    let links = resolve_references(document, &references, ctx.index, ctx.reachable);

    let head = read_head(&html);
    let headings = read_headings(&html);
    let images = read_images(&html);

    let body_text = body_text(&html);
    let word_count = body_text.split_whitespace().count();
    let keyword_densities = ctx.keywords.densities(&body_text, word_count);

    let has_https =
        !links.insecure && (head.canonical.is_empty() || head.canonical.starts_with("https://"));

    PageRecord {
        path: document.to_string(),
        title_length: head.title.chars().count(),
        title: head.title,
        desc_length: head.description.chars().count(),
        description: head.description,
        lang: head.lang,
        canonical: head.canonical,
        hreflang: head.hreflang,
        has_viewport: head.has_viewport,
        charset: head.charset,
        has_robots_meta: head.has_robots_meta,
        has_og_tags: head.has_og_tags,
        has_twitter_cards: head.has_twitter_cards,
        has_schema: head.has_schema,
        has_structured_data_errors: head.has_structured_data_errors,
        has_favicon: head.has_favicon,
        h1: headings.first_h1,
        multiple_h1: headings.h1_count > 1,
        h2_count: headings.h2_count,
        word_count,
        keyword_densities,
        has_language_switcher: source.to_lowercase().contains("language-switcher"),
        content_size_kb: round2(source.len() as f64 / 1024.0),
        internal_links: links.internal_links,
        external_links: links.external_links,
        broken_links: links.broken_links,
        has_https,
        images: images.count,
        missing_alt_images: images.missing_alt,
        poor_alt_images: images.poor_alt,
        broken_images: links.broken_images,
        missing_image_dimensions: images.missing_dimensions,
        has_lazy_loading: images.lazy,
        external_targets: links.external_targets,
    }
}

// Collects hyperlink and image references in document order
pub fn extract_references(html: &Html, document: &str) -> Vec<LinkReference> {
    let mut references = Vec::new();

    for element in html.select(&css("[href]")) {
        if let Some(href) = element.value().attr("href") {
            push_reference(&mut references, href, LinkKind::Hyperlink, document);
        }
    }
    for element in html.select(&css("img[src]")) {
        if let Some(src) = element.value().attr("src") {
            push_reference(&mut references, src, LinkKind::ImageSource, document);
        }
    }

    references
}

fn push_reference(out: &mut Vec<LinkReference>, raw: &str, kind: LinkKind, document: &str) {
    if raw.trim().is_empty() {
        return;
    }
    out.push(LinkReference {
        raw_target: raw.to_string(),
        kind,
        origin_document: document.to_string(),
    });
}

// Creates a selector from a constant string
//
// unwrap() is fine here: every selector in this file is a literal, so a
// parse failure is a programming error, not bad input.
fn css(selector: &str) -> Selector {
    Selector::parse(selector).unwrap()
}

// Collapses all whitespace runs to a single space and trims
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

fn body_text(html: &Html) -> String {
    html.select(&css("body"))
        .next()
        .map(|body| {
            body.text()
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

fn rel_has(element: ElementRef<'_>, token: &str) -> bool {
    element
        .value()
        .attr("rel")
        .is_some_and(|rel| rel.split_whitespace().any(|t| t.eq_ignore_ascii_case(token)))
}

#[derive(Debug, Default)]
struct HeadInfo {
    title: String,
    description: String,
    lang: String,
    canonical: String,
    hreflang: String,
    has_viewport: bool,
    charset: String,
    has_robots_meta: bool,
    has_og_tags: bool,
    has_twitter_cards: bool,
    has_schema: bool,
    has_structured_data_errors: bool,
    has_favicon: bool,
}

fn read_head(html: &Html) -> HeadInfo {
    let mut head = HeadInfo {
        title: html
            .select(&css("title"))
            .next()
            .map(element_text)
            .unwrap_or_default(),
        lang: html
            .root_element()
            .value()
            .attr("lang")
            .unwrap_or_default()
            .to_string(),
        ..HeadInfo::default()
    };

    for meta in html.select(&css("meta")) {
        let meta = meta.value();
        let name = meta.attr("name").unwrap_or_default().to_ascii_lowercase();
        let property = meta.attr("property").unwrap_or_default().to_ascii_lowercase();
        let content = meta.attr("content").unwrap_or_default();

        match name.as_str() {
            "description" if head.description.is_empty() => head.description = clean_text(content),
            "viewport" => head.has_viewport = true,
            "robots" => head.has_robots_meta = true,
            n if n.starts_with("twitter:") => head.has_twitter_cards = true,
            _ => {}
        }
        if property.starts_with("og:") {
            head.has_og_tags = true;
        }

        if head.charset.is_empty() {
            if let Some(charset) = meta.attr("charset") {
                head.charset = charset.trim().to_string();
            } else if meta
                .attr("http-equiv")
                .is_some_and(|v| v.eq_ignore_ascii_case("content-type"))
            {
                if let Some((_, charset)) = content.to_ascii_lowercase().rsplit_once("charset=") {
                    head.charset = charset.trim().to_string();
                }
            }
        }
    }

    let mut hreflangs = BTreeSet::new();
    for link in html.select(&css("link[rel]")) {
        if head.canonical.is_empty() && rel_has(link, "canonical") {
            head.canonical = link.value().attr("href").unwrap_or_default().trim().to_string();
        }
        if rel_has(link, "alternate") {
            if let Some(lang) = link.value().attr("hreflang") {
                hreflangs.insert(lang.trim().to_string());
            }
        }
        if link
            .value()
            .attr("rel")
            .is_some_and(|rel| rel.to_ascii_lowercase().contains("icon"))
        {
            head.has_favicon = true;
        }
    }
    head.hreflang = hreflangs.into_iter().collect::<Vec<_>>().join(",");

    for script in html.select(&css(r#"script[type="application/ld+json"]"#)) {
        head.has_schema = true;
        let body = script.text().collect::<String>();
        if serde_json::from_str::<serde_json::Value>(&body).is_err() {
            head.has_structured_data_errors = true;
        }
    }

    head
}

#[derive(Debug, Default)]
struct Headings {
    first_h1: String,
    h1_count: usize,
    h2_count: usize,
}

fn read_headings(html: &Html) -> Headings {
    let h1s: Vec<_> = html.select(&css("h1")).collect();
    Headings {
        first_h1: h1s.first().map(|h| element_text(*h)).unwrap_or_default(),
        h1_count: h1s.len(),
        h2_count: html.select(&css("h2")).count(),
    }
}

#[derive(Debug, Default)]
struct ImageStats {
    count: usize,
    missing_alt: usize,
    poor_alt: usize,
    missing_dimensions: usize,
    lazy: bool,
}

fn read_images(html: &Html) -> ImageStats {
    let mut stats = ImageStats::default();

    for img in html.select(&css("img[src]")) {
        let img = img.value();
        stats.count += 1;

        let alt = img.attr("alt").unwrap_or_default().trim().to_lowercase();
        if alt.is_empty() {
            stats.missing_alt += 1;
        } else if alt.chars().count() < MIN_ALT_CHARS || GENERIC_ALTS.contains(&alt.as_str()) {
            stats.poor_alt += 1;
        }

        if img.attr("width").is_none() || img.attr("height").is_none() {
            stats.missing_dimensions += 1;
        }

        if img
            .attr("loading")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("lazy"))
        {
            stats.lazy = true;
        }
    }

    stats
}
