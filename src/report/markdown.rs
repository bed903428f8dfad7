// src/report/markdown.rs
// =============================================================================
// site-audit.md: the human-readable audit report.
//
// Layout:
// - header and key metrics (one line per check, with counts)
// - keyword density averages
// - fixed list of recommendations
// - one table per issue type, only for issues that were actually found
// =============================================================================

use crate::audit::AuditOutcome;
use crate::checker::PageRecord;

// Thresholds the metrics are judged against
const TITLE_CHARS: std::ops::RangeInclusive<usize> = 30..=70;
const DESCRIPTION_CHARS: std::ops::RangeInclusive<usize> = 100..=160;
const THIN_CONTENT_WORDS: usize = 300;
const LARGE_PAGE_KB: f64 = 100.0;
const HIGH_DENSITY_PERCENT: f64 = 3.0;
const DESCRIPTION_PREVIEW_CHARS: usize = 50;

const RECOMMENDATIONS: &[&str] = &[
    "Ensure all pages have unique, descriptive titles (50-60 chars) and descriptions (150-160 chars).",
    "Add missing H1 tags and ensure only one per page.",
    "Flesh out thin content pages to more than 300 words.",
    "Keep keyword densities around 1-2% on relevant pages; avoid stuffing.",
    "Fix all broken links and images.",
    "Add descriptive alt text to all images; avoid generic terms.",
    "Add width and height attributes to images to prevent layout shifts (CLS).",
    "Add loading=\"lazy\" to below-the-fold images for better LCP.",
    "Add a viewport meta tag where missing.",
    "Use UTF-8 consistently.",
    "Add robots meta where needed (e.g. index,follow).",
    "Add Open Graph and Twitter Card tags for social sharing.",
    "Add and validate schema markup for rich results.",
    "Link a favicon from every page.",
    "Use HTTPS for all links and canonicals.",
    "Reduce the size of large pages.",
    "Link to orphan pages or remove them.",
    "Deduplicate titles and descriptions.",
    "Create robots.txt and sitemap.xml if missing.",
    "Add a custom 404 page if not present.",
];

pub fn render_report(outcome: &AuditOutcome, base_url: &str, keywords: &[String]) -> String {
    let records = &outcome.records;
    let total = records.len();

    let mut lines: Vec<String> = Vec::new();

    lines.push("# Site SEO Audit Report".to_string());
    lines.push(String::new());
    lines.push(format!("**Base URL:** {}", base_url));
    lines.push(format!("**Total HTML Pages Scanned:** {}", total));
    if !outcome.failed_documents.is_empty() {
        lines.push(format!(
            "**Pages That Could Not Be Analyzed:** {}",
            outcome.failed_documents.len()
        ));
    }
    lines.push(String::new());

    lines.push("## Executive Summary".to_string());
    lines.push("### Key Metrics".to_string());
    let metrics: Vec<(&str, String)> = vec![
        ("Pages missing title", share(count(records, |r| r.title.is_empty()), total)),
        (
            "Suboptimal title length (<30 or >70 chars)",
            count(records, |r| !TITLE_CHARS.contains(&r.title_length)).to_string(),
        ),
        ("Pages missing meta description", share(count(records, |r| r.description.is_empty()), total)),
        (
            "Suboptimal description length (<100 or >160 chars)",
            count(records, |r| !DESCRIPTION_CHARS.contains(&r.desc_length)).to_string(),
        ),
        ("Pages missing H1", share(count(records, |r| r.h1.is_empty()), total)),
        ("Pages with multiple H1", count(records, |r| r.multiple_h1).to_string()),
        (
            "Thin content pages (<300 words)",
            count(records, |r| r.word_count < THIN_CONTENT_WORDS).to_string(),
        ),
        ("Pages missing lang attribute", count(records, |r| r.lang.is_empty()).to_string()),
        ("Pages missing canonical", count(records, |r| r.canonical.is_empty()).to_string()),
        ("Pages missing viewport meta", count(records, |r| !r.has_viewport).to_string()),
        ("Pages with non-UTF-8 charset", count(records, |r| !is_utf8_or_unset(&r.charset)).to_string()),
        ("Pages missing robots meta", count(records, |r| !r.has_robots_meta).to_string()),
        ("Pages missing Open Graph tags", count(records, |r| !r.has_og_tags).to_string()),
        ("Pages missing Twitter Cards", count(records, |r| !r.has_twitter_cards).to_string()),
        ("Pages missing schema markup", count(records, |r| !r.has_schema).to_string()),
        (
            "Pages with structured data errors",
            count(records, |r| r.has_structured_data_errors).to_string(),
        ),
        ("Pages missing favicon", count(records, |r| !r.has_favicon).to_string()),
        ("Total broken internal links", outcome.broken_link_count().to_string()),
        ("Total broken images", outcome.broken_image_count().to_string()),
        ("Total images missing alt text", sum_of(records, |r| r.missing_alt_images).to_string()),
        ("Total images with poor alt text", sum_of(records, |r| r.poor_alt_images).to_string()),
        ("Pages without HTTPS", count(records, |r| !r.has_https).to_string()),
        (
            "Large content pages (>100KB)",
            count(records, |r| r.content_size_kb > LARGE_PAGE_KB).to_string(),
        ),
        ("Total images missing dimensions", sum_of(records, |r| r.missing_image_dimensions).to_string()),
        (
            "Pages without lazy loading (with images)",
            count(records, |r| lacks_lazy_loading(r)).to_string(),
        ),
        ("Orphan pages (not linked internally)", outcome.orphans.len().to_string()),
        ("Duplicate titles", format!("{} groups", outcome.duplicates.titles.len())),
        (
            "Duplicate descriptions",
            format!("{} groups", outcome.duplicates.descriptions.len()),
        ),
        ("Has robots.txt", yes_no(outcome.site_files.has_robots_txt)),
        ("Has sitemap.xml", yes_no(outcome.site_files.has_sitemap_xml)),
        ("Has custom 404.html", yes_no(outcome.site_files.has_custom_404)),
    ];
    for (label, value) in metrics {
        lines.push(format!("- {}: {}", label, value));
    }
    if !outcome.external_results.is_empty() {
        lines.push(format!(
            "- External links checked: {} ({} failing)",
            outcome.external_results.len(),
            outcome.broken_external().count()
        ));
    }
    lines.push(String::new());

    lines.push("### Keyword Density Analysis".to_string());
    for keyword in keywords {
        let average = if total == 0 {
            0.0
        } else {
            records.iter().map(|r| density(r, keyword)).sum::<f64>() / total as f64
        };
        lines.push(format!("- Average density for '{}': {:.2}%", keyword, average));
    }
    lines.push("Ideal keyword density is typically 1-2%. Avoid over-optimization (>3%).".to_string());
    lines.push(String::new());

    lines.push("## Priority Recommendations".to_string());
    lines.extend(RECOMMENDATIONS.iter().map(|r| format!("- {}", r)));
    lines.push(String::new());

    lines.push("## Detailed Issues".to_string());

    let mut section = |title: &str, headers: &[&str], rows: Vec<Vec<String>>| {
        if rows.is_empty() {
            return;
        }
        lines.push(format!("### {}", title));
        lines.push(markdown_table(headers, &rows));
        lines.push(String::new());
    };

    section(
        "Broken Internal Links",
        &["Page", "Broken Links"],
        records
            .iter()
            .filter(|r| !r.broken_links.is_empty())
            .map(|r| vec![r.path.clone(), r.broken_links.join(", ")])
            .collect(),
    );
    section(
        "Broken Images",
        &["Page", "Broken Images"],
        records
            .iter()
            .filter(|r| !r.broken_images.is_empty())
            .map(|r| vec![r.path.clone(), r.broken_images.join(", ")])
            .collect(),
    );
    section(
        "Broken External Links",
        &["URL", "Status", "Found On"],
        outcome
            .broken_external()
            .map(|result| {
                let pages: Vec<&str> = records
                    .iter()
                    .filter(|r| r.external_targets.contains(&result.url))
                    .map(|r| r.path.as_str())
                    .collect();
                vec![
                    result.url.clone(),
                    result.message.clone().unwrap_or_default(),
                    pages.join(", "),
                ]
            })
            .collect(),
    );
    section(
        "Images Missing Alt Text",
        &["Page", "Count"],
        counted(records, |r| r.missing_alt_images),
    );
    section(
        "Images with Poor Alt Text",
        &["Page", "Count"],
        counted(records, |r| r.poor_alt_images),
    );
    section(
        "Images Missing Dimensions (Potential CLS Issues)",
        &["Page", "Count"],
        counted(records, |r| r.missing_image_dimensions),
    );
    section(
        "Pages Without Lazy Loading (Potential LCP Issues)",
        &["Path"],
        paths(records, lacks_lazy_loading),
    );
    section(
        "Pages without HTTPS Enforcement",
        &["Path"],
        paths(records, |r| !r.has_https),
    );
    section(
        "Pages with Structured Data Errors",
        &["Path"],
        paths(records, |r| r.has_structured_data_errors),
    );

    let mut large: Vec<&PageRecord> = records
        .iter()
        .filter(|r| r.content_size_kb > LARGE_PAGE_KB)
        .collect();
    large.sort_by(|a, b| b.content_size_kb.total_cmp(&a.content_size_kb));
    section(
        "Large Content Pages (>100KB)",
        &["Path", "Size (KB)"],
        large
            .iter()
            .map(|r| vec![r.path.clone(), format!("{:.2}", r.content_size_kb)])
            .collect(),
    );

    section(
        "Orphan Pages",
        &["Path"],
        outcome.orphans.iter().map(|o| vec![o.clone()]).collect(),
    );
    section(
        "Pages That Could Not Be Analyzed",
        &["Path"],
        outcome.failed_documents.iter().map(|d| vec![d.clone()]).collect(),
    );

    for keyword in keywords {
        section(
            &format!("Pages with Zero Density for '{}'", keyword),
            &["Path"],
            paths(records, |r| density(r, keyword) == 0.0),
        );
        section(
            &format!("Pages with High Density (>3%) for '{}'", keyword),
            &["Path", "Density"],
            records
                .iter()
                .filter(|r| density(r, keyword) > HIGH_DENSITY_PERCENT)
                .map(|r| vec![r.path.clone(), format!("{}%", density(r, keyword))])
                .collect(),
        );
    }

    if !outcome.duplicates.titles.is_empty() {
        lines.push("### Duplicate Titles".to_string());
        for (title, pages) in &outcome.duplicates.titles {
            lines.push(format!(
                "**{}** (used on {} pages): {}",
                title,
                pages.len(),
                pages.join(", ")
            ));
        }
        lines.push(String::new());
    }
    if !outcome.duplicates.descriptions.is_empty() {
        lines.push("### Duplicate Descriptions".to_string());
        for (description, pages) in &outcome.duplicates.descriptions {
            let preview: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
            lines.push(format!(
                "**{}...** (used on {} pages): {}",
                preview,
                pages.len(),
                pages.join(", ")
            ));
        }
        lines.push(String::new());
    }

    lines.push("## Full Page Inventory".to_string());
    lines.push("See site-inventory.json and site-inventory.csv for detailed per-page data.".to_string());
    lines.push(String::new());

    lines.join("\n")
}

pub fn markdown_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut table = format!("| {} |\n", headers.join(" | "));
    table.push_str(&format!("|{}\n", " --- |".repeat(headers.len())));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|cell| cell.replace('|', "\\|")).collect();
        table.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    table
}

fn share(n: usize, total: usize) -> String {
    if total == 0 {
        format!("{} (0.0%)", n)
    } else {
        format!("{} ({:.1}%)", n, n as f64 / total as f64 * 100.0)
    }
}

fn yes_no(value: bool) -> String {
    let answer = if value { "Yes" } else { "No" };
    answer.to_string()
}

fn count(records: &[PageRecord], pred: impl Fn(&PageRecord) -> bool) -> usize {
    records.iter().filter(|r| pred(r)).count()
}

fn sum_of(records: &[PageRecord], field: impl Fn(&PageRecord) -> usize) -> usize {
    records.iter().map(field).sum()
}

fn is_utf8_or_unset(charset: &str) -> bool {
    charset.is_empty() || charset.eq_ignore_ascii_case("utf-8") || charset.eq_ignore_ascii_case("utf8")
}

fn lacks_lazy_loading(record: &PageRecord) -> bool {
    record.images > 0 && !record.has_lazy_loading
}

fn density(record: &PageRecord, keyword: &str) -> f64 {
    record.keyword_densities.get(keyword).copied().unwrap_or(0.0)
}

fn counted(records: &[PageRecord], field: impl Fn(&PageRecord) -> usize) -> Vec<Vec<String>> {
    records
        .iter()
        .filter(|r| field(r) > 0)
        .map(|r| vec![r.path.clone(), field(r).to_string()])
        .collect()
}

fn paths(records: &[PageRecord], pred: impl Fn(&PageRecord) -> bool) -> Vec<Vec<String>> {
    records
        .iter()
        .filter(|r| pred(r))
        .map(|r| vec![r.path.clone()])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome() -> AuditOutcome {
        let home = PageRecord {
            path: "/index.html".to_string(),
            title: "Home".to_string(),
            title_length: 4,
            broken_links: vec!["/nope.html".to_string()],
            has_https: true,
            ..PageRecord::default()
        };
        let about = PageRecord {
            path: "/about.html".to_string(),
            images: 2,
            has_https: false,
            ..PageRecord::default()
        };
        AuditOutcome {
            records: vec![about, home],
            orphans: vec!["/old.html".to_string()],
            ..AuditOutcome::default()
        }
    }

    #[test]
    fn test_report_header_and_metrics() {
        let report = render_report(&outcome(), "https://www.example.com", &[]);
        assert!(report.starts_with("# Site SEO Audit Report"));
        assert!(report.contains("**Base URL:** https://www.example.com"));
        assert!(report.contains("- Pages missing title: 1 (50.0%)"));
        assert!(report.contains("- Total broken internal links: 1"));
        assert!(report.contains("- Orphan pages (not linked internally): 1"));
        assert!(report.contains("- Has robots.txt: No"));
    }

    #[test]
    fn test_report_sections_only_when_found() {
        let report = render_report(&outcome(), "https://www.example.com", &[]);
        assert!(report.contains("### Broken Internal Links\n| Page | Broken Links |"));
        assert!(report.contains("| /index.html | /nope.html |"));
        assert!(report.contains("### Orphan Pages"));
        assert!(report.contains("| /old.html |"));
        assert!(report.contains("### Pages Without Lazy Loading"));
        assert!(!report.contains("### Broken Images"));
        assert!(!report.contains("### Duplicate Titles"));
    }

    #[test]
    fn test_keyword_sections() {
        let keyword = "brazil visa".to_string();
        let report = render_report(&outcome(), "https://x", &[keyword]);
        assert!(report.contains("- Average density for 'brazil visa': 0.00%"));
        assert!(report.contains("### Pages with Zero Density for 'brazil visa'"));
    }

    #[test]
    fn test_markdown_table_escapes_pipes() {
        let table = markdown_table(&["A", "B"], &[vec!["x|y".to_string(), "z".to_string()]]);
        assert_eq!(table, "| A | B |\n| --- | --- |\n| x\\|y | z |\n");
    }

    #[test]
    fn test_share_of_empty_site() {
        assert_eq!(share(0, 0), "0 (0.0%)");
    }
}
