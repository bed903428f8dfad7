// src/audit/site.rs
// =============================================================================
// Site-wide checks that need every PageRecord (duplicates) or only the root
// directory (robots.txt, sitemap.xml, 404.html).
// =============================================================================

use crate::checker::PageRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Values shared by more than one page, mapped to those pages' paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Duplicates {
    pub titles: BTreeMap<String, Vec<String>>,
    pub descriptions: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SiteFiles {
    pub has_robots_txt: bool,
    pub has_sitemap_xml: bool,
    pub has_custom_404: bool,
}

pub fn find_duplicates(records: &[PageRecord]) -> Duplicates {
    let mut titles: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut descriptions: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for record in records {
        if !record.title.is_empty() {
            titles
                .entry(record.title.clone())
                .or_default()
                .push(record.path.clone());
        }
        if !record.description.is_empty() {
            descriptions
                .entry(record.description.clone())
                .or_default()
                .push(record.path.clone());
        }
    }

    titles.retain(|_, paths| paths.len() > 1);
    descriptions.retain(|_, paths| paths.len() > 1);

    info!(
        "found {} duplicate title groups and {} duplicate description groups",
        titles.len(),
        descriptions.len()
    );

    Duplicates {
        titles,
        descriptions,
    }
}

pub fn check_site_files(root: &Path) -> SiteFiles {
    let files = SiteFiles {
        has_robots_txt: root.join("robots.txt").is_file(),
        has_sitemap_xml: root.join("sitemap.xml").is_file(),
        has_custom_404: root.join("404.html").is_file(),
    };
    info!(
        "site files: robots.txt={}, sitemap.xml={}, 404.html={}",
        files.has_robots_txt, files.has_sitemap_xml, files.has_custom_404
    );
    files
}
