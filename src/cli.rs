// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI is described by the structs and enums
// below, and clap generates parsing, --help and --version from them.
//
// Subcommands:
// - audit: full run, writes site-audit.md and the JSON/CSV inventories
// - links: classification only, prints broken references and orphans
// =============================================================================

use crate::audit::{default_workers, AuditConfig, DEFAULT_BASE_URL};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "site-audit",
    version,
    about = "Audit a static website on disk for broken links, orphan pages and SEO issues",
    long_about = "site-audit walks the document root of a static site, resolves every link and \
                  image against the files that actually exist, and reports broken references, \
                  pages nothing links to, and common on-page SEO problems."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level: error, warn, info, debug or trace (RUST_LOG overrides)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full audit and write the report files
    ///
    /// Example: site-audit audit ./public --base-url https://www.example.com
    Audit {
        #[command(flatten)]
        site: SiteArgs,

        /// Public URL of the site, shown in the report
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Keyword phrase to measure density for (repeatable)
        #[arg(long = "keyword", value_name = "PHRASE")]
        keywords: Vec<String>,

        /// Directory for site-audit.md and the inventories
        /// (default: <ROOT>/documentation)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Also request every external http(s) link
        #[arg(long)]
        check_external: bool,
    },

    /// Only resolve links: print broken references and orphan pages
    ///
    /// Example: site-audit links ./public --json
    Links {
        #[command(flatten)]
        site: SiteArgs,
    },
}

/// Arguments shared by every subcommand.
#[derive(Args, Debug)]
pub struct SiteArgs {
    /// Document root of the site
    pub root: PathBuf,

    /// Documents analyzed in parallel (default: number of CPUs)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Report the home page (root index.html) as an orphan when nothing
    /// links to it
    #[arg(long)]
    pub no_root_bypass: bool,

    /// Output results in JSON format instead of text
    #[arg(long)]
    pub json: bool,
}

impl SiteArgs {
    pub fn to_config(&self) -> AuditConfig {
        let mut config = AuditConfig::new(&self.root);
        config.workers = self.workers.unwrap_or_else(default_workers);
        config.treat_root_as_reachable = !self.no_root_bypass;
        config
    }
}

impl Commands {
    /// Builds the run configuration for this subcommand.
    pub fn to_config(&self) -> AuditConfig {
        match self {
            Commands::Audit {
                site,
                base_url,
                keywords,
                output_dir,
                check_external,
            } => {
                let mut config = site.to_config();
                config.base_url = base_url.clone();
                if !keywords.is_empty() {
                    config.keywords = keywords.clone();
                }
                if let Some(dir) = output_dir {
                    config.output_dir = dir.clone();
                }
                config.check_external = *check_external;
                config
            }
            Commands::Links { site } => site.to_config(),
        }
    }

    pub fn json(&self) -> bool {
        match self {
            Commands::Audit { site, .. } | Commands::Links { site } => site.json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_arguments() {
        let cli = Cli::parse_from([
            "site-audit",
            "audit",
            "./public",
            "--workers",
            "3",
            "--keyword",
            "visa",
            "--keyword",
            "residency",
            "--check-external",
            "--no-root-bypass",
        ]);
        let config = cli.command.to_config();
        assert_eq!(config.root, PathBuf::from("./public"));
        assert_eq!(config.workers, 3);
        assert_eq!(config.keywords, vec!["visa", "residency"]);
        assert_eq!(config.output_dir, PathBuf::from("./public").join("documentation"));
        assert!(config.check_external);
        assert!(!config.treat_root_as_reachable);
        assert!(!cli.command.json());
    }

    #[test]
    fn test_links_defaults() {
        let cli = Cli::parse_from(["site-audit", "links", "site", "--json", "--log-level", "debug"]);
        let config = cli.command.to_config();
        assert!(config.treat_root_as_reachable);
        assert!(!config.check_external);
        assert!(cli.command.json());
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn test_root_is_required() {
        assert!(Cli::try_parse_from(["site-audit", "audit"]).is_err());
    }
}
