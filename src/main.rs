// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Run the audit (index -> analyze every page -> orphans)
// 4. Print results and, for `audit`, write the report files
// 5. Exit with proper code (0 = clean, 1 = broken references, 2 = error)
// =============================================================================

mod audit; // src/audit/ - runs the whole pipeline
mod checker; // src/checker/ - per-page analysis
mod cli; // src/cli.rs - command-line parsing
mod error; // src/error.rs - typed errors
mod graph; // src/graph/ - reachability and orphans
mod index; // src/index/ - file index of the document root
mod logging; // src/logging.rs - tracing setup
mod report; // src/report/ - markdown report, JSON and CSV inventories
mod resolver; // src/resolver/ - link classification

use anyhow::Result;
use audit::{AuditConfig, AuditOutcome};
use clap::Parser;
use cli::{Cli, Commands};
use report::{Summary, WrittenReports};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Keep the guard alive until exit so the log file gets flushed
    let log_guard = match logging::init_logging(&cli.log_level, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            2
        }
    };

    // process::exit skips destructors, so flush the log writer first
    drop(log_guard);
    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links or images
//   Ok(1) = broken references found
//   Err   = configuration or output failure
async fn run(cli: Cli) -> Result<i32> {
    let config = cli.command.to_config();
    let json = cli.command.json();

    match cli.command {
        Commands::Audit { .. } => handle_audit(&config, json).await,
        Commands::Links { .. } => handle_links(&config, json).await,
    }
}

// Handles the 'audit' subcommand: full run plus report files
async fn handle_audit(config: &AuditConfig, json: bool) -> Result<i32> {
    if !json {
        println!("🔍 Auditing site: {}", config.root.display());
    }

    let outcome = audit::run_audit(config).await?;
    let written = report::write_reports(
        &outcome,
        &config.output_dir,
        &config.base_url,
        &config.keywords,
    )?;

    if json {
        print_json(&Summary::new(&outcome, Some(written)))?;
    } else {
        print_broken_table(&outcome);
        print_summary(&outcome, Some(&written));
    }

    Ok(exit_code(&outcome))
}

// Handles the 'links' subcommand: classification only, nothing written
async fn handle_links(config: &AuditConfig, json: bool) -> Result<i32> {
    if !json {
        println!("🔍 Resolving links under: {}", config.root.display());
    }

    let outcome = audit::run_audit(config).await?;

    if json {
        print_json(&Summary::new(&outcome, None))?;
    } else {
        print_broken_table(&outcome);
        print_summary(&outcome, None);
    }

    Ok(exit_code(&outcome))
}

fn exit_code(outcome: &AuditOutcome) -> i32 {
    if outcome.has_broken() {
        1
    } else {
        0
    }
}

fn print_json(summary: &Summary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

// Prints one row per broken reference
fn print_broken_table(outcome: &AuditOutcome) {
    let rows: Vec<(&str, &str, &str)> = outcome
        .records
        .iter()
        .flat_map(|r| {
            let links = r.broken_links.iter().map(move |l| (r.path.as_str(), "link", l.as_str()));
            let images = r.broken_images.iter().map(move |i| (r.path.as_str(), "image", i.as_str()));
            links.chain(images)
        })
        .collect();

    if rows.is_empty() {
        println!("\n✅ No broken internal links or images");
    } else {
        println!();
        println!("{:<45} {:<8} {:<50}", "PAGE", "KIND", "TARGET");
        println!("{}", "=".repeat(103));
        for (page, kind, target) in rows {
            println!("{:<45} {:<8} {:<50}", truncate(page, 45), kind, truncate(target, 50));
        }
    }

    let external: Vec<_> = outcome.broken_external().collect();
    if !external.is_empty() {
        println!("\n🌐 Failing external links:");
        for result in external {
            println!(
                "   ❌ {} ({})",
                result.url,
                result.message.as_deref().unwrap_or("")
            );
        }
    }

    if !outcome.orphans.is_empty() {
        println!("\n🏝️  Orphan pages:");
        for orphan in &outcome.orphans {
            println!("   {}", orphan);
        }
    }
}

fn print_summary(outcome: &AuditOutcome, written: Option<&WrittenReports>) {
    println!();
    println!("📊 Summary:");
    println!("   📄 Pages scanned: {}", outcome.records.len());
    if !outcome.failed_documents.is_empty() {
        println!("   ⚠️  Pages skipped: {}", outcome.failed_documents.len());
    }
    println!("   ❌ Broken links: {}", outcome.broken_link_count());
    println!("   🖼️  Broken images: {}", outcome.broken_image_count());
    println!("   🏝️  Orphan pages: {}", outcome.orphans.len());

    if let Some(written) = written {
        println!("   📝 Report: {}", written.report.display());
        println!("   🗂️  Inventory: {}", written.inventory.display());
        println!("   🗂️  CSV inventory: {}", written.csv_inventory.display());
    }
}

// Shortens long paths for the table, keeping the end (the file name)
fn truncate(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    let tail: String = text.chars().skip(count - (width - 3)).collect();
    format!("...{}", tail)
}
