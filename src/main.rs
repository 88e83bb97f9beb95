//! ndtsearch - systematic literature search for NDT structural assessment.
//!
//! Runs the full search protocol in one pass: every catalog term is queried
//! against OpenAlex, results are filtered and deduplicated, and three output
//! artifacts are written to a timestamped folder.
//!
//! ## Usage
//!
//! ```bash
//! ndtsearch --email reviewer@institution.edu
//! ```

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use ndtsearch::openalex::SearchWindow;
use ndtsearch::pipeline::Pipeline;
use ndtsearch::{catalog, export, openalex, prisma};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// First publication year, inclusive
const DEFAULT_START_YEAR: i32 = 2014;

/// Last publication year, inclusive
const DEFAULT_END_YEAR: i32 = 2024;

/// Pages fetched per search term
const DEFAULT_MAX_PAGES: usize = 3;

/// Systematic literature search for NDT-based structural assessment reviews
#[derive(Parser)]
#[command(name = "ndtsearch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Contact email attached to API requests (polite pool courtesy)
    #[arg(long)]
    email: Option<String>,

    /// First publication year, inclusive
    #[arg(long, default_value_t = DEFAULT_START_YEAR)]
    start_year: i32,

    /// Last publication year, inclusive
    #[arg(long, default_value_t = DEFAULT_END_YEAR)]
    end_year: i32,

    /// Maximum result pages fetched per search term
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// Size of the ranked journal list in the statistics file
    #[arg(long, default_value_t = prisma::DEFAULT_TOP_JOURNALS)]
    top_journals: usize,

    /// Output directory
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    // Malformed static configuration is fatal before any network call.
    catalog::validate().context("Term catalog failed validation")?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let output_folder = cli.output.join(format!("{timestamp}_ndt_literature_search"));
    std::fs::create_dir_all(&output_folder).context("Failed to create output directory")?;

    println!("Output folder: {}", output_folder.display());

    let client = openalex::Client::new(cli.email.clone()).context("Failed to build API client")?;
    let window = SearchWindow {
        start_year: cli.start_year,
        end_year: cli.end_year,
        max_pages: cli.max_pages,
    };

    let terms = catalog::terms();
    info!(
        terms = terms.len(),
        start_year = window.start_year,
        end_year = window.end_year,
        max_pages = window.max_pages,
        "Starting systematic search"
    );

    let mut pipeline = Pipeline::new();

    for (idx, term) in terms.iter().enumerate() {
        info!(
            term = idx + 1,
            total = terms.len(),
            expression = term.expression,
            "Searching"
        );

        let before = pipeline.included_count();
        let mut pages = client.paginate(term, &window);
        loop {
            match pages.next_page().await {
                Ok(Some(records)) => {
                    pipeline.ingest(term, records);
                }
                Ok(None) => break,
                Err(e) => {
                    // Abandon this term's remaining pages, keep the run going.
                    pipeline.record_skipped_term(term, &e);
                    break;
                }
            }
        }

        info!(
            added = pipeline.included_count() - before,
            running_total = pipeline.included_count(),
            "Term complete"
        );
    }

    let (records, summary) = pipeline.finish();
    let stats = prisma::aggregate(
        &records,
        &summary,
        (window.start_year, window.end_year),
        cli.top_journals,
    );

    println!();
    println!("Records identified: {}", summary.records_identified);
    println!("Records included:   {}", records.len());
    println!("Records excluded:   {}", summary.excluded);
    println!("Terms skipped:      {}", summary.skipped_terms);

    let exports: [(&str, ndtsearch::Result<()>); 3] = [
        (
            "ndt_results.csv",
            export::write_csv(&output_folder.join("ndt_results.csv"), &records),
        ),
        (
            "ndt_references.bib",
            export::write_bibtex(&output_folder.join("ndt_references.bib"), &records),
        ),
        (
            "prisma_stats.json",
            export::write_stats(&output_folder.join("prisma_stats.json"), &stats),
        ),
    ];

    let mut failed = 0;
    for (name, result) in exports {
        match result {
            Ok(()) => println!("Saved: {}", output_folder.join(name).display()),
            Err(e) => {
                failed += 1;
                error!(file = name, error = %e, "Export failed");
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of 3 exports failed");
    }

    info!("Search complete");
    Ok(())
}
