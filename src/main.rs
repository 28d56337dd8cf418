//! # News Sitemap Importer
//!
//! An import pipeline that reads a news-sitemap feed, fetches every
//! referenced article page, cleans the article markup, and emits
//! normalized content records with categories and media-region images.
//!
//! ## Features
//!
//! - Parses the news-sitemap protocol extension (loc, publication date, title)
//! - Fetches article pages with a bounded per-request timeout
//! - Isolates the `<article>` region and strips ads, links, scripts, and
//!   "Baca Juga" see-also boilerplate
//! - Harvests image URL/caption pairs from `photo__img` media containers
//! - Emits one JSON record per article; duplicate titles are skipped
//!
//! ## Usage
//!
//! ```sh
//! news_sitemap_importer -s https://example.com/sitemap-news.xml -o ./records
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Sitemap**: Parse the feed into article descriptors
//! 2. **Fetching**: Download each article page (sequential within a batch)
//! 3. **Extraction**: Clean the content region, collect media images
//! 4. **Handoff**: Create the record, tag its category, attach its images

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod extract;
mod fetch;
mod models;
mod pipeline;
mod sitemap;
mod store;
mod utils;

use cli::Cli;
use config::{ScrapeConfig, load_config};
use extract::{ContentExtractor, ImageExtractor};
use fetch::{HttpFetcher, PageFetch};
use models::{ArticleDescriptor, ImportBatchResult};
use pipeline::ImportPipeline;
use store::{ContentStore, JsonDirStore, MemoryStore};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("sitemap import starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.sitemap_url, ?args.output_dir, ?args.batch_size, "Parsed CLI arguments");

    // --- Load scrape configuration ---
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ScrapeConfig::default(),
    };

    // Early check: ensure the record output dir is writable
    if !args.dry_run {
        if let Err(e) = ensure_writable_dir(&args.output_dir).await {
            error!(
                path = %args.output_dir,
                error = %e,
                "Record output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // --- Build collaborators ---
    let fetcher = HttpFetcher::new(config.request_timeout(), &config.user_agent)?;
    let content = ContentExtractor::new(&config)?;
    let images = ImageExtractor::new(&config)?;

    // ---- Fetch and parse the sitemap ----
    info!(url = %args.sitemap_url, "Fetching sitemap");
    let feed = fetcher.fetch(&args.sitemap_url).await;
    let Some(xml) = feed.body else {
        let kind = feed.error.expect("failed fetch carries its error kind");
        error!(url = %args.sitemap_url, error = %kind, "Could not fetch sitemap");
        return Err(format!("could not fetch sitemap {}: {kind}", args.sitemap_url).into());
    };

    let entries = sitemap::parse_sitemap(&xml)?;
    info!(count = entries.len(), "Sitemap entries discovered");

    // ---- Validate entries into descriptors ----
    let mut total = ImportBatchResult::default();
    let mut descriptors: Vec<ArticleDescriptor> = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.into_descriptor(args.status) {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(e) => {
                warn!(error = %e, "Rejected sitemap entry");
                total.failed += 1;
                total.messages.push(e.to_string());
            }
        }
    }

    // ---- Drive the import in batches ----
    let batch_size = args.batch_size.max(1);
    if args.dry_run {
        info!("Dry run: records stay in memory");
        let pipeline = ImportPipeline::new(fetcher, MemoryStore::new(), content, images);
        run_batches(&pipeline, &descriptors, batch_size, &mut total).await;
    } else {
        let store = JsonDirStore::new(&args.output_dir);
        let pipeline = ImportPipeline::new(fetcher, store, content, images);
        run_batches(&pipeline, &descriptors, batch_size, &mut total).await;
    }

    for message in &total.messages {
        warn!("{message}");
    }

    let elapsed = start_time.elapsed();
    info!(
        succeeded = total.succeeded,
        failed = total.failed,
        notices = total.messages.len(),
        ?elapsed,
        "Import complete"
    );

    Ok(())
}

/// Feed the descriptor list to the pipeline in fixed-size batches,
/// reporting progress after each one.
async fn run_batches<F: PageFetch, S: ContentStore>(
    pipeline: &ImportPipeline<F, S>,
    descriptors: &[ArticleDescriptor],
    batch_size: usize,
    total: &mut ImportBatchResult,
) {
    let article_count = descriptors.len();
    let mut processed = 0usize;
    for batch in descriptors.chunks(batch_size) {
        let result = pipeline.import_batch(batch).await;
        processed += batch.len();
        info!(
            processed,
            total = article_count,
            succeeded = result.succeeded,
            failed = result.failed,
            "Processed batch"
        );
        total.merge(result);
    }
}
