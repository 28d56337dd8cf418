//! Command-line interface definitions for the sitemap importer.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags or environment variables.

use clap::Parser;

use crate::models::PostStatus;

/// Command-line arguments for the sitemap importer.
///
/// # Examples
///
/// ```sh
/// # Import everything from a sitemap as published records
/// news_sitemap_importer -s https://example.com/sitemap.xml -o ./records
///
/// # Import as drafts, five articles per batch
/// news_sitemap_importer -s https://example.com/sitemap.xml -o ./records \
///     --status draft --batch-size 5
///
/// # Dry run: extract and report, keep nothing on disk
/// news_sitemap_importer -s https://example.com/sitemap.xml -o ./records --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// URL of the news sitemap to import
    #[arg(short, long, env = "SITEMAP_URL")]
    pub sitemap_url: String,

    /// Output directory for imported record files
    #[arg(short, long)]
    pub output_dir: String,

    /// Publication status stamped on every imported record
    #[arg(long, value_enum, default_value_t = PostStatus::Publish)]
    pub status: PostStatus,

    /// Number of articles processed per batch
    #[arg(short, long, default_value_t = 5)]
    pub batch_size: usize,

    /// Optional path to a scrape-config YAML file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Parse and extract but keep records in memory only
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(&[
            "news_sitemap_importer",
            "--sitemap-url",
            "https://example.com/sitemap.xml",
            "--output-dir",
            "./records",
        ]);

        assert_eq!(cli.sitemap_url, "https://example.com/sitemap.xml");
        assert_eq!(cli.output_dir, "./records");
        assert_eq!(cli.status, PostStatus::Publish);
        assert_eq!(cli.batch_size, 5);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_short_flags_and_status() {
        let cli = Cli::parse_from(&[
            "news_sitemap_importer",
            "-s",
            "https://example.com/sitemap.xml",
            "-o",
            "/tmp/records",
            "--status",
            "draft",
            "-b",
            "10",
        ]);

        assert_eq!(cli.output_dir, "/tmp/records");
        assert_eq!(cli.status, PostStatus::Draft);
        assert_eq!(cli.batch_size, 10);
    }
}
