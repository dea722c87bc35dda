//! Channel-Sweep main entry point
//!
//! This is the command-line interface for the channel video catalog crawler.

use anyhow::Context;
use channel_sweep::config::{compute_config_hash, read_config, validate, Config};
use channel_sweep::crawler::crawl;
use channel_sweep::output::write_crawl_result;
use channel_sweep::url::listing_url;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Channel-Sweep: collect every video of a channel into one JSON file
///
/// Loads the channel's videos tab, follows the platform's pagination until
/// the listing is exhausted, and optionally opens each video page to pick
/// up its full description.
#[derive(Parser, Debug)]
#[command(name = "channel-sweep")]
#[command(version)]
#[command(about = "Collects a channel's videos into a JSON catalog", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Channel URL or @handle (overrides the config file)
    #[arg(long)]
    channel: Option<String>,

    /// Output JSON path (overrides the config file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop after this many videos
    #[arg(long)]
    max_videos: Option<usize>,

    /// Skip the full-description pass (faster, descriptions may be truncated)
    #[arg(long)]
    no_descriptions: bool,

    /// Number of video pages fetched at once during the description pass
    #[arg(long)]
    concurrency: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the resolved settings without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("channel_sweep=info,warn"),
            1 => EnvFilter::new("channel_sweep=debug,info"),
            2 => EnvFilter::new("channel_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command-line overrides, then validates
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = read_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(channel) = &cli.channel {
        config.channel.root = channel.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }
    if cli.max_videos.is_some() {
        config.crawler.max_videos = cli.max_videos;
    }
    if cli.no_descriptions {
        config.crawler.fetch_full_description = false;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.enrich_concurrency = concurrency;
    }

    validate(&config)
        .context("invalid configuration (pass a channel via --channel or the config file)")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let listing = listing_url(&config.channel.root, &config.client.platform_root)?;

    println!("=== Channel-Sweep Dry Run ===\n");

    println!("Channel:");
    println!("  Root: {}", config.channel.root);
    println!("  Videos tab: {}", listing);

    println!("\nCrawler:");
    match config.crawler.max_videos {
        Some(max) => println!("  Max videos: {}", max),
        None => println!("  Max videos: unlimited"),
    }
    println!(
        "  Full descriptions: {}",
        if config.crawler.fetch_full_description { "yes" } else { "no" }
    );
    println!("  Description concurrency: {}", config.crawler.enrich_concurrency);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);

    println!("\nClient:");
    println!("  Platform: {}", config.client.platform_root);
    println!("  Locale: {}-{}", config.client.hl, config.client.gl);

    println!("\nOutput:");
    println!("  Path: {}", config.output.path);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let output_path = PathBuf::from(&config.output.path);

    tracing::info!("Starting crawl of {}", config.channel.root);

    let outcome = crawl(config).await?;

    let written = write_crawl_result(&outcome.result, Path::new(&output_path))?;

    println!("[OK] JSON saved to: {}", written.display());
    if outcome.descriptions_incomplete() {
        println!(
            "Note: some descriptions could not be fetched and may be less complete than requested."
        );
    }

    Ok(())
}
