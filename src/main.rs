//! Datacrawl main entry point
//!
//! This is the command-line interface for the datacrawl web crawler.

use anyhow::{bail, Context};
use clap::Parser;
use datacrawl::config::{read_config_with_hash, CrawlConfig};
use datacrawl::output::{print_statistics, to_pretty_json};
use datacrawl::Crawler;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Datacrawl: a small, polite web crawler
///
/// Datacrawl starts from a root URL, follows links up to a page budget and
/// reports every page it recorded together with the links found on it.
/// Settings come from an optional TOML file; flags override the file.
#[derive(Parser, Debug)]
#[command(name = "datacrawl")]
#[command(version)]
#[command(about = "A small, polite web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// URL the crawl starts from
    #[arg(long)]
    root_url: Option<String>,

    /// Maximum number of pages to record
    #[arg(long)]
    max_links: Option<usize>,

    /// Maximum number of pages fetched at once
    #[arg(long)]
    max_workers: Option<usize>,

    /// Seconds to wait between dispatches
    #[arg(long)]
    delay: Option<f64>,

    /// Write results as JSON to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Only keep links whose URL fully matches this regex
    #[arg(long, value_name = "REGEX")]
    url_regex: Option<String>,

    /// Store page bodies in the results
    #[arg(long)]
    include_body: bool,

    /// Only follow links on the root URL's host
    #[arg(long, conflicts_with = "external_links_only")]
    internal_links_only: bool,

    /// Only follow links off the root URL's host
    #[arg(long)]
    external_links_only: bool,

    /// Do not fetch or honour robots.txt
    #[arg(long)]
    ignore_robots_txt: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and print it without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = read_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (CrawlConfig::default(), None),
    };
    apply_overrides(&mut config, &cli);

    setup_logging(config.verbose, cli.verbose, cli.quiet);

    if let (Some(path), Some(hash)) = (&cli.config, &config_hash) {
        tracing::info!("Configuration loaded from {} (hash: {})", path.display(), hash);
    }

    if config.root_url.trim().is_empty() {
        bail!("No root URL given; set root_url in the config file or pass --root-url");
    }
    config.validate().context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Applies command-line flags on top of the file configuration
fn apply_overrides(config: &mut CrawlConfig, cli: &Cli) {
    if let Some(root_url) = &cli.root_url {
        config.root_url = root_url.clone();
    }
    if let Some(max_links) = cli.max_links {
        config.max_links = max_links;
    }
    if let Some(max_workers) = cli.max_workers {
        config.max_workers = max_workers;
    }
    if let Some(delay) = cli.delay {
        config.delay = delay;
    }
    if let Some(output) = &cli.output {
        config.save_to_file = Some(output.clone());
    }
    if let Some(pattern) = &cli.url_regex {
        config.url_regex = Some(pattern.clone());
    }
    if cli.include_body {
        config.include_body = true;
    }
    if cli.internal_links_only {
        config.internal_links_only = true;
        config.external_links_only = false;
    }
    if cli.external_links_only {
        config.external_links_only = true;
        config.internal_links_only = false;
    }
    if cli.ignore_robots_txt {
        config.respect_robots_txt = false;
    }
    if cli.verbose > 0 {
        config.verbose = true;
    }
    if cli.quiet {
        config.verbose = false;
    }
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` wins when set. Otherwise the configured `verbose` flag picks
/// debug or info for this crate, and `-vv` turns on trace.
fn setup_logging(config_verbose: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 if !config_verbose => EnvFilter::new("datacrawl=info,warn"),
                0 | 1 => EnvFilter::new("datacrawl=debug,warn"),
                _ => EnvFilter::new("datacrawl=trace,info"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &CrawlConfig) {
    println!("=== Datacrawl Dry Run ===\n");

    println!("Crawl:");
    println!("  Root URL: {}", config.root_url);
    println!("  Max links: {}", config.max_links);
    println!("  Max workers: {}", config.max_workers);
    println!("  Delay: {}s", config.delay);

    println!("\nFiltering:");
    println!(
        "  URL regex: {}",
        config.url_regex.as_deref().unwrap_or("(none)")
    );
    let scope = if config.internal_links_only {
        "internal links only"
    } else if config.external_links_only {
        "external links only"
    } else {
        "all links"
    };
    println!("  Scope: {}", scope);

    println!("\nRequests:");
    println!("  User agent: {}", config.user_agent);
    println!("  Respect robots.txt: {}", config.respect_robots_txt);
    println!("  Timeout: {}s", config.request_timeout);
    println!("  Max retry attempts: {}", config.max_retry_attempts);
    println!("  Retry backoff: {}s", config.retry_backoff);

    println!("\nOutput:");
    match &config.save_to_file {
        Some(path) => println!("  File: {}", path.display()),
        None => println!("  File: (stdout)"),
    }
    println!("  Include bodies: {}", config.include_body);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: CrawlConfig) -> anyhow::Result<()> {
    let to_stdout = config.save_to_file.is_none();

    let crawler = Crawler::new(config)
        .context("Failed to set up crawler")?
        .on_page(|url, page| {
            tracing::info!("Crawled {} ({} links)", url, page.urls.len());
        });

    let results = match crawler.run().await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if to_stdout {
        println!("{}", to_pretty_json(&results)?);
    } else {
        print_statistics(&crawler.stats());
    }

    Ok(())
}
