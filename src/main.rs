//! Site-Mirror main entry point
//!
//! This is the command-line interface for the Site-Mirror crawler.

use anyhow::{bail, Context};
use clap::Parser;
use site_mirror::config::{load_config_with_hash, validate, Config};
use site_mirror::crawler::mirror;
use site_mirror::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Mirror: mirror a website onto local storage
///
/// Starting from a seed page, Site-Mirror downloads every same-origin page, stylesheet,
/// script and image it can reach, writing each under a path that mirrors its URL.
#[derive(Parser, Debug)]
#[command(name = "site-mirror")]
#[command(version)]
#[command(about = "Mirror a website onto local storage", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL (overrides the config file)
    #[arg(short, long, value_name = "URL")]
    seed: Option<String>,

    /// Output directory (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be mirrored without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let report = mirror(config).await.context("Mirror failed")?;

    if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mirror=info,warn"),
            1 => EnvFilter::new("site_mirror=debug,info"),
            2 => EnvFilter::new("site_mirror=trace,debug"),
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

/// Builds the effective configuration from the config file and CLI overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match (&cli.config, &cli.seed) {
        (Some(path), _) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        (None, Some(seed)) => Config::from_seed(seed.clone(), "mirror"),
        (None, None) => bail!("No seed URL given: pass a CONFIG file or --seed <URL>"),
    };

    if let Some(seed) = &cli.seed {
        config.mirror.seed_url = seed.clone();
    }
    if let Some(output) = &cli.output {
        config.mirror.output_dir = output.clone();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be mirrored
fn handle_dry_run(config: &Config) {
    println!("=== Site-Mirror Dry Run ===\n");

    println!("Mirror:");
    println!("  Seed URL: {}", config.mirror.seed_url);
    println!("  Output directory: {}", config.mirror.output_dir);

    println!("\nFetch:");
    println!("  User agent: {}", config.fetch.user_agent);
    println!("  Timeout: {}ms", config.fetch.timeout_ms);
    println!("  Connect timeout: {}ms", config.fetch.connect_timeout_ms);
    println!("  Max redirects: {}", config.fetch.max_redirects);
    println!(
        "  Retries: {} (backoff {}ms)",
        config.fetch.max_retries, config.fetch.retry_backoff_ms
    );

    println!("\nCrawl:");
    println!("  Order: {:?}", config.crawl.order);
    println!("  Skip existing files: {}", config.crawl.skip_existing);
    println!("  Index file: {}", config.crawl.index_file);
    println!("  Collision policy: {:?}", config.crawl.collision);
    match config.crawl.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }

    println!("\n✓ Configuration is valid");
}
