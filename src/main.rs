//! Purr-Links main entry point
//!
//! Console front end for the link resolver: every line read from stdin is
//! treated as one chat message, and results are printed to stdout.

use anyhow::Context;
use clap::Parser;
use purr_links::config::{load_config_with_hash, Config};
use purr_links::output::{ChatTarget, ConsoleSink, ResolutionContext, ResultSink};
use purr_links::resolver::{exchange_deadline, MAX_HOPS};
use purr_links::ResolverDispatcher;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Purr-Links: link resolution for chat bots
///
/// Reads chat lines from stdin, detects web links, Spotify URIs and Giphy
/// searches in each, and prints one summary line per resolved link.
#[derive(Parser, Debug)]
#[command(name = "purr-links")]
#[command(version)]
#[command(about = "Resolves links mentioned in chat lines", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Chat target that results are addressed to
    #[arg(short, long, default_value = "#console")]
    target: String,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the effective settings without resolving anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_chat(config, ChatTarget::new(cli.target)).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("purr_links=info,warn"),
            1 => EnvFilter::new("purr_links=debug,info"),
            2 => EnvFilter::new("purr_links=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Results go to stdout, so logs stay on stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Purr-Links Dry Run ===\n");

    println!("Web Resolver:");
    println!("  Connect timeout: {}ms", config.resolver.connect_timeout_ms);
    println!("  Read timeout: {}ms", config.resolver.read_timeout_ms);
    println!("  Max title bytes: {}", config.resolver.max_title_bytes);
    println!("  Max hops: {}", MAX_HOPS);
    println!("  User agent: {}", config.resolver.user_agent);

    println!("\nGiphy:");
    if config.giphy.enabled {
        println!("  API base: {}", config.giphy.api_base);
        println!("  Rating: {}", config.giphy.rating);
    } else {
        println!("  (disabled)");
    }

    println!("\nSpotify:");
    if config.spotify.enabled {
        println!("  Lookup base: {}", config.spotify.lookup_base);
    } else {
        println!("  (disabled)");
    }

    println!("\n✓ Configuration is valid");
}

/// Feeds stdin lines to the dispatcher until end of input or Ctrl-C
async fn handle_chat(config: Config, target: ChatTarget) -> anyhow::Result<()> {
    let sink: Arc<dyn ResultSink> = Arc::new(ConsoleSink::new());
    let dispatcher =
        ResolverDispatcher::new(&config, sink).context("Failed to start resolver dispatcher")?;
    let context = ResolutionContext::new(target);

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut messages = 0usize;
    let mut spawned = 0usize;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read from stdin")? {
                    Some(line) => {
                        messages += 1;
                        spawned += dispatcher.handle_message(&line, &context);
                    }
                    None => break,
                }
            }
            _ = &mut interrupt => {
                tracing::info!("Interrupted, abandoning {} in-flight resolutions", dispatcher.in_flight());
                dispatcher.shutdown();
                return Ok(());
            }
        }
    }

    // Worst case for one resolution: every hop plus the final fetch
    let grace = exchange_deadline(&config.resolver) * (MAX_HOPS + 1);
    tracing::info!(
        "End of input after {} messages ({} resolutions started), waiting up to {:?}",
        messages,
        spawned,
        grace
    );

    tokio::select! {
        settled = tokio::time::timeout(grace, dispatcher.settle()) => {
            if settled.is_err() {
                tracing::warn!("{} resolutions still running, abandoning them", dispatcher.in_flight());
            }
        }
        _ = &mut interrupt => {
            tracing::info!("Interrupted while waiting for resolutions");
        }
    }

    dispatcher.shutdown();
    Ok(())
}
