//! Webarc main entry point
//!
//! Command-line interface for bundling a web page and its static resources
//! into a `.webarchive` document.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;
use webarc::archiver::{archive, ArchiveOptions, SessionCookie};
use webarc::config::{load_config, Config};

/// Webarc: a single-page web archiver
///
/// Fetches a page together with its images, stylesheets, scripts, and
/// stylesheet-referenced images, and writes a self-contained .webarchive
/// file usable for offline viewing.
#[derive(Parser, Debug)]
#[command(name = "webarc")]
#[command(version)]
#[command(about = "Bundle a web page into a .webarchive document", long_about = None)]
struct Cli {
    /// URL of the page to archive
    #[arg(value_name = "URL")]
    url: String,

    /// Output file (defaults to <host>.webarchive)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Cookie sent with every request, as NAME=VALUE (repeatable)
    #[arg(long = "cookie", value_name = "NAME=VALUE")]
    cookies: Vec<SessionCookie>,

    /// Do not collect <script src> resources
    #[arg(long)]
    no_javascript: bool,

    /// Bypass HTTP caches on every request
    #[arg(long)]
    skip_cache: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let url = Url::parse(&cli.url).with_context(|| format!("invalid URL: {}", cli.url))?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&url));

    let options = ArchiveOptions {
        cookies: cli.cookies,
        include_javascript: !cli.no_javascript,
        skip_cache: cli.skip_cache,
        http: config.http,
    };

    let result = archive(url, &options).await;

    for error in &result.errors {
        tracing::warn!("{}", error);
    }

    match result.archive_data {
        Some(data) => {
            std::fs::write(&output, &data)
                .with_context(|| format!("failed to write {}", output.display()))?;
            tracing::info!("Wrote {} bytes to {}", data.len(), output.display());
            Ok(())
        }
        None => anyhow::bail!(
            "no archive produced ({} error(s), run with -v for details)",
            result.errors.len()
        ),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webarc=info,warn"),
            1 => EnvFilter::new("webarc=debug,info"),
            2 => EnvFilter::new("webarc=trace,debug"),
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

/// Derives an output file name from the page host
fn default_output_path(url: &Url) -> PathBuf {
    let host = url.host_str().unwrap_or("page");
    PathBuf::from(format!("{}.webarchive", host))
}
