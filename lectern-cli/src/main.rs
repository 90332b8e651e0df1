// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Lectern CLI - fetch content API payloads from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Fetch the document behind a route path
//! lectern document /features/text
//!
//! # Same document, as segments
//! lectern document features text
//!
//! # Fetch the site record, pretty-printed
//! lectern site --pretty
//!
//! # Point at a backend without touching the environment
//! lectern document / --base-url http://localhost:8081
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use url::Url;

use lectern_client::{ClientConfig, ContentClient, FetchOptions, RoutePath};

// ============================================================================
// CLI Definition
// ============================================================================

/// Lectern CLI - content API fetches for scripting and debugging.
#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Fetch documents and site data from a content API backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides NEOS_BASE_URL).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Fetch the document behind a route path.
    #[command(visible_alias = "d")]
    Document(DocumentArgs),

    /// Fetch the site record.
    #[command(visible_alias = "s")]
    Site,
}

/// Arguments for the document command.
#[derive(clap::Args)]
struct DocumentArgs {
    /// Route path, either one `/`-prefixed path or individual segments.
    #[arg(required = true)]
    path: Vec<String>,

    /// Exit quietly with `null` when no backend is configured.
    #[arg(long)]
    optional: bool,
}

/// CLI exit codes.
#[repr(i32)]
enum ExitCode {
    /// Document not found on the backend.
    NotFound = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("lectern=debug,info")
    } else {
        EnvFilter::new("lectern=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let client = build_client(cli.base_url.as_deref())?;

    match &cli.command {
        Commands::Document(args) => run_document(&client, args, cli.pretty).await,
        Commands::Site => run_site(&client, cli.pretty).await,
    }
}

fn build_client(base_url: Option<&str>) -> Result<ContentClient> {
    let mut config = ClientConfig::from_env()?;

    if let Some(raw) = base_url {
        let url = Url::parse(raw).with_context(|| format!("invalid --base-url: {raw}"))?;
        config = ClientConfig::new(Some(url), config.public_base_url().cloned());
    }

    Ok(ContentClient::new(config))
}

async fn run_document(client: &ContentClient, args: &DocumentArgs, pretty: bool) -> Result<()> {
    let route = resolve_route(&args.path);
    let mut opts = FetchOptions::new();
    if args.optional {
        opts = opts.optional();
    }

    match client.fetch_document(route, &opts).await? {
        Some(payload) => print_json(payload.value(), pretty),
        None if args.optional => {
            println!("null");
            Ok(())
        }
        None => {
            eprintln!("Document not found");
            std::process::exit(ExitCode::NotFound as i32);
        }
    }
}

async fn run_site(client: &ContentClient, pretty: bool) -> Result<()> {
    match client.fetch_site(&FetchOptions::new()).await? {
        Some(payload) => print_json(payload.value(), pretty),
        None => {
            println!("null");
            Ok(())
        }
    }
}

/// A single `/`-prefixed argument is a complete path; anything else is
/// treated as segments.
fn resolve_route(path: &[String]) -> RoutePath {
    match path {
        [single] if single.starts_with('/') => RoutePath::Path(single.clone()),
        _ => RoutePath::Segments(path.to_vec()),
    }
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_slash_argument_is_a_path() {
        let route = resolve_route(&["/features/text".to_string()]);
        assert_eq!(route, RoutePath::Path("/features/text".to_string()));
    }

    #[test]
    fn test_multiple_arguments_are_segments() {
        let route = resolve_route(&["features".to_string(), "text".to_string()]);
        assert_eq!(route.resolve(), "/features/text");
    }

    #[test]
    fn test_single_bare_argument_is_a_segment() {
        let route = resolve_route(&["features".to_string()]);
        assert_eq!(route.resolve(), "/features");
    }
}
