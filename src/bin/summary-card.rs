//! CLI binary for summary-card.
//!
//! A thin shim over the library crate that reads a card request, maps CLI
//! flags onto `CardConfig` and prints the delivery payload.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use summary_card::{load_request, CardConfig, CardGenerator, ContentKind, OutputMode};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Inline base64 PNG on stdout
  summary-card deck.json --output-mode base64

  # Write ./output/q3.png and print its absolute path
  summary-card deck.json --output-mode local --filename q3

  # Read the request from stdin, upload to S3
  cat deck.json | summary-card - --output-mode s3

  # Print the full result as JSON
  summary-card deck.json --json

REQUEST FORMAT:
  {
    "pageTitle": "Q3 Review",
    "pageDescription": "Highlights from the quarter",
    "style": "default",
    "items": [
      {"type": "data", "title": "Revenue", "category": "Stats", "dataValue": "+42%", "theme": "green"},
      {"type": "list", "title": "Shipped", "category": "Product", "listItems": ["Search", "Export"]},
      {"type": "full", "title": "Next", "category": "Plan", "description": "…", "bgText": "Q4"}
    ],
    "output_mode": "auto",
    "filename": "q3"
  }
  Arguments wrapped in ```json fences or passed as a JSON string are accepted.

OUTPUT MODES:
  auto     s3 if storage is configured, else local if a filename is given, else base64
  base64   PNG as base64 text
  s3       upload and print the object URL
  local    write under the output directory and print the absolute path

ENVIRONMENT VARIABLES:
  AWS_ACCESS_KEY_ID          S3 access key
  AWS_SECRET_ACCESS_KEY      S3 secret key
  AWS_REGION                 S3 region (default: us-east-1)
  S3_BUCKET_NAME             Target bucket
  S3_ENDPOINT                Custom endpoint (MinIO, R2); enables path-style URLs
  OUTPUT_DIR                 Directory for local output (default: ./output)
  CHROME_EXECUTABLE_PATH     Chrome/Chromium binary (also PUPPETEER_EXECUTABLE_PATH)
  CARD_RENDER_TIMEOUT_SECS   Render deadline in seconds (0 disables)
"#;

/// Render summary card decks to PNG.
#[derive(Parser, Debug)]
#[command(
    name = "summary-card",
    version,
    about = "Render summary card decks to PNG through headless Chrome",
    long_about = "Render a summary card deck (title, description, typed cards) to a single \
PNG with headless Chrome, then print it as base64, upload it to S3-compatible storage, or \
write it to disk.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Request JSON file, or `-` for stdin.
    input: String,

    /// Override the request's output mode.
    #[arg(long, env = "SUMMARY_CARD_OUTPUT_MODE", value_enum)]
    output_mode: Option<OutputMode>,

    /// Override the request's filename (local path or S3 key).
    #[arg(long, env = "SUMMARY_CARD_FILENAME")]
    filename: Option<String>,

    /// Directory for local output.
    #[arg(long, env = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Chrome / Chromium executable.
    #[arg(long, env = "CHROME_EXECUTABLE_PATH")]
    chrome: Option<PathBuf>,

    /// Render deadline in seconds (0 disables).
    #[arg(long, env = "CARD_RENDER_TIMEOUT_SECS")]
    render_timeout: Option<u64>,

    /// Print the result as JSON ({"contentKind", "payload"}).
    #[arg(long, env = "SUMMARY_CARD_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "SUMMARY_CARD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SUMMARY_CARD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the payload.
    #[arg(short, long, env = "SUMMARY_CARD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner replaces INFO-level library logs while it is visible.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Request ──────────────────────────────────────────────────────────
    let mut request = load_request(&cli.input)
        .with_context(|| format!("Failed to read card request from '{}'", cli.input))?;
    if let Some(mode) = cli.output_mode {
        request.output_mode = mode;
    }
    if let Some(ref name) = cli.filename {
        request.filename = Some(name.clone());
    }

    // ── Config + generator ───────────────────────────────────────────────
    let config = build_config(&cli)?;
    let generator = CardGenerator::new(config).context("Failed to set up card generator")?;

    let spinner = show_progress.then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Rendering");
        bar.set_message(format!(
            "{} card(s), mode {}",
            request.deck.items.len(),
            request.output_mode
        ));
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    // ── Generate ─────────────────────────────────────────────────────────
    let start = Instant::now();
    let outcome = generator.generate(&request).await;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let result = outcome.context("Card generation failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialise result")?;
        println!("{json}");
    } else {
        println!("{}", result.payload);
    }

    if !cli.quiet && !cli.json {
        let what = match result.content_kind {
            ContentKind::Image => format!("{} base64 chars", result.payload.len()),
            ContentKind::Text => bold(&result.payload),
        };
        eprintln!(
            "{} Card rendered  {}  {}",
            green("✔"),
            what,
            dim(&format!("{}ms", start.elapsed().as_millis()))
        );
    }

    Ok(())
}

/// Map CLI args onto the environment-derived `CardConfig`.
fn build_config(cli: &Cli) -> Result<CardConfig> {
    let mut config = CardConfig::from_env().context("Invalid configuration")?;

    if let Some(ref dir) = cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(ref chrome) = cli.chrome {
        config.chrome_executable = Some(chrome.clone());
    }
    if let Some(secs) = cli.render_timeout {
        config.render_timeout_secs = secs;
    }

    Ok(config)
}
