//! pomerge command-line tool.
//!
//! Reads a gettext catalog that a merge left with conflict markers inside
//! its translations, keeps the variant of one revision in every conflicted
//! entry, and writes the result to a new file.

mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pomerge_core::config::ToolConfig;
use pomerge_core::{CatalogStore, ConflictResolver, PoFile};

use report::Summary;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Resolve merge-conflict markers in gettext PO catalogs.
#[derive(Parser, Debug)]
#[command(
    name = "pomerge",
    version,
    about = "Keep one revision's variant of every conflicted PO translation"
)]
struct Cli {
    /// Revision label whose variant to keep (e.g. base, ours, theirs).
    label: String,

    /// Conflicted PO file to read.
    input: PathBuf,

    /// Where to write the resolved PO file.
    output: PathBuf,

    /// Keep resolved translations marked as fuzzy.
    #[arg(short, long)]
    fuzzy: bool,

    /// Exit with failure when some conflicts have no variant for LABEL.
    #[arg(long)]
    strict: bool,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Summary format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Effective options after merging the config file and the flags.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    keep_fuzzy: bool,
    strict: bool,
    log_level: String,
}

impl Settings {
    fn from_sources(cli: &Cli, config: &ToolConfig) -> Self {
        Self {
            keep_fuzzy: cli.fuzzy || config.resolve.keep_fuzzy,
            strict: cli.strict || config.resolve.strict,
            log_level: if cli.verbose {
                "debug".into()
            } else {
                config.logging.level.to_ascii_lowercase()
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", report::render_error(&format!("Error: {:#}", e)));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    let settings = Settings::from_sources(&cli, &config);
    init_logging(&settings.log_level);
    debug!(?settings, label = %cli.label, "effective settings");

    let resolver = ConflictResolver::new(cli.label.as_str(), settings.keep_fuzzy)
        .context("invalid revision label")?;

    let store = PoFile;
    let mut catalog = store
        .load(&cli.input)
        .with_context(|| format!("failed to load catalog {}", cli.input.display()))?;

    let report = resolver.resolve(&mut catalog);

    store
        .write(&catalog, &cli.output)
        .with_context(|| format!("failed to write catalog {}", cli.output.display()))?;

    let summary = Summary {
        input: &cli.input,
        output: &cli.output,
        report: &report,
    };
    match cli.format {
        OutputFormat::Text => println!("{}", report::render_text(&summary)),
        OutputFormat::Json => println!(
            "{}",
            report::render_json(&summary).context("failed to serialize summary")?
        ),
    }

    if settings.strict && report.counters.unmatched > 0 {
        eprintln!(
            "{}",
            report::render_strict_failure(resolver.label(), report.counters.unmatched)
        );
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<ToolConfig> {
    match path {
        Some(path) => ToolConfig::load_and_validate(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => ToolConfig::load_default().context("failed to load default configuration"),
    }
}

/// Log to stderr so stdout carries only the summary. `RUST_LOG` wins over
/// the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
