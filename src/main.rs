//! Comment Harvest main entry point
//!
//! This is the command-line interface for the Comment Harvest collector.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use comment_harvest::config::{
    apply_env_fallback, compute_config_hash, hash_content, parse_config, require_credentials,
    validate, Config, OutputFormat,
};
use comment_harvest::output::{
    generate_markdown_summary, load_statistics, print_statistics, CommentSink, CsvSink, SqliteSink,
};
use comment_harvest::storage::SqliteStorage;
use comment_harvest::{Harvester, SkipPolicy, YouTubeClient};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Comment Harvest: YouTube channel comment collector
///
/// Lists every video of a channel, fetches the top-level comments of each
/// one, and stores them in SQLite or exports them to CSV. The API key and
/// channel id come from the config file or the API_KEY / CHANNEL_ID
/// environment variables (a .env file is read when present).
#[derive(Parser, Debug)]
#[command(name = "comment-harvest")]
#[command(version)]
#[command(about = "YouTube channel comment collector", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults and environment are used without it)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Channel to harvest, overriding config and environment
    #[arg(long, value_name = "CHANNEL_ID")]
    channel: Option<String>,

    /// Comment threads to read per video (1-100)
    #[arg(long, value_name = "N")]
    limit: Option<u32>,

    /// Where comments are written
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Database or CSV path for the selected format
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Which fetched comments are dropped before storing
    #[arg(long, value_enum)]
    skip_policy: Option<SkipPolicyArg>,

    /// Validate config and show what would be harvested without calling the API
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Write a markdown summary of the database to PATH and exit
    #[arg(long, value_name = "PATH", conflicts_with_all = ["dry_run", "stats"])]
    export_summary: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Sqlite,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Sqlite => OutputFormat::Sqlite,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SkipPolicyArg {
    Never,
    FirstEmpty,
    EmptyText,
}

impl From<SkipPolicyArg> for SkipPolicy {
    fn from(arg: SkipPolicyArg) -> Self {
        match arg {
            SkipPolicyArg::Never => SkipPolicy::Never,
            SkipPolicyArg::FirstEmpty => SkipPolicy::FirstEmpty,
            SkipPolicyArg::EmptyText => SkipPolicy::EmptyText,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let (config, config_hash) = load_configuration(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(summary_path) = &cli.export_summary {
        handle_export_summary(&config, summary_path)?;
    } else {
        handle_harvest(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("comment_harvest=info,warn"),
            1 => EnvFilter::new("comment_harvest=debug,info"),
            2 => EnvFilter::new("comment_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the effective configuration: file, then environment, then flags
fn load_configuration(cli: &Cli) -> anyhow::Result<(Config, String)> {
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = parse_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, hash)
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            (Config::default(), hash_content(""))
        }
    };

    apply_env_fallback(&mut config, |key| std::env::var(key).ok());

    if let Some(channel) = &cli.channel {
        config.youtube.channel_id = Some(channel.clone());
    }
    if let Some(limit) = cli.limit {
        config.youtube.comments_limit = limit;
    }
    if let Some(format) = cli.format {
        config.output.format = format.into();
    }
    if let Some(output) = &cli.output {
        let output = output.to_string_lossy().into_owned();
        match config.output.format {
            OutputFormat::Sqlite => config.output.database_path = output,
            OutputFormat::Csv => config.output.csv_path = output,
        }
    }
    if let Some(policy) = cli.skip_policy {
        config.pipeline.skip_policy = policy.into();
    }

    validate(&config).context("Invalid configuration")?;

    Ok((config, config_hash))
}

/// Handles the --dry-run mode: validates config and shows what would be harvested
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Comment Harvest Dry Run ===\n");

    println!("YouTube:");
    println!("  API base URL: {}", config.youtube.api_base_url);
    println!(
        "  Channel: {}",
        config.youtube.channel_id.as_deref().unwrap_or("<not set>")
    );
    println!(
        "  API key: {}",
        if config.youtube.api_key.is_some() {
            "set"
        } else {
            "<not set>"
        }
    );
    println!("  Comments per video: {}", config.youtube.comments_limit);

    println!("\nOutput:");
    println!("  Format: {}", config.output.format);
    match config.output.format {
        OutputFormat::Sqlite => println!("  Database: {}", config.output.database_path),
        OutputFormat::Csv => println!("  CSV file: {}", config.output.csv_path),
    }

    println!("\nPipeline:");
    println!("  Skip policy: {}", config.pipeline.skip_policy);

    require_credentials(&config.youtube)?;
    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary
fn handle_export_summary(config: &Config, summary_path: &Path) -> anyhow::Result<()> {
    println!("=== Exporting Harvest Summary ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", summary_path.display());
    println!();

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    tracing::info!("Loading harvest data from database...");
    let stats = load_statistics(&storage)?;

    tracing::info!("Generating markdown summary...");
    generate_markdown_summary(&stats, summary_path)?;

    println!("✓ Summary exported to: {}", summary_path.display());

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    let (api_key, channel_id) = require_credentials(&config.youtube)?;
    let client = YouTubeClient::from_config(&config.youtube, api_key)?;

    tracing::info!(
        "Harvesting channel {} into {} (limit {} per video)",
        channel_id,
        config.output.format,
        config.youtube.comments_limit
    );

    match config.output.format {
        OutputFormat::Sqlite => {
            let path = &config.output.database_path;
            let storage = SqliteStorage::new(Path::new(path))
                .with_context(|| format!("Failed to open database {}", path))?;
            let sink = SqliteSink::new(storage, path.as_str(), config_hash);
            run_harvest(client, sink, config, channel_id).await
        }
        OutputFormat::Csv => {
            let sink = CsvSink::new(&config.output.csv_path);
            run_harvest(client, sink, config, channel_id).await
        }
    }
}

/// Drives one harvest into `sink` and reports the outcome
async fn run_harvest<S: CommentSink>(
    client: YouTubeClient,
    sink: S,
    config: &Config,
    channel_id: &str,
) -> anyhow::Result<()> {
    let mut harvester = Harvester::new(
        client,
        sink,
        config.youtube.comments_limit,
        config.pipeline.skip_policy,
    );

    let report = harvester
        .run(channel_id)
        .await
        .with_context(|| format!("Harvest of channel {} failed", channel_id))?;

    println!(
        "Fetched comments from {} of {} videos ({} comments stored)",
        report.videos_processed(),
        report.videos_listed,
        report.comments_stored
    );
    if report.has_failures() {
        println!(
            "{} videos failed (errors logged above)",
            report.failures.len()
        );
    }
    println!(
        "All data successfully stored in {}",
        harvester.sink().target()
    );

    Ok(())
}
