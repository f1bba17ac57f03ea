//! xvideos-api main entry point
//!
//! This is the command-line interface for harvesting videos from listings.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use xvideos_api::config::{load_config_with_hash, validate, Config};
use xvideos_api::output::{
    generate_markdown_summary, print_statistics, write_json_line, HarvestStatistics,
    HarvestSummary, JsonLinesOutput, OutputHandler,
};
use xvideos_api::{
    Client, ItemResult, ItemStream, SearchFilters, Sort, SortDate, SortQuality, SortVideoTime,
    Video,
};

/// xvideos-api: ordered concurrent listing harvester
///
/// Walks search results, channel or model listings page by page, builds every
/// listed video concurrently, and prints them in listing order.
#[derive(Parser, Debug)]
#[command(name = "xvideos-api")]
#[command(version)]
#[command(about = "Ordered concurrent listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Write a markdown summary of the run to this file
    #[arg(long, global = true, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Print results as JSON lines instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Harvest search results
    Search {
        query: String,

        /// Number of result pages to walk
        #[arg(long)]
        pages: Option<usize>,

        #[arg(long, value_enum, default_value_t)]
        sort: Sort,

        #[arg(long, value_enum, default_value_t)]
        date: SortDate,

        #[arg(long, value_enum, default_value_t)]
        duration: SortVideoTime,

        #[arg(long, value_enum, default_value_t)]
        quality: SortQuality,
    },

    /// Harvest a channel's videos
    Channel {
        name: String,

        #[arg(long)]
        pages: Option<usize>,
    },

    /// Harvest a model's videos
    Model {
        name: String,

        #[arg(long)]
        pages: Option<usize>,
    },

    /// Fetch a single video page
    Video { url: String },

    /// Validate the configuration and print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load_configuration(cli.config.as_deref())?;

    match &cli.command {
        Command::CheckConfig => handle_check_config(&config, config_hash.as_deref()),
        Command::Video { url } => handle_video(config, url, cli.json).await,
        Command::Search {
            query,
            pages,
            sort,
            date,
            duration,
            quality,
        } => {
            let filters = SearchFilters {
                sort: *sort,
                date: *date,
                duration: *duration,
                quality: *quality,
            };
            let pages = pages.unwrap_or(config.listing.pages);
            let client = Client::new(config)?;
            let stream = client.search(query, &filters, pages)?;
            harvest(&cli, format!("search {:?}", query), config_hash, stream).await
        }
        Command::Channel { name, pages } => {
            let pages = pages.unwrap_or(config.listing.pages);
            let client = Client::new(config)?;
            let stream = client.channel_videos(name, pages)?;
            harvest(&cli, format!("channel {}", name), config_hash, stream).await
        }
        Command::Model { name, pages } => {
            let pages = pages.unwrap_or(config.listing.pages);
            let client = Client::new(config)?;
            let stream = client.model_videos(name, pages)?;
            harvest(&cli, format!("model {}", name), config_hash, stream).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout only carries results.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("xvideos_api=info,warn"),
            1 => EnvFilter::new("xvideos_api=debug,info"),
            2 => EnvFilter::new("xvideos_api=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load_configuration(path: Option<&Path>) -> anyhow::Result<(Config, Option<String>)> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok((Config::default(), None));
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok((config, Some(hash)))
}

/// Handles `check-config`: validates and prints the effective configuration
fn handle_check_config(config: &Config, config_hash: Option<&str>) -> anyhow::Result<()> {
    validate(config).context("configuration is invalid")?;

    println!("=== xvideos-api Configuration ===\n");

    println!("Pipeline:");
    println!("  Page concurrency: {}", config.pipeline.page_concurrency);
    println!("  Item concurrency: {}", config.pipeline.item_concurrency);
    println!("  Channel capacity: {}", config.pipeline.channel_capacity);

    println!("\nHTTP:");
    println!("  Base URL: {}", config.http.base_url);
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);

    println!("\nListing:");
    println!("  Default pages: {}", config.listing.pages);

    if let Some(hash) = config_hash {
        println!("\nConfig hash: {}", hash);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles `video`: fetches one page outside the pipeline
async fn handle_video(config: Config, url: &str, json: bool) -> anyhow::Result<()> {
    let client = Client::new(config)?;
    let video = client
        .get_video(url)
        .await
        .with_context(|| format!("failed to fetch video {}", url))?;

    let mut stdout = io::stdout().lock();
    if json {
        write_json_line(&mut stdout, &video)?;
    } else {
        print_video(&mut stdout, &video)?;
    }

    Ok(())
}

/// Drains a listing run, feeding every result to the outputs
async fn harvest(
    cli: &Cli,
    source: String,
    config_hash: Option<String>,
    mut stream: ItemStream<Video>,
) -> anyhow::Result<()> {
    let mut stats = HarvestStatistics::new();
    let mut summary = HarvestSummary::new(source);
    summary.config_hash = config_hash;
    let mut json_output = cli.json.then(|| JsonLinesOutput::new(io::stdout()));

    while let Some(result) = stream.next_item().await {
        stats.record(&result)?;
        summary.record(&result)?;
        match json_output.as_mut() {
            Some(output) => output.record(&result)?,
            None => print_result(&result)?,
        }
    }

    stats.finish()?;
    summary.finish()?;
    if let Some(output) = json_output.as_mut() {
        output.finish()?;
    }

    if let Some(path) = &cli.summary {
        generate_markdown_summary(&summary, path)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        tracing::info!("Summary written to {}", path.display());
    }

    if !cli.quiet {
        print_statistics(&stats);
    }

    Ok(())
}

fn print_result(result: &ItemResult<Video>) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    match result {
        ItemResult::Built { coordinate, item } => writeln!(
            stdout,
            "{:>3}.{:<3} {}  [{}]  {}",
            coordinate.page_index,
            coordinate.item_index,
            item.title,
            item.length.as_deref().unwrap_or("?"),
            item.url
        ),
        ItemResult::Placeholder {
            coordinate, url, ..
        } => writeln!(
            stdout,
            "{:>3}.{:<3} <failed>  {}",
            coordinate.page_index, coordinate.item_index, url
        ),
    }
}

fn print_video(out: &mut impl Write, video: &Video) -> io::Result<()> {
    writeln!(out, "Title:       {}", video.title)?;
    writeln!(out, "URL:         {}", video.url)?;
    writeln!(out, "Author:      {}", video.author)?;
    if let Some(length) = &video.length {
        writeln!(out, "Length:      {}", length)?;
    }
    if let Some(views) = &video.views {
        writeln!(out, "Views:       {}", views)?;
    }
    if let Some(date) = &video.publish_date {
        writeln!(out, "Published:   {}", date)?;
    }
    if !video.tags.is_empty() {
        writeln!(out, "Tags:        {}", video.tags.join(", "))?;
    }
    if !video.models.is_empty() {
        writeln!(out, "Models:      {}", video.models.join(", "))?;
    }
    if let Some(hls) = &video.hls_url {
        writeln!(out, "HLS:         {}", hls)?;
    }
    Ok(())
}
