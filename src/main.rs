//! Souq-Scout main entry point
//!
//! This is the command-line interface for the Souq-Scout shopping discovery
//! pipeline.

use anyhow::Context;
use clap::{Parser, Subcommand};
use souq_scout::config::{load_config_with_hash, validate, Config};
use souq_scout::crawler::{crawl_to_csv, Coordinator, CrawlRequest};
use souq_scout::output::{read_products, write_products, WriteMode};
use souq_scout::parser::AmazonParser;
use souq_scout::pipeline::{SearchHistory, SearchOutcome, SearchPipeline};
use souq_scout::price::PriceNormalizer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Souq-Scout: shopping discovery from a free-text request
///
/// Souq-Scout turns Arabic or English shopping requests into search facets,
/// crawls storefront search results with bounded concurrency, and ranks the
/// candidates against the request.
#[derive(Parser, Debug)]
#[command(name = "souq-scout")]
#[command(version = "1.0.0")]
#[command(about = "Shopping discovery from a free-text request", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl search results for a query and save them to CSV
    Crawl {
        /// Product search query
        #[arg(short, long)]
        query: String,

        /// Language for the search results (e.g. en or ar)
        #[arg(short, long)]
        language: Option<String>,

        /// Result pages to fetch (0 = until a page has no items)
        #[arg(short, long)]
        pages: Option<u32>,

        /// CSV output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Delay between page fetches in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Visit each product page for description and specs
        #[arg(long)]
        detailed: bool,

        /// Stop after this many products (0 = no limit)
        #[arg(long)]
        max_products: Option<usize>,

        /// Number of concurrent product-page fetches
        #[arg(long)]
        concurrency: Option<usize>,

        /// Overwrite the output file instead of appending
        #[arg(long)]
        no_append: bool,
    },

    /// Search live: extract facets, crawl, and rank
    Search {
        /// The shopping request, e.g. "عايز كوتش اسود مقاس 44 تحت 1500"
        text: String,

        /// Number of ranked products to show (at least 1)
        #[arg(long, value_parser = top_n_parser())]
        top_n: Option<usize>,

        /// Enrich candidates from their product pages
        #[arg(long)]
        detailed: bool,

        /// Also save every crawled candidate to this CSV file
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank products from a saved CSV file without network access
    Rank {
        /// The shopping request
        text: String,

        /// CSV file written by `crawl`
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Number of ranked products to show (at least 1)
        #[arg(long, value_parser = top_n_parser())]
        top_n: Option<usize>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration and print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    let result = match cli.command {
        Command::Crawl {
            query,
            language,
            pages,
            output,
            delay_ms,
            detailed,
            max_products,
            concurrency,
            no_append,
        } => {
            let mut request =
                CrawlRequest::new(query, &config.crawl).detailed(detailed || config.crawl.detailed);
            if let Some(language) = language {
                request = request.language(language);
            }
            if let Some(pages) = pages {
                request = request.pages(pages);
            }
            if let Some(delay_ms) = delay_ms {
                request = request.page_delay(Duration::from_millis(delay_ms));
            }
            if let Some(max_products) = max_products {
                request = request.max_products(max_products);
            }
            if let Some(concurrency) = concurrency {
                request = request.concurrency(concurrency);
            }
            let output = output.unwrap_or_else(|| PathBuf::from(&config.output.path));
            let mode = if no_append {
                WriteMode::Overwrite
            } else {
                WriteMode::from_append(config.output.append)
            };
            handle_crawl(&config, request, output, mode).await
        }
        Command::Search {
            text,
            top_n,
            detailed,
            save,
            json,
        } => handle_search(&config, &text, top_n, detailed, save, json).await,
        Command::Rank {
            text,
            input,
            top_n,
            json,
        } => handle_rank(&config, &text, input, top_n, json),
        Command::CheckConfig => handle_check_config(&config),
    };

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

fn top_n_parser() -> clap::builder::RangedU64ValueParser<usize> {
    clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("souq_scout=info,warn"),
            1 => EnvFilter::new("souq_scout=debug,info"),
            2 => EnvFilter::new("souq_scout=trace,debug"),
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

/// Loads the configuration file, or validated defaults when none is given
fn load(path: &Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("reading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

fn coordinator(config: &Config) -> anyhow::Result<Coordinator> {
    Ok(Coordinator::new(config, Arc::new(AmazonParser))?)
}

/// Handles the `crawl` command
async fn handle_crawl(
    config: &Config,
    request: CrawlRequest,
    output: PathBuf,
    mode: WriteMode,
) -> anyhow::Result<()> {
    let coordinator = coordinator(config)?;

    let written = crawl_to_csv(&coordinator, &request, &output, mode)
        .await
        .with_context(|| format!("crawl for '{}' failed", request.query))?;

    if written > 0 {
        println!("Saved {} products to {}", written, output.display());
    } else {
        println!("No products collected.");
    }
    Ok(())
}

/// Handles the `search` command
async fn handle_search(
    config: &Config,
    text: &str,
    top_n: Option<usize>,
    detailed: bool,
    save: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let mut pipeline = SearchPipeline::new(config, coordinator(config)?)
        .detailed(detailed || config.search.detailed);
    if let Some(top_n) = top_n {
        pipeline = pipeline.top_n(top_n);
    }

    let (outcome, history) = pipeline.run(text, SearchHistory::new()).await?;
    tracing::debug!("History now holds {} searches", history.len());

    if let Some(path) = save {
        if !outcome.candidates.is_empty() {
            let normalizer = PriceNormalizer::new(&config.price);
            let mode = WriteMode::from_append(config.output.append);
            let written = write_products(&path, &outcome.candidates, mode, &normalizer)
                .with_context(|| format!("saving candidates to {}", path.display()))?;
            tracing::info!("Saved {} candidates to {}", written, path.display());
        }
    }

    print_outcome(config, &outcome, json)
}

/// Handles the `rank` command
fn handle_rank(
    config: &Config,
    text: &str,
    input: PathBuf,
    top_n: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let normalizer = PriceNormalizer::new(&config.price);
    let candidates = read_products(&input, &normalizer)
        .with_context(|| format!("reading {}", input.display()))?;
    tracing::info!("Loaded {} products from {}", candidates.len(), input.display());

    let mut pipeline = SearchPipeline::new(config, coordinator(config)?);
    if let Some(top_n) = top_n {
        pipeline = pipeline.top_n(top_n);
    }

    let outcome = pipeline.rank_saved(text, candidates);
    print_outcome(config, &outcome, json)
}

/// Handles the `check-config` command: validates config and shows the settings
fn handle_check_config(config: &Config) -> anyhow::Result<()> {
    println!("=== Souq-Scout Configuration ===\n");

    println!("Fetch:");
    println!("  User agent: {}", config.fetch.user_agent);
    println!("  Accept-Language: {}", config.fetch.accept_language);
    println!(
        "  Timeouts: {}s total, {}s connect",
        config.fetch.timeout_secs, config.fetch.connect_timeout_secs
    );
    println!(
        "  Retries: {} attempts, {}ms base back-off, statuses {:?}",
        config.fetch.max_attempts, config.fetch.backoff_base_ms, config.fetch.retry_statuses
    );

    println!("\nCrawl:");
    println!("  Base URL: {}", config.crawl.base_url);
    println!("  Language: {}", config.crawl.language);
    println!("  Pages: {}", config.crawl.pages);
    println!("  Page delay: {}ms", config.crawl.page_delay_ms);
    println!("  Detailed: {}", config.crawl.detailed);
    println!("  Max products: {}", config.crawl.max_products);
    println!("  Concurrency: {}", config.crawl.concurrency);

    println!("\nOutput:");
    println!("  Path: {}", config.output.path);
    println!("  Append: {}", config.output.append);

    println!("\nPrices:");
    println!("  Currency tokens: {}", config.price.currency_tokens.join(", "));
    println!("  Cents digits: {}", config.price.cents_digits);

    println!("\nSearch:");
    println!("  Pages: {}", config.search.pages);
    println!("  Max products: {}", config.search.max_products);
    println!("  Top N: {}", config.ranking.top_n);

    println!("\n✓ Configuration is valid");
    Ok(())
}

fn print_outcome(config: &Config, outcome: &SearchOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    let facets = &outcome.facets;
    println!("Facets:");
    println!("  Product: {}", facets.product().as_str());
    if let Some(brand) = facets.brand() {
        println!("  Brand: {}", brand);
    }
    if let Some(color) = facets.color() {
        println!("  Color: {}", color);
    }
    if let Some(size) = facets.size() {
        println!("  Size: {}", size);
    }
    if let Some(budget) = facets.budget() {
        println!("  Budget: {}", budget);
    }
    for (feature, value) in facets.features() {
        println!("  {}: {}", feature.as_str(), value);
    }
    if !facets.intents().is_empty() {
        let intents: Vec<&str> = facets.intents().iter().map(|i| i.as_str()).collect();
        println!("  Intents: {}", intents.join(", "));
    }
    println!("  Crawl query: {}", outcome.crawl_query);

    println!(
        "\nTop {} of {} candidates:",
        outcome.results.len(),
        outcome.candidates.len()
    );

    let normalizer = PriceNormalizer::new(&config.price);
    for (i, scored) in outcome.results.iter().enumerate() {
        let product = &scored.product;
        let price = product
            .price
            .map(|p| normalizer.format(p))
            .unwrap_or_else(|| "n/a".to_string());
        let rating = product
            .rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:>2}. [{:.1}] {} | price {} | rating {}",
            i + 1,
            scored.score,
            product.title,
            price,
            rating
        );
        println!("    {}", product.link_or_placeholder());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_n_must_be_positive() {
        let zero = Cli::try_parse_from(["souq-scout", "rank", "shoes", "-i", "in.csv", "--top-n", "0"]);
        assert!(zero.is_err());

        let cli = Cli::try_parse_from(["souq-scout", "search", "shoes", "--top-n", "3"]).unwrap();
        assert!(matches!(cli.command, Command::Search { top_n: Some(3), .. }));
    }

    #[test]
    fn test_crawl_query_flag_does_not_clash_with_quiet() {
        let cli = Cli::try_parse_from(["souq-scout", "--quiet", "crawl", "-q", "laptop"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Command::Crawl { ref query, .. } if query == "laptop"));
    }
}
