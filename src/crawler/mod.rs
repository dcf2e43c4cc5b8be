//! Crawler module for storefront search crawls
//!
//! This module contains the core crawling logic, including:
//! - Crawl request parameters and validation
//! - The sequential page loop
//! - Bounded concurrent enrichment from product pages
//! - The crawl-to-file entry point

mod coordinator;
mod enrich;
mod request;

pub use coordinator::{Coordinator, MAX_PAGES};
pub use request::CrawlRequest;

use crate::output::{CsvSink, WriteMode};
use crate::Result;
use std::path::Path;

/// Runs a crawl and saves its products to a CSV file
///
/// The file is only touched when at least one product was collected.
///
/// # Arguments
///
/// * `coordinator` - Coordinator holding the HTTP session
/// * `request` - The crawl parameters
/// * `output` - Path to the result file
/// * `mode` - Append to or overwrite an existing file
///
/// # Returns
///
/// * `Ok(usize)` - Number of products written
/// * `Err(ScoutError)` - Invalid request or output I/O failure
///
/// # Example
///
/// ```no_run
/// use souq_scout::config::Config;
/// use souq_scout::crawler::{crawl_to_csv, Coordinator, CrawlRequest};
/// use souq_scout::output::WriteMode;
/// use souq_scout::parser::AmazonParser;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let coordinator = Coordinator::new(&config, Arc::new(AmazonParser))?;
/// let request = CrawlRequest::new("laptop", &config.crawl).pages(1);
/// let written = crawl_to_csv(&coordinator, &request, Path::new("out.csv"), WriteMode::Append).await?;
/// println!("saved {written} products");
/// # Ok(())
/// # }
/// ```
pub async fn crawl_to_csv(
    coordinator: &Coordinator,
    request: &CrawlRequest,
    output: &Path,
    mode: WriteMode,
) -> Result<usize> {
    let products = coordinator.crawl(request).await?;

    if products.is_empty() {
        tracing::info!("No products collected.");
        return Ok(0);
    }

    let sink = CsvSink::new(output, mode, coordinator.normalizer().clone());
    let written = sink.write(&products)?;
    tracing::info!("Saved {} products to {}", written, output.display());
    Ok(written)
}
