//! Bounded worker pool for product page enrichment
//!
//! Every listing with a usable detail link becomes one task. A semaphore
//! bounds how many tasks fetch at once, and a cancellation token stops the
//! remaining tasks once the product cap is reached. Results are collected in
//! completion order by the single loop that owns the output vector.

use crate::fetch::FetchClient;
use crate::parser::PageParser;
use crate::price::PriceNormalizer;
use crate::records::{merge, ListingRecord, ProductRecord};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Everything a detail task needs, cheap to clone into each task
#[derive(Clone)]
pub(crate) struct EnrichContext {
    pub client: FetchClient,
    pub parser: Arc<dyn PageParser>,
    pub normalizer: PriceNormalizer,
    pub query: Arc<str>,
}

/// Fetches and merges detail pages for one results page
///
/// Listings without a detail link are merged straight away. Failed fetches
/// keep the listing fields. At most `limit` records are returned.
///
/// # Arguments
///
/// * `ctx` - Shared client, parser and normalizer
/// * `listings` - Listings of one results page, in page order
/// * `concurrency` - Maximum parallel detail fetches
/// * `limit` - Maximum records to return
pub(crate) async fn enrich_page(
    ctx: &EnrichContext,
    listings: Vec<ListingRecord>,
    concurrency: usize,
    limit: usize,
) -> Vec<ProductRecord> {
    let mut products = Vec::new();
    if limit == 0 {
        return products;
    }

    let (linked, unlinked): (Vec<_>, Vec<_>) = listings
        .into_iter()
        .partition(|listing| listing.usable_detail_link().is_some());

    for listing in unlinked {
        if products.len() >= limit {
            return products;
        }
        products.push(merge(listing, None, &ctx.normalizer, &ctx.query));
    }
    if products.len() >= limit || linked.is_empty() {
        return products;
    }

    tracing::info!(
        "Fetching details for {} items (concurrency={})",
        linked.len(),
        concurrency
    );

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let token = CancellationToken::new();
    let mut tasks = JoinSet::new();

    for listing in linked {
        let ctx = ctx.clone();
        let semaphore = Arc::clone(&semaphore);
        let token = token.clone();

        tasks.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => None,
                record = async {
                    let _permit = semaphore.acquire_owned().await.ok()?;
                    Some(fetch_and_merge(&ctx, listing).await)
                } => record,
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some(record)) => {
                products.push(record);
                if products.len() >= limit {
                    tracing::debug!("Product limit reached, cancelling remaining detail fetches");
                    token.cancel();
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Detail task failed: {}", e),
        }
    }

    tasks.shutdown().await;
    products
}

/// Fetches one product page and merges it into the listing
async fn fetch_and_merge(ctx: &EnrichContext, listing: ListingRecord) -> ProductRecord {
    let detail = match listing.usable_detail_link() {
        Some(link) => {
            tracing::debug!(url = %link, "Fetching product page");
            match ctx.client.fetch_page(link).await {
                Ok(body) => Some(ctx.parser.parse_detail(&body)),
                Err(e) => {
                    tracing::warn!(url = %link, error = %e, "Product page unavailable, keeping listing fields");
                    None
                }
            }
        }
        None => None,
    };

    merge(listing, detail, &ctx.normalizer, &ctx.query)
}
