//! Integration tests for the crawler
//!
//! These tests use wiremock to serve search-results and product pages and
//! drive full crawls, CSV output and the search pipeline end-to-end.

use rust_decimal::Decimal;
use souq_scout::config::Config;
use souq_scout::crawler::{crawl_to_csv, Coordinator, CrawlRequest};
use souq_scout::output::{read_products, WriteMode};
use souq_scout::parser::AmazonParser;
use souq_scout::pipeline::{SearchHistory, SearchPipeline};
use souq_scout::price::PriceNormalizer;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One search result card
struct Card<'a> {
    asin: &'a str,
    title: &'a str,
    price: &'a str,
}

/// Renders a search-results page holding the given cards
fn results_page(cards: &[Card<'_>]) -> String {
    let mut html = String::from("<html><body>");
    for card in cards {
        html.push_str(&format!(
            r#"<div data-component-type="s-search-result" data-asin="{asin}">
                <h2><a href="/dp/{asin}"><span>{title}</span></a></h2>
                <span class="a-price"><span class="a-price-whole">{price}<span class="a-price-decimal">.</span></span><span class="a-price-fraction">00</span></span>
                <span class="a-icon-alt">4.2 out of 5 stars</span>
                <img class="s-image" src="https://img.example/{asin}.jpg">
            </div>"#,
            asin = card.asin,
            title = card.title,
            price = card.price,
        ));
    }
    html.push_str("</body></html>");
    html
}

fn detail_page(title: &str, price: &str) -> String {
    format!(
        r#"<html><body>
        <span id="productTitle">{title}</span>
        <span class="a-price"><span class="a-offscreen">EGP {price}</span></span>
        <div id="feature-bullets"><ul>
            <li><span class="a-list-item">Breathable mesh upper</span></li>
        </ul></div>
        <div id="productDetails_techSpec_section_1"><table>
            <tr><th>Brand</th><td>Acme</td></tr>
        </table></div>
        </body></html>"#
    )
}

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.crawl.base_url = base_url.to_string();
    config.crawl.page_delay_ms = 0;
    config.crawl.pages = 0;
    config.fetch.backoff_base_ms = 1;
    config.fetch.timeout_secs = 5;
    config
}

fn coordinator(config: &Config) -> Coordinator {
    Coordinator::new(config, Arc::new(AmazonParser)).expect("coordinator")
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_stops_at_empty_page() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri());

    mount_page(
        &server,
        "1",
        results_page(&[
            Card { asin: "A1", title: "Running Shoes Black", price: "1,299" },
            Card { asin: "A2", title: "Trail Shoes Grey", price: "1,650" },
        ]),
    )
    .await;
    mount_page(
        &server,
        "2",
        results_page(&[Card { asin: "A3", title: "Court Shoes White", price: "899" }]),
    )
    .await;
    mount_page(&server, "3", results_page(&[])).await;

    let request = CrawlRequest::new("shoes", &config.crawl);
    let products = coordinator(&config).crawl(&request).await.unwrap();

    assert_eq!(products.len(), 3);
    assert_eq!(products[0].title, "Running Shoes Black");
    assert_eq!(products[0].price, Some(Decimal::from(1299)));
    assert_eq!(products[0].rating, Some(4.2));
    assert_eq!(
        products[0].link.as_deref(),
        Some(format!("{}/dp/A1", server.uri()).as_str())
    );
    assert_eq!(products[2].title, "Court Shoes White");
    assert!(products.iter().all(|p| p.source_query == "shoes"));

    // page 4 must never be requested
    let requests = server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r| !r.url.query().unwrap_or_default().contains("page=4")));
}

#[tokio::test]
async fn test_page_limit_respected() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri());

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&[Card {
            asin: "A1",
            title: "Shoe",
            price: "100",
        }])))
        .expect(2)
        .mount(&server)
        .await;

    let request = CrawlRequest::new("shoes", &config.crawl).pages(2);
    let products = coordinator(&config).crawl(&request).await.unwrap();

    // no de-duplication across pages
    assert_eq!(products.len(), 2);
}

#[tokio::test]
async fn test_failing_page_keeps_earlier_products() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri());

    mount_page(
        &server,
        "1",
        results_page(&[Card { asin: "A1", title: "Shoe one", price: "500" }]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let request = CrawlRequest::new("shoes", &config.crawl);
    let products = coordinator(&config).crawl(&request).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "Shoe one");
}

#[tokio::test]
async fn test_detailed_crawl_merges_product_pages() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri());

    mount_page(
        &server,
        "1",
        results_page(&[
            Card { asin: "A1", title: "Listing title", price: "1,299" },
            Card { asin: "A2", title: "Second listing", price: "700" },
        ]),
    )
    .await;
    mount_page(&server, "2", results_page(&[])).await;
    Mock::given(method("GET"))
        .and(path("/dp/A1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(detail_page("Detail title", "1,199.50")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dp/A2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let request = CrawlRequest::new("shoes", &config.crawl)
        .detailed(true)
        .concurrency(2);
    let products = coordinator(&config).crawl(&request).await.unwrap();

    assert_eq!(products.len(), 2);

    let enriched = products
        .iter()
        .find(|p| p.title == "Detail title")
        .expect("enriched product");
    assert_eq!(enriched.price, Some(Decimal::new(119950, 2)));
    assert_eq!(enriched.description, "Breathable mesh upper");
    assert_eq!(enriched.specs.get("Brand").map(String::as_str), Some("Acme"));

    // the failed product page leaves the listing fields in place
    let degraded = products
        .iter()
        .find(|p| p.title == "Second listing")
        .expect("listing fallback");
    assert_eq!(degraded.price, Some(Decimal::from(700)));
    assert!(degraded.description.is_empty());
}

#[tokio::test]
async fn test_max_products_cap() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri());

    let cards: Vec<Card<'_>> = ["A1", "A2", "A3", "A4", "A5"]
        .iter()
        .map(|&asin| Card { asin, title: "Shoe", price: "100" })
        .collect();
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&cards)))
        .mount(&server)
        .await;

    let request = CrawlRequest::new("shoes", &config.crawl).max_products(7);
    let products = coordinator(&config).crawl(&request).await.unwrap();
    assert_eq!(products.len(), 7);

    let detailed = CrawlRequest::new("shoes", &config.crawl)
        .max_products(3)
        .detailed(true);
    let products = coordinator(&config).crawl(&detailed).await.unwrap();
    assert_eq!(products.len(), 3);
}

#[tokio::test]
async fn test_crawl_to_csv_append_and_overwrite() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri());
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("products.csv");

    mount_page(
        &server,
        "1",
        results_page(&[
            Card { asin: "A1", title: "Shoe one", price: "1,299" },
            Card { asin: "A2", title: "Shoe two", price: "450" },
        ]),
    )
    .await;
    mount_page(&server, "2", results_page(&[])).await;

    let coordinator = coordinator(&config);
    let request = CrawlRequest::new("shoes", &config.crawl).page_delay(Duration::ZERO);

    let written = crawl_to_csv(&coordinator, &request, &output, WriteMode::Append)
        .await
        .unwrap();
    assert_eq!(written, 2);
    crawl_to_csv(&coordinator, &request, &output, WriteMode::Append)
        .await
        .unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content.matches("title,price,rating").count(), 1);

    let normalizer = PriceNormalizer::new(&config.price);
    let products = read_products(&output, &normalizer).unwrap();
    assert_eq!(products.len(), 4);
    assert_eq!(products[0].price, Some(Decimal::from(1299)));

    crawl_to_csv(&coordinator, &request, &output, WriteMode::Overwrite)
        .await
        .unwrap();
    assert_eq!(read_products(&output, &normalizer).unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_crawl_leaves_file_untouched() {
    let server = MockServer::start().await;
    let config = create_test_config(&server.uri());
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("products.csv");

    mount_page(&server, "1", results_page(&[])).await;

    let request = CrawlRequest::new("nothing", &config.crawl);
    let written = crawl_to_csv(&coordinator(&config), &request, &output, WriteMode::Append)
        .await
        .unwrap();

    assert_eq!(written, 0);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_search_pipeline_end_to_end() {
    let server = MockServer::start().await;
    let mut config = create_test_config(&server.uri());
    config.search.pages = 1;

    mount_page(
        &server,
        "1",
        results_page(&[
            Card { asin: "A1", title: "Black Running Shoes", price: "1,299" },
            Card { asin: "A2", title: "White Running Shoes", price: "1,800" },
            Card { asin: "A3", title: "Leather Wallet", price: "300" },
        ]),
    )
    .await;

    let pipeline = SearchPipeline::new(&config, coordinator(&config));
    let (outcome, history) = pipeline
        .run("عايز كوتش اسود تحت 1500", SearchHistory::new())
        .await
        .unwrap();

    assert_eq!(outcome.candidates.len(), 3);
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].product.title, "Black Running Shoes");
    assert!(outcome.results[0].score > 0.0);

    assert_eq!(history.len(), 1);
    let entry = history.latest().unwrap();
    assert_eq!(entry.query, "عايز كوتش اسود تحت 1500");
    assert_eq!(entry.result_count, 1);
}
