//! CSV result files
//!
//! One row per product with the columns `title, price, rating, image,
//! product_link, description, product_info_json, search_query`. Prices are
//! written in canonical form so that reading a file back yields the same
//! prices.

use crate::price::PriceNormalizer;
use crate::records::{parse_rating, ProductRecord, LINK_NOT_AVAILABLE};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Column names, in file order
pub const COLUMNS: [&str; 8] = [
    "title",
    "price",
    "rating",
    "image",
    "product_link",
    "description",
    "product_info_json",
    "search_query",
];

/// How an existing result file is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Add rows to the end; the header is written only into a new or empty file
    Append,
    /// Truncate and write a fresh header
    Overwrite,
}

impl WriteMode {
    pub fn from_append(append: bool) -> Self {
        if append {
            Self::Append
        } else {
            Self::Overwrite
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    price: String,
    rating: String,
    image: &'a str,
    product_link: &'a str,
    description: &'a str,
    product_info_json: String,
    search_query: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwnedRow {
    title: String,
    price: String,
    rating: String,
    image: String,
    product_link: String,
    description: String,
    product_info_json: String,
    search_query: String,
}

/// Writes products to a CSV file
pub struct CsvSink {
    path: PathBuf,
    mode: WriteMode,
    normalizer: PriceNormalizer,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>, mode: WriteMode, normalizer: PriceNormalizer) -> Self {
        Self {
            path: path.into(),
            mode,
            normalizer,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every product as one row
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of rows written
    /// * `Err(ScoutError)` - The file could not be opened or written
    pub fn write(&self, products: &[ProductRecord]) -> Result<usize> {
        let needs_header = match self.mode {
            WriteMode::Overwrite => true,
            WriteMode::Append => is_missing_or_empty(&self.path),
        };

        let file = match self.mode {
            WriteMode::Overwrite => File::create(&self.path)?,
            WriteMode::Append => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?,
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(COLUMNS)?;
        }

        for product in products {
            writer.serialize(self.row(product)?)?;
        }
        writer.flush()?;

        tracing::debug!(
            "Wrote {} rows to {} (header: {})",
            products.len(),
            self.path.display(),
            needs_header
        );
        Ok(products.len())
    }

    fn row<'a>(&self, product: &'a ProductRecord) -> Result<CsvRow<'a>> {
        Ok(CsvRow {
            title: &product.title,
            price: product
                .price
                .map(|p| self.normalizer.format(p))
                .unwrap_or_default(),
            rating: product.rating.map(|r| r.to_string()).unwrap_or_default(),
            image: &product.image_url,
            product_link: product.link_or_placeholder(),
            description: &product.description,
            product_info_json: serde_json::to_string(&product.specs)?,
            search_query: &product.source_query,
        })
    }
}

/// Writes products to `path` in the given mode
pub fn write_products(
    path: &Path,
    products: &[ProductRecord],
    mode: WriteMode,
    normalizer: &PriceNormalizer,
) -> Result<usize> {
    CsvSink::new(path, mode, normalizer.clone()).write(products)
}

/// Loads a result file back into product records
///
/// Prices are normalized again and ratings re-parsed, so files edited by
/// hand or written by other tools are accepted too. A malformed
/// `product_info_json` cell yields empty specs.
pub fn read_products(path: &Path, normalizer: &PriceNormalizer) -> Result<Vec<ProductRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut products = Vec::new();

    for (index, row) in reader.deserialize::<OwnedRow>().enumerate() {
        let row = row?;

        let specs = if row.product_info_json.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&row.product_info_json).unwrap_or_else(|e| {
                tracing::warn!("Row {}: ignoring malformed product info: {}", index + 1, e);
                BTreeMap::new()
            })
        };

        let link = row.product_link.trim();
        let link = (!link.is_empty() && link != LINK_NOT_AVAILABLE).then(|| link.to_string());

        products.push(ProductRecord {
            title: row.title,
            price: normalizer.normalize(&row.price),
            rating: parse_rating(&row.rating),
            image_url: row.image,
            link,
            description: row.description,
            specs,
            source_query: row.search_query,
        });
    }

    tracing::debug!("Read {} products from {}", products.len(), path.display());
    Ok(products)
}

fn is_missing_or_empty(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.len() == 0)
        .unwrap_or(true)
}
