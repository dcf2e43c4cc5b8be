//! Output module for crawl result files
//!
//! This module handles:
//! - Writing products to CSV in append or overwrite mode
//! - Reading a saved result file back for offline ranking

mod csv_sink;

pub use csv_sink::{read_products, write_products, CsvSink, WriteMode, COLUMNS};
