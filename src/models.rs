use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One HTML table from the source page. `rows` map header text (or the
/// cell's 1-based position as a string, when the table has no header row)
/// to trimmed cell text.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub index: usize,
    pub headers: Vec<String>,
    pub rows: Vec<BTreeMap<String, String>>,
}

/// The complete output of one scrape run.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResult {
    pub source_url: String,
    pub timestamp: DateTime<Utc>,
    pub tables: Vec<Table>,
    pub valid_prices: Vec<f64>,
}

impl ScrapeResult {
    pub fn new(source_url: String, tables: Vec<Table>, valid_prices: Vec<f64>) -> Self {
        ScrapeResult {
            source_url,
            timestamp: Utc::now(),
            tables,
            valid_prices,
        }
    }
}
