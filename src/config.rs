use std::env;
use std::path::PathBuf;
use std::time::Duration;
use crate::error::{AppError, Result};

const DEFAULT_URL: &str = "https://www.bajus.org/gold-price";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Clone)]
pub struct Config {
    pub url: String,
    pub user_agent: String,
    pub price_threshold: f64,
    pub fetch_timeout: Duration,
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let url = env::var("SCRAPE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        let user_agent =
            env::var("USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        let price_threshold = env::var("PRICE_THRESHOLD").unwrap_or_else(|_| "50".to_string());
        let price_threshold = price_threshold
            .parse::<f64>()
            .map_err(|e| AppError::ConfigError(format!("Invalid price threshold: {}", e)))?;

        let timeout_secs = env::var("FETCH_TIMEOUT_SECS").unwrap_or_else(|_| "15".to_string());
        let timeout_secs = timeout_secs
            .parse::<u64>()
            .map_err(|e| AppError::ConfigError(format!("Invalid fetch timeout: {}", e)))?;

        let json_path = env::var("JSON_OUTPUT_PATH").unwrap_or_else(|_| "prices.json".to_string());
        let csv_path = env::var("CSV_OUTPUT_PATH").unwrap_or_else(|_| "prices.csv".to_string());

        Ok(Config {
            url,
            user_agent,
            price_threshold,
            fetch_timeout: Duration::from_secs(timeout_secs),
            json_path: PathBuf::from(json_path),
            csv_path: PathBuf::from(csv_path),
        })
    }
}
