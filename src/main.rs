use std::process;

use env_logger::Env;
use log::{error, info};

use price_scraper::{
    config::Config,
    error::Result,
    export,
    models::ScrapeResult,
    prices,
    scraper,
};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let result = match run(&config).await {
        Ok(result) => result,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    print_summary(&config, &result);

    // The two exports are independent; a failure of one does not block
    // the other, but any failure makes the run exit non-zero.
    let mut export_failed = false;
    if let Err(e) = export::write_json(&result, &config.json_path) {
        error!("{}", e);
        export_failed = true;
    } else {
        info!("Saved {}", config.json_path.display());
    }
    if let Err(e) = export::write_csv(&result, &config.csv_path) {
        error!("{}", e);
        export_failed = true;
    } else {
        info!("Saved {}", config.csv_path.display());
    }

    if export_failed {
        process::exit(1);
    }
}

async fn run(config: &Config) -> Result<ScrapeResult> {
    info!("Fetching {}", config.url);
    let html = scraper::fetch_html(&config.url, &config.user_agent, config.fetch_timeout).await?;

    let tables = scraper::extract_tables(&html);
    info!("Found {} tables", tables.len());

    let text = scraper::extract_text(&html);
    let valid_prices = prices::extract_prices(&text, config.price_threshold);
    info!("Found {} valid prices", valid_prices.len());

    Ok(ScrapeResult::new(config.url.clone(), tables, valid_prices))
}

fn print_summary(config: &Config, result: &ScrapeResult) {
    let line = "=".repeat(70);
    println!("{}", line);
    println!("GOLD AND SILVER PRICE SCRAPER - SUMMARY");
    println!("{}", line);
    println!("Timestamp: {}", result.timestamp.to_rfc3339());
    println!("URL: {}", result.source_url);
    println!("Tables found: {}", result.tables.len());
    println!(
        "Prices above {} found: {}",
        config.price_threshold,
        result.valid_prices.len()
    );
    for (i, price) in result.valid_prices.iter().take(10).enumerate() {
        println!("  {}. {}", i + 1, price);
    }
    println!("{}", line);
}
