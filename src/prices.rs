use once_cell::sync::Lazy;
use regex::Regex;

// Digits with optional thousands separators and an optional decimal part.
static PRICE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\d,]+\.?\d*").expect("Failed to parse price token regex")
});

/// Attempt to read a numeric token as a price value. Thousands separators
/// are stripped; anything that still fails to parse is not a number.
pub fn parse_price_token(token: &str) -> Option<f64> {
    token.replace(',', "").parse::<f64>().ok()
}

/// Scan `text` for numeric tokens and keep the values strictly above
/// `threshold`, in order of first appearance. Duplicate values at
/// different text positions are retained.
pub fn extract_prices(text: &str, threshold: f64) -> Vec<f64> {
    PRICE_TOKEN
        .find_iter(text)
        .filter_map(|token| {
            let value = parse_price_token(token.as_str());
            if value.is_none() {
                log::debug!("Skipping non-numeric token: {}", token.as_str());
            }
            value
        })
        .filter(|value| *value > threshold)
        .collect()
}
