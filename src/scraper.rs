use std::collections::BTreeMap;
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::ClientBuilder;
use reqwest::header::USER_AGENT;
use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::Table;

// Create static selectors to avoid recompiling them each time
static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table").expect("Failed to parse table selector")
});

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr").expect("Failed to parse row selector")
});

static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("td, th").expect("Failed to parse cell selector")
});

static HEADER_CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("th").expect("Failed to parse header cell selector")
});

/// Fetch the page body as text. Connection failures, timeouts and
/// non-success statuses all surface as a fetch error.
pub async fn fetch_html(url: &str, user_agent: &str, timeout: Duration) -> Result<String> {
    let client = ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(5))
        .build()?;

    let response = client
        .get(url)
        .header(USER_AGENT, user_agent)
        .send()
        .await?
        .error_for_status()?;

    let html = response.text().await?;
    Ok(html)
}

/// Extract every `<table>` element in document order.
///
/// If a table's first row carries `<th>` cells it is taken as the header
/// row; otherwise headers stay empty and rows are keyed by 1-based cell
/// position. Extra cells beyond the headers are ignored and missing cells
/// are omitted from the row map. Rows whose cells are all blank are
/// skipped. Zero tables is a valid, empty result.
pub fn extract_tables(html: &str) -> Vec<Table> {
    let document = Html::parse_document(html);
    let mut tables = Vec::new();

    for (idx, table_element) in document.select(&TABLE_SELECTOR).enumerate() {
        let mut row_elements = table_element.select(&ROW_SELECTOR).peekable();

        let mut headers: Vec<String> = Vec::new();
        if let Some(first_row) = row_elements.peek() {
            let header_cells: Vec<String> = first_row
                .select(&HEADER_CELL_SELECTOR)
                .map(element_text)
                .collect();
            if !header_cells.is_empty() {
                headers = header_cells;
                row_elements.next();
            }
        }

        let mut rows = Vec::new();
        for row_element in row_elements {
            let cells: Vec<String> = row_element.select(&CELL_SELECTOR).map(element_text).collect();
            if cells.iter().all(|cell| cell.is_empty()) {
                continue;
            }

            let mut row = BTreeMap::new();
            if headers.is_empty() {
                for (position, cell) in cells.into_iter().enumerate() {
                    row.insert((position + 1).to_string(), cell);
                }
            } else {
                for (header, cell) in headers.iter().zip(cells.into_iter()) {
                    row.insert(header.clone(), cell);
                }
            }
            rows.push(row);
        }

        tables.push(Table {
            index: idx + 1,
            headers,
            rows,
        });
    }

    tables
}

/// The document's full text content, space-joined, for the price filter.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document.root_element().text().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef) -> String {
    let text: Vec<&str> = element.text().flat_map(str::split_whitespace).collect();
    text.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn no_tables_yields_empty_sequence() {
        let html = "<html><body><p>Gold: 65000.50</p></body></html>";
        assert!(extract_tables(html).is_empty());
    }

    #[test]
    fn header_row_maps_cells_by_header() {
        let html = "<table>\
            <tr><th>Metal</th><th>Carat</th><th>Price</th></tr>\
            <tr><td>Gold</td><td>22</td><td>65000.50</td></tr>\
        </table>";
        let tables = extract_tables(html);
        assert_eq!(tables.len(), 1);

        let table = &tables[0];
        assert_eq!(table.index, 1);
        assert_eq!(table.headers, vec!["Metal", "Carat", "Price"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0]["Metal"], "Gold");
        assert_eq!(table.rows[0]["Price"], "65000.50");
    }

    #[test]
    fn short_row_omits_missing_cells() {
        let html = "<table>\
            <tr><th>Metal</th><th>Carat</th><th>Price</th></tr>\
            <tr><td>Silver</td><td>21</td></tr>\
        </table>";
        let tables = extract_tables(html);
        let row = &tables[0].rows[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row["Metal"], "Silver");
        assert_eq!(row["Carat"], "21");
        assert!(!row.contains_key("Price"));
    }

    #[test]
    fn long_row_ignores_extra_cells() {
        let html = "<table>\
            <tr><th>Metal</th><th>Price</th></tr>\
            <tr><td>Gold</td><td>65000</td><td>extra</td></tr>\
        </table>";
        let tables = extract_tables(html);
        let row = &tables[0].rows[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row["Metal"], "Gold");
        assert_eq!(row["Price"], "65000");
    }

    #[test]
    fn headerless_table_uses_positional_keys() {
        let html = "<table>\
            <tr><td>Gold</td><td>65000</td></tr>\
            <tr><td>Silver</td><td>2100</td></tr>\
        </table>";
        let tables = extract_tables(html);
        let table = &tables[0];
        assert!(table.headers.is_empty());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["1"], "Gold");
        assert_eq!(table.rows[0]["2"], "65000");
        assert_eq!(table.rows[1]["1"], "Silver");
    }

    #[test]
    fn blank_rows_are_skipped() {
        let html = "<table>\
            <tr><td>Gold</td></tr>\
            <tr><td> </td><td></td></tr>\
        </table>";
        let tables = extract_tables(html);
        assert_eq!(tables[0].rows.len(), 1);
    }

    #[test]
    fn cell_text_is_whitespace_normalized() {
        let html = "<table><tr><td>  22\n  Carat </td></tr></table>";
        let tables = extract_tables(html);
        assert_eq!(tables[0].rows[0]["1"], "22 Carat");
    }

    #[test]
    fn tables_are_numbered_in_document_order() {
        let html = "<table><tr><td>a</td></tr></table>\
            <table><tr><td>b</td></tr></table>";
        let tables = extract_tables(html);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].index, 1);
        assert_eq!(tables[1].index, 2);
    }

    #[test]
    fn extract_text_joins_text_nodes() {
        let html = "<html><body><p>Gold:</p><p>65000.50</p></body></html>";
        let text = extract_text(html);
        assert!(text.contains("Gold:"));
        assert!(text.contains("65000.50"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_error() {
        let result = fetch_html(
            "http://127.0.0.1:1/prices",
            "test-agent",
            Duration::from_secs(2),
        )
        .await;
        assert!(matches!(result, Err(AppError::FetchError(_))));
    }
}
