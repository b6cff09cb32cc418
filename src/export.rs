use std::fs;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::Result;
use crate::models::{ScrapeResult, Table};

/// Write the result as pretty-printed JSON with the stable top-level shape
/// `{source_url, timestamp, tables, valid_prices}`.
pub fn write_json(result: &ScrapeResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write the result as CSV: a timestamp/URL preamble, one labeled section
/// per table, then the valid prices one per row.
pub fn write_csv(result: &ScrapeResult, path: &Path) -> Result<()> {
    let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;

    let timestamp = result.timestamp.to_rfc3339();
    writer.write_record(["Timestamp", timestamp.as_str()])?;
    writer.write_record(["URL", result.source_url.as_str()])?;
    writer.write_record([""])?;

    for table in &result.tables {
        write_table_section(&mut writer, table)?;
    }

    writer.write_record(["Valid Prices"])?;
    for price in &result.valid_prices {
        writer.write_record([price.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_table_section<W: Write>(writer: &mut csv::Writer<W>, table: &Table) -> Result<()> {
    writer.write_record([format!("Table {}", table.index)])?;

    if table.headers.is_empty() {
        // Positional keys; order rows by cell position, not string order.
        for row in &table.rows {
            let mut cells: Vec<(usize, &str)> = row
                .iter()
                .filter_map(|(key, value)| {
                    key.parse::<usize>().ok().map(|position| (position, value.as_str()))
                })
                .collect();
            cells.sort_by_key(|(position, _)| *position);
            writer.write_record(cells.iter().map(|(_, value)| *value))?;
        }
    } else {
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            let record: Vec<&str> = table
                .headers
                .iter()
                .map(|header| row.get(header).map(String::as_str).unwrap_or(""))
                .collect();
            writer.write_record(record)?;
        }
    }

    writer.write_record([""])?;
    Ok(())
}
