//! CSV input loading, row merging and output table
//!
//! The input export opens with a banner line that is not the real header; it
//! is discarded before parsing. Output rows carry the union of input columns
//! and scrape-result fields. Because rows take different code paths they
//! populate different field sets, so the output header is computed at write
//! time as the first-seen-ordered union of every key across all rows.

use anyhow::{Context, Result};
use csv::Writer;
use serde_json::Value;
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info};

/// Column holding the URL to audit
pub const SERVICE_URL_COLUMN: &str = "Service URL";

/// One input record, columns in file order
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    columns: Vec<(String, String)>,
}

impl InputRow {
    pub fn new(columns: Vec<(String, String)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value.as_str())
    }

    /// The row's Service URL, when present and non-blank
    pub fn service_url(&self) -> Option<&str> {
        self.get(SERVICE_URL_COLUMN)
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn columns(&self) -> &[(String, String)] {
        &self.columns
    }
}

/// Load the input export: drop the banner line, parse the remainder as
/// headed CSV. A missing or unreadable file is fatal to the run.
pub fn load_input(path: &Path) -> Result<Vec<InputRow>> {
    let raw = fs::read_to_string(path)
        .context(format!("Failed to read input file: {}", path.display()))?;

    let body = strip_banner_line(&raw);
    let rows = parse_rows(body)?;
    debug!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// The export's literal first line is a banner, not a header; everything
/// after the first newline is the real CSV.
fn strip_banner_line(raw: &str) -> &str {
    match raw.find('\n') {
        Some(index) => &raw[index + 1..],
        None => "",
    }
}

fn parse_rows(content: &str) -> Result<Vec<InputRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to parse CSV record")?;
        let columns = headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                (header.clone(), record.get(index).unwrap_or("").to_string())
            })
            .collect();
        rows.push(InputRow::new(columns));
    }

    Ok(rows)
}

/// One output record: input columns plus scrape fields, order preserved
#[derive(Debug, Clone)]
pub struct OutputRow {
    cells: Vec<(String, Value)>,
}

impl OutputRow {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(cell, _)| cell == name)
            .map(|(_, value)| value)
    }

    pub fn cells(&self) -> &[(String, Value)] {
        &self.cells
    }
}

/// Merge scrape-result fields over an input row. The scrape result wins on
/// key collision, keeping the column's original position; new fields append
/// in the order the scrape produced them.
pub fn merge_row(input: &InputRow, fields: Vec<(String, Value)>) -> OutputRow {
    let mut cells: Vec<(String, Value)> = input
        .columns()
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect();

    for (name, value) in fields {
        match cells.iter_mut().find(|(cell, _)| *cell == name) {
            Some((_, existing)) => *existing = value,
            None => cells.push((name, value)),
        }
    }

    OutputRow { cells }
}

/// Ordered collection of output rows with a lazily computed union header
#[derive(Debug, Default)]
pub struct OutputTable {
    rows: Vec<OutputRow>,
}

impl OutputTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: OutputRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    /// Union of every key across all rows, in first-seen order
    pub fn header(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut header = Vec::new();
        for row in &self.rows {
            for (name, _) in row.cells() {
                if seen.insert(name.clone()) {
                    header.push(name.clone());
                }
            }
        }
        header
    }

    /// Write the table as CSV, overwriting any previous output. Cells a row
    /// never populated render empty; booleans render as `true`/`false`.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        debug!("Exporting {} rows to CSV: {}", self.rows.len(), path.display());

        let file = File::create(path)
            .context(format!("Failed to create output file: {}", path.display()))?;
        let mut wtr = Writer::from_writer(file);

        let header = self.header();
        wtr.write_record(&header)?;

        for row in &self.rows {
            let record: Vec<String> = header
                .iter()
                .map(|name| row.get(name).map(render_cell).unwrap_or_default())
                .collect();
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        info!("Successfully exported {} rows to CSV: {}", self.rows.len(), path.display());
        Ok(())
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ============ Input Parsing Tests ============

    #[test]
    fn test_banner_line_is_discarded() {
        let raw = "Some export banner,,,\nService Name,Service URL\nPassports,https://svc.example\n";
        let rows = parse_rows(strip_banner_line(raw)).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Service Name"), Some("Passports"));
        assert_eq!(rows[0].service_url(), Some("https://svc.example"));
    }

    #[test]
    fn test_banner_only_file_parses_to_no_rows() {
        let rows = parse_rows(strip_banner_line("just a banner")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_short_records_pad_with_empty() {
        let content = "Service Name,Service URL\nIncomplete\n";
        let rows = parse_rows(content).unwrap();

        assert_eq!(rows[0].get("Service URL"), Some(""));
        assert_eq!(rows[0].service_url(), None);
    }

    #[test]
    fn test_blank_service_url_is_none() {
        let content = "Service URL\n   \n";
        let rows = parse_rows(content).unwrap();
        assert_eq!(rows[0].service_url(), None);
    }

    #[test]
    fn test_column_order_is_preserved() {
        let content = "B,A,Service URL\n2,1,https://svc.example\n";
        let rows = parse_rows(content).unwrap();
        let names: Vec<&str> = rows[0].columns().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "Service URL"]);
    }

    // ============ Merge Tests ============

    #[test]
    fn test_merge_appends_new_fields_in_order() {
        let input = InputRow::new(vec![
            ("Service Name".to_string(), "Passports".to_string()),
            ("Service URL".to_string(), "https://svc.example".to_string()),
        ]);
        let merged = merge_row(
            &input,
            vec![
                ("Service Scraped".to_string(), json!(true)),
                ("Accessibility Statement Scraped".to_string(), json!(false)),
            ],
        );

        let names: Vec<&str> = merged.cells().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Service Name",
                "Service URL",
                "Service Scraped",
                "Accessibility Statement Scraped",
            ]
        );
    }

    #[test]
    fn test_merge_scrape_result_wins_on_collision() {
        let input = InputRow::new(vec![(
            "Service Scraped".to_string(),
            "stale".to_string(),
        )]);
        let merged = merge_row(&input, vec![("Service Scraped".to_string(), json!(true))]);

        assert_eq!(merged.get("Service Scraped"), Some(&json!(true)));
        // Collision keeps the column's original position
        assert_eq!(merged.cells().len(), 1);
    }

    // ============ Header Union Tests ============

    #[test]
    fn test_header_is_first_seen_union() {
        let row_a = merge_row(
            &InputRow::new(vec![("Service URL".to_string(), "a".to_string())]),
            vec![("Service Scraped".to_string(), json!(false))],
        );
        let row_b = merge_row(
            &InputRow::new(vec![("Service URL".to_string(), "b".to_string())]),
            vec![
                ("Service Scraped".to_string(), json!(true)),
                ("Accessibility Statement Scraped".to_string(), json!(true)),
            ],
        );

        let mut table = OutputTable::new();
        table.push(row_a);
        table.push(row_b);

        assert_eq!(
            table.header(),
            vec![
                "Service URL",
                "Service Scraped",
                "Accessibility Statement Scraped",
            ]
        );
    }

    // ============ CSV Writing Tests ============

    #[test]
    fn test_write_csv_pads_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut table = OutputTable::new();
        table.push(merge_row(
            &InputRow::new(vec![("Service URL".to_string(), "a".to_string())]),
            vec![("Service Scraped".to_string(), json!(false))],
        ));
        table.push(merge_row(
            &InputRow::new(vec![("Service URL".to_string(), "b".to_string())]),
            vec![
                ("Service Scraped".to_string(), json!(true)),
                ("Accessibility Statement Compliance Status Found".to_string(), Value::Null),
                ("Accessibility Statement Compliance category".to_string(), json!("fully-compliant")),
            ],
        ));
        table.write_csv(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Service URL,Service Scraped,Accessibility Statement Compliance Status Found,Accessibility Statement Compliance category"
        );
        // Row a leaves the columns it never produced empty
        assert_eq!(lines.next().unwrap(), "a,false,,");
        // Null renders empty even when the column exists for the row
        assert_eq!(lines.next().unwrap(), "b,true,,fully-compliant");
    }
}
