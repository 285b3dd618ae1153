//! CSV parser for exported study sheets.

use anyhow::Result;

/// A raw sheet: one header row plus body rows, all still strings.
///
/// Row 0 of `rows` is the goal baseline by contract; the rest are dated
/// observations. Interpretation happens in [`crate::ingest`].
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Decodes a CSV-exported sheet from raw bytes.
///
/// Rows of uneven width are tolerated: short rows read as blank (missing)
/// cells downstream. The first record is the header row.
///
/// # Errors
///
/// Returns an error if the bytes are not valid CSV or not valid UTF-8.
pub fn parse_table(bytes: &[u8]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();
    let headers = match records.next() {
        Some(first) => first?.iter().map(str::to_string).collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}
