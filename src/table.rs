//! In-memory tabular data plus the file collaborators around it.
//!
//! Every transformation in this crate consumes and produces ordered sequences
//! of rows, where a row is an ordered mapping from column name to string
//! value. Reading preserves source row order and the header as it appeared;
//! writing takes an explicit ordered header so sparse rows serialize with a
//! stable column set.

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook, DataType, Reader, Xlsx};
use indexmap::IndexMap;
use std::path::Path;
use thiserror::Error;

/// Ordered column name -> value mapping. Values are always strings; numeric
/// cells from workbooks are rendered to their shortest decimal form.
pub type Row = IndexMap<String, String>;

/// An ordered sequence of rows plus the header captured at read time.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// Raised when a transformation needs a header but the input carries none.
#[derive(Debug, Error)]
#[error("input has no rows and no header to derive a column set from")]
pub struct EmptyInputError;

impl Table {
    /// Header for serialization, derived from the captured header or the
    /// first row's columns. Fails with [`EmptyInputError`] when neither
    /// source of column names exists.
    pub fn derived_headers(&self) -> Result<Vec<String>> {
        if !self.headers.is_empty() {
            return Ok(self.headers.clone());
        }
        match self.rows.first() {
            Some(row) => Ok(row.keys().cloned().collect()),
            None => Err(EmptyInputError.into()),
        }
    }
}

/// Read a table from a delimited-text file or a workbook's first sheet,
/// dispatching on the file extension.
pub fn read_table(path: &Path) -> Result<Table> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("xlsx") | Some("xlsm") | Some("xls") => read_workbook(path),
        _ => read_csv(path),
    }
}

/// Read a CSV file into rows keyed by the header row.
pub fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("read header of {}", path.display()))?
        .iter()
        .map(|column| column.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read row of {}", path.display()))?;
        let mut row = Row::new();
        for (column, value) in headers.iter().zip(record.iter()) {
            row.insert(column.clone(), value.to_string());
        }
        rows.push(row);
    }
    Ok(Table { headers, rows })
}

/// Read the first sheet of an XLSX workbook. The first sheet row is the
/// header; trailing cells beyond the header width are ignored.
pub fn read_workbook(path: &Path) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("open workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook {} has no sheets", path.display()))?
        .with_context(|| format!("read first sheet of {}", path.display()))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(cells) => cells.iter().map(cell_to_string).collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for cells in sheet_rows {
        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let mut row = Row::new();
        for (column, cell) in headers.iter().zip(cells.iter()) {
            row.insert(column.clone(), cell_to_string(cell));
        }
        rows.push(row);
    }
    Ok(Table { headers, rows })
}

fn cell_to_string(cell: &calamine::Data) -> String {
    if cell.is_empty() {
        return String::new();
    }
    cell.as_string().unwrap_or_else(|| cell.to_string())
}

/// Write rows under an explicit ordered header. `columns` pairs the row key
/// with the display title emitted in the header line; for tables read from
/// CSV the two are identical. Quoting and quote doubling follow the CSV
/// writer's RFC rules.
pub fn write_csv(path: &Path, columns: &[(String, String)], rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    writer
        .write_record(columns.iter().map(|(_, title)| title.as_str()))
        .context("write header")?;
    for row in rows {
        writer
            .write_record(
                columns
                    .iter()
                    .map(|(id, _)| row.get(id).map(String::as_str).unwrap_or("")),
            )
            .with_context(|| format!("write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// Column pairs for a header whose ids double as display titles.
pub fn plain_columns(headers: &[String]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|column| (column.clone(), column.clone()))
        .collect()
}
