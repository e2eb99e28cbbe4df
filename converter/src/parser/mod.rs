//! Spreadsheet loading.
//!
//! Reads one sheet of a workbook into [`Row`]s: JSON objects keyed by header
//! text. Shipment-specific rules live in [`crate::transform`]; the only
//! layout knowledge here is the set of column names used to find the header.

use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDateTime;
use serde_json::{json, Map, Value};
use std::path::Path;

use crate::error::{LoadError, LoadResult};

/// One spreadsheet record, keyed by header text. Empty cells are `null`.
pub type Row = Map<String, Value>;

/// Column headers of the customer export.
pub mod columns {
    pub const WEEK_COM: &str = "WEEK COM";
    pub const ID: &str = "ID";
    pub const ORIGIN_CITY: &str = "ORIGIN CITY";
    pub const ORIGIN: &str = "ORIGIN";
    pub const DESTINATION: &str = "DESTINATION  (DROP LIST)";
    pub const TYPE: &str = "TYPE";
    pub const WEIGHT: &str = "WEIGHT";
    pub const CBM: &str = "CBM";
    pub const TOTAL_UNITS: &str = "TOTAL UNITS";
    pub const MODE: &str = "MODE";

    pub const ALL: [&str; 10] = [
        WEEK_COM,
        ID,
        ORIGIN_CITY,
        ORIGIN,
        DESTINATION,
        TYPE,
        WEIGHT,
        CBM,
        TOTAL_UNITS,
        MODE,
    ];
}

/// How many leading rows may hold titles before the header.
const HEADER_SCAN_ROWS: usize = 10;

/// Format used for date cells; the fraction is omitted when zero.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A data row together with its 1-based physical row number.
#[derive(Debug, Clone)]
pub struct SheetRow {
    pub row: usize,
    pub cells: Row,
}

/// Result of loading a sheet
#[derive(Debug, Clone)]
pub struct LoadedSheet {
    pub sheet: String,
    /// Physical row number of the header (1-based)
    pub header_row: usize,
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

/// Open a workbook (xlsx, xls, xlsb or ods) and read the named sheet.
pub fn load_sheet<P: AsRef<Path>>(path: P, sheet: &str) -> LoadResult<LoadedSheet> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|source| LoadError::Workbook {
        path: path.display().to_string(),
        source,
    })?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(LoadError::SheetNotFound(sheet.to_string()));
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| LoadError::Sheet {
            sheet: sheet.to_string(),
            source,
        })?;

    rows_from_range(&range, sheet)
}

/// Split a cell range into a header and data rows.
pub fn rows_from_range(range: &Range<Data>, sheet: &str) -> LoadResult<LoadedSheet> {
    if range.is_empty() {
        return Err(LoadError::EmptySheet(sheet.to_string()));
    }

    // Ranges start at the first used cell, not at A1
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let grid: Vec<&[Data]> = range.rows().collect();

    let header_idx = find_header_row(&grid);
    let headers: Vec<String> = grid[header_idx].iter().map(header_text).collect();

    let rows = grid
        .iter()
        .enumerate()
        .skip(header_idx + 1)
        .filter(|(_, cells)| !is_blank(cells))
        .map(|(idx, cells)| SheetRow {
            row: first_row + idx + 1,
            cells: build_row(&headers, cells),
        })
        .collect();

    Ok(LoadedSheet {
        sheet: sheet.to_string(),
        header_row: first_row + header_idx + 1,
        headers,
        rows,
    })
}

/// Index of the row with the most known column names, or 0 if none match.
fn find_header_row(grid: &[&[Data]]) -> usize {
    let mut best = (0, 0);

    for (idx, cells) in grid.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let hits = cells
            .iter()
            .map(header_text)
            .filter(|h| columns::ALL.contains(&h.as_str()))
            .count();
        if hits > best.1 {
            best = (idx, hits);
        }
    }

    best.0
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        _ => String::new(),
    }
}

fn is_blank(cells: &[Data]) -> bool {
    cells.iter().all(|c| match c {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

fn build_row(headers: &[String], cells: &[Data]) -> Row {
    let mut row = Map::new();
    for (header, cell) in headers.iter().zip(cells) {
        // Unnamed columns are ignored, the first of duplicate headers wins
        if header.is_empty() || row.contains_key(header) {
            continue;
        }
        row.insert(header.clone(), cell_to_value(cell));
    }
    row
}

/// Convert a spreadsheet cell to a JSON value.
///
/// Whole floats become integers (spreadsheets store every number as a
/// float) and date cells become ISO-8601 strings.
pub fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) if s.is_empty() => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => json!(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                json!(*f as i64)
            } else {
                json!(*f)
            }
        }
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => Value::String(format_datetime(&datetime)),
            None => json!(dt.as_f64()),
        },
        Data::DateTimeIso(s) => Value::String(s.clone()),
        Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) => Value::Null,
    }
}

pub fn format_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}
