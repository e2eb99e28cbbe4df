//! Batch driver: spreadsheet in, shipment JSON out.
//!
//! Steps of [`convert`]:
//! 1. Load the inbound sheet
//! 2. Normalize cells (trim text, legacy `UK` destination code to `GB`)
//! 3. Transform every row, skipping the ones that fail
//! 4. Write the shipments as a pretty-printed JSON array
//!
//! # Example
//!
//! ```rust,ignore
//! use shipload::{convert, ConvertOptions};
//!
//! let outcome = convert(&ConvertOptions::default())?;
//! println!("{}", outcome.batch.summary());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::row::{raw_shipment_id, transform_row};
use crate::error::{PersistError, PersistResult, PipelineResult, RowError};
use crate::logs::{
    log_info, log_row_info, log_row_warning, log_success, log_warning, log_warning_indent,
};
use crate::models::Shipment;
use crate::parser::{columns, load_sheet, Row, SheetRow};

/// Spreadsheet delivered by the customer
pub const INPUT_PATH: &str = "Customer Export for Transformation.xlsx";

pub const SHEET_NAME: &str = "Inbound Shipments";

pub const OUTPUT_PATH: &str = "shipment_data.json";

/// Destination code used in the export for the United Kingdom
const LEGACY_UK_CODE: &str = "UK";

const UK_CODE: &str = "GB";

/// Where to read from and write to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOptions {
    pub input_path: PathBuf,
    pub sheet_name: String,
    pub output_path: PathBuf,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(INPUT_PATH),
            sheet_name: SHEET_NAME.to_string(),
            output_path: PathBuf::from(OUTPUT_PATH),
        }
    }
}

/// A row that did not produce a shipment
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// Physical spreadsheet row (1-based)
    pub row: usize,
    pub shipment_id: Option<String>,
    pub error: RowError,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shipment_id {
            Some(id) => write!(f, "row {} (ID {}): {}", self.row, id, self.error),
            None => write!(f, "row {}: {}", self.row, self.error),
        }
    }
}

/// Shipments in input order plus the rows that were skipped
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub shipments: Vec<Shipment>,
    pub skipped: Vec<SkippedRow>,
}

impl BatchResult {
    pub fn summary(&self) -> String {
        format!(
            "Prepared: {} shipments, {} rows skipped",
            self.shipments.len(),
            self.skipped.len()
        )
    }
}

/// Sheet information reported after a run
#[derive(Debug, Clone, Serialize)]
pub struct SheetInfo {
    pub sheet: String,
    pub header_row: usize,
    pub headers: Vec<String>,
    pub row_count: usize,
}

#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub sheet: SheetInfo,
    pub batch: BatchResult,
    pub output_path: PathBuf,
}

/// Run the whole conversion.
///
/// Load and write failures are returned; row failures only skip the row.
pub fn convert(options: &ConvertOptions) -> PipelineResult<ConvertOutcome> {
    log_info(format!(
        "📖 Reading {} (sheet '{}')...",
        options.input_path.display(),
        options.sheet_name
    ));
    let mut sheet = load_sheet(&options.input_path, &options.sheet_name)?;
    log_success(format!(
        "Header on row {}, {} data rows",
        sheet.header_row,
        sheet.rows.len()
    ));

    let missing: Vec<&str> = columns::ALL
        .iter()
        .copied()
        .filter(|c| !sheet.headers.iter().any(|h| h == c))
        .collect();
    if !missing.is_empty() {
        log_warning(format!(
            "Columns not found, affected rows will be skipped: {}",
            missing.join(", ")
        ));
    }

    normalize_rows(&mut sheet.rows);

    log_info("⚙️  Transforming rows...");
    let batch = transform_rows(&sheet.rows);
    print_batch_result(&batch);

    write_shipments(&batch.shipments, &options.output_path)?;
    log_success(format!(
        "💾 Wrote {} shipments to {}",
        batch.shipments.len(),
        options.output_path.display()
    ));

    Ok(ConvertOutcome {
        sheet: SheetInfo {
            sheet: sheet.sheet,
            header_row: sheet.header_row,
            headers: sheet.headers,
            row_count: sheet.rows.len(),
        },
        batch,
        output_path: options.output_path.clone(),
    })
}

/// Trim every text cell and replace the legacy `UK` destination code.
///
/// Cells holding only whitespace become empty.
pub fn normalize_row(row: &mut Row) {
    for value in row.values_mut() {
        let trimmed = match value {
            Value::String(s) => s.trim().to_string(),
            _ => continue,
        };
        *value = if trimmed.is_empty() {
            Value::Null
        } else {
            Value::String(trimmed)
        };
    }

    if let Some(destination) = row.get_mut(columns::DESTINATION) {
        if destination.as_str() == Some(LEGACY_UK_CODE) {
            *destination = Value::String(UK_CODE.to_string());
        }
    }
}

pub fn normalize_rows(rows: &mut [SheetRow]) {
    for sheet_row in rows.iter_mut() {
        normalize_row(&mut sheet_row.cells);
    }
}

/// Transform rows in order, collecting failures instead of stopping.
pub fn transform_rows(rows: &[SheetRow]) -> BatchResult {
    let mut result = BatchResult::default();

    for sheet_row in rows {
        let shipment_id = raw_shipment_id(&sheet_row.cells);
        if let Some(ref id) = shipment_id {
            log_row_info(sheet_row.row, format!("Transforming shipment {}", id));
        }

        match transform_row(&sheet_row.cells) {
            Ok(shipment) => {
                log_row_info(
                    sheet_row.row,
                    format!(
                        "Shipment {} prepared. Filed date: {}",
                        shipment.shipment_id, shipment.filed
                    ),
                );
                result.shipments.push(shipment);
            }
            Err(error) => {
                log_row_warning(
                    sheet_row.row,
                    format!("Skipping row ({}): {}", error.kind(), error),
                );
                result.skipped.push(SkippedRow {
                    row: sheet_row.row,
                    shipment_id,
                    error,
                });
            }
        }
    }

    result
}

/// Write shipments as a pretty-printed JSON array.
pub fn write_shipments(shipments: &[Shipment], path: &Path) -> PersistResult<()> {
    let json = serde_json::to_string_pretty(shipments)?;
    fs::write(path, json).map_err(|source| PersistError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn print_batch_result(result: &BatchResult) {
    log_success(result.summary());

    if result.skipped.is_empty() {
        return;
    }

    // Group by reason
    let mut reasons: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for skip in &result.skipped {
        reasons
            .entry(skip.error.to_string())
            .or_default()
            .push(skip.row);
    }

    log_warning(format!("{} rows skipped:", result.skipped.len()));
    for (reason, rows) in &reasons {
        let sample: Vec<String> = rows.iter().take(5).map(|r| r.to_string()).collect();
        let more = if rows.len() > 5 {
            format!("... +{}", rows.len() - 5)
        } else {
            String::new()
        };
        log_warning_indent(
            format!("• {} (rows: {}{})", reason, sample.join(", "), more),
            1,
        );
    }
}
