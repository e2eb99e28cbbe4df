//! # Shipload - inbound shipment spreadsheet conversion
//!
//! Shipload converts a customer's inbound shipment export (one sheet of an
//! xlsx workbook) into the JSON payloads of a shipment-tracking API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Spreadsheet │────▶│   Parser    │────▶│  Transform  │────▶│  JSON file  │
//! │   (xlsx)    │     │ (calamine)  │     │ (row rules) │     │ (shipments) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼ (optional)
//!                                         ┌─────────────┐
//!                                         │  Submitter  │
//!                                         └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shipload::{convert, ConvertOptions};
//!
//! let outcome = convert(&ConvertOptions::default()).unwrap();
//! println!("{}", outcome.batch.summary());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error hierarchy
//! - [`logs`] - Console log broadcaster
//! - [`models`] - Shipment payload types
//! - [`parser`] - Spreadsheet loading
//! - [`transform`] - Lookup tables, row transformer and batch driver
//! - [`submit`] - Shipment API collaborator

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Loading
pub mod parser;

// Transformation
pub mod transform;

// Remote API
pub mod submit;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{LoadError, PersistError, PipelineError, RowError, SubmitError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    LegType, LineItem, Location, MassUnit, Measurement, Package, Shipment, ShipmentKind,
    TransportLeg, TransportationMode, VehicleType, VolumeUnit,
};

// =============================================================================
// Re-exports - Spreadsheet loading
// =============================================================================

pub use parser::{cell_to_value, load_sheet, rows_from_range, LoadedSheet, Row, SheetRow};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::lookup::{country_code, country_name, destination_city, resolve_vehicle};

pub use transform::{
    convert, normalize_row, normalize_rows, transform_row, transform_rows, write_shipments,
    BatchResult, ConvertOptions, ConvertOutcome, SheetInfo, SkippedRow,
};

// =============================================================================
// Re-exports - Submission
// =============================================================================

pub use submit::{
    submit_all, HttpSubmitter, ShipmentSubmitter, SubmissionOutcome, SubmissionReport,
};
