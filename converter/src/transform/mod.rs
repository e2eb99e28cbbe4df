//! Transformation module.
//!
//! - Lookup: static country/city tables and the vehicle rule
//! - Row: one spreadsheet row to one shipment record
//! - Pipeline: batch driver (load, normalize, transform, persist)

pub mod lookup;
pub mod pipeline;
pub mod row;

pub use pipeline::*;
pub use row::{parse_datetime, raw_shipment_id, transform_row};
