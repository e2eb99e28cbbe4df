//! Shipload CLI - convert the inbound shipment export to shipment JSON
//!
//! ```bash
//! shipload    # reads "Customer Export for Transformation.xlsx", writes shipment_data.json
//! ```
//!
//! Input and output names are fixed; run it from the directory holding the
//! export.

use shipload::logs::{log_error, log_info};
use shipload::{convert, ConvertOptions, PipelineError};

fn main() {
    let options = ConvertOptions::default();

    match convert(&options) {
        Ok(outcome) => {
            log_info(format!("✨ Done! {}", outcome.batch.summary()));
        }
        Err(PipelineError::Load(e)) => {
            log_error(format!("Could not load the export: {}", e));
            std::process::exit(1);
        }
        Err(PipelineError::Persist(e)) => {
            log_error(format!("Could not write the shipments: {}", e));
            std::process::exit(1);
        }
    }
}
