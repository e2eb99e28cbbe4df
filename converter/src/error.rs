//! Error types for the shipment conversion pipeline.
//!
//! The hierarchy mirrors the stages of a run:
//!
//! - [`LoadError`] - the spreadsheet cannot be opened or read (aborts the run)
//! - [`RowError`] - a single row cannot be transformed (the row is skipped)
//! - [`PersistError`] - the output file cannot be written
//! - [`SubmitError`] - the shipment API collaborator failed
//! - [`PipelineError`] - top-level orchestration errors
//!
//! `From` conversions let `?` cross stage boundaries.

use thiserror::Error;

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while loading the spreadsheet.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The workbook could not be opened or parsed.
    #[error("Failed to open workbook '{path}': {source}")]
    Workbook {
        path: String,
        #[source]
        source: calamine::Error,
    },

    /// The workbook has no sheet with the expected name.
    #[error("Sheet '{0}' not found in workbook")]
    SheetNotFound(String),

    /// The sheet exists but a range could not be read from it.
    #[error("Failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    /// The sheet holds no cells at all.
    #[error("Sheet '{0}' is empty")]
    EmptySheet(String),
}

// =============================================================================
// Row Errors
// =============================================================================

/// Why a single row could not become a shipment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    /// A referenced column is not present in the row.
    #[error("Missing column '{field}'")]
    MissingField { field: String },

    /// A value could not be coerced to the type its field needs.
    #[error("Column '{field}' (value {value}): expected {expected}")]
    TypeCoercion {
        field: String,
        value: String,
        expected: &'static str,
    },

    /// Anything else that went wrong while building the record.
    #[error("Transformation failed: {message}")]
    Transform { message: String },
}

impl RowError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn coercion(
        field: impl Into<String>,
        value: &serde_json::Value,
        expected: &'static str,
    ) -> Self {
        Self::TypeCoercion {
            field: field.into(),
            value: value.to_string(),
            expected,
        }
    }

    pub fn transform(message: impl Into<String>) -> Self {
        Self::Transform {
            message: message.into(),
        }
    }

    /// Short label used when grouping skipped rows in the run summary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing field",
            Self::TypeCoercion { .. } => "type coercion",
            Self::Transform { .. } => "transformation",
        }
    }
}

// =============================================================================
// Persistence Errors
// =============================================================================

/// Errors while writing the output document.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize shipments: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Submission Errors
// =============================================================================

/// Errors from the shipment API collaborator.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Required configuration is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// The account identifier is not a UUID.
    #[error("Invalid account id '{0}'")]
    InvalidAccount(String),

    /// The HTTP request could not be sent or its response read.
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::transform::pipeline::convert`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Persist error: {0}")]
    Persist(#[from] PersistError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

pub type LoadResult<T> = Result<T, LoadError>;

pub type RowResult<T> = Result<T, RowError>;

pub type PersistResult<T> = Result<T, PersistError>;

pub type SubmitResult<T> = Result<T, SubmitError>;

pub type PipelineResult<T> = Result<T, PipelineError>;
