//! Error types for the spreadsheet engine.

use thiserror::Error;

use crate::engine::FormulaFormatError;

/// Structural failures of a spreadsheet update. A failed update changes nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("Invalid cell name: {0:?}")]
    InvalidName(String),

    #[error(transparent)]
    FormulaFormat(#[from] FormulaFormatError),

    #[error("Circular dependency detected at {cell}")]
    CircularDependency { cell: String },
}

pub type Result<T> = std::result::Result<T, SheetError>;
