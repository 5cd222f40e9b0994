//! Error types for cellgraph core.

use thiserror::Error;

use cellgraph_engine::SheetError;

/// Errors that can occur while editing or persisting a document
#[derive(Error, Debug)]
pub enum CellgraphError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// Any failure to read, decode, replay, encode or write a snapshot.
    #[error("Read/write error: {0}")]
    ReadWrite(String),

    #[error("No file path set")]
    NoFilePath,
}

impl From<std::io::Error> for CellgraphError {
    fn from(err: std::io::Error) -> Self {
        CellgraphError::ReadWrite(err.to_string())
    }
}

impl From<serde_json::Error> for CellgraphError {
    fn from(err: serde_json::Error) -> Self {
        CellgraphError::ReadWrite(format!("invalid snapshot JSON: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, CellgraphError>;
