//! cellgraph-engine - formulas, dependency tracking and incremental recomputation.

pub mod engine;
pub mod error;

pub use error::{Result, SheetError};
