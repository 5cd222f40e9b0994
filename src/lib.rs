//! cellgraph - incremental formula evaluation with dependency tracking.
//!
//! - [`engine`] - formulas, dependency graph and the [`Spreadsheet`] itself
//! - [`Document`] - a spreadsheet persisted as a JSON snapshot

pub use cellgraph_core::{CellgraphError, Document, Result, document, storage};
pub use cellgraph_engine::engine::{self, CellContents, CellValue, Formula, Spreadsheet};
pub use cellgraph_engine::SheetError;
