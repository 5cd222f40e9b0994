//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`Formula`] - Validated infix formulas with a canonical form
//! - [`tokenize`] - Formula tokenizer
//! - [`canonical_name`], [`is_valid_name`] - Cell name validation
//! - [`DependencyGraph`] - Dependent/dependee edges between cells
//! - [`recalculation_order`] - Recompute ordering and cycle detection
//! - [`Cell`], [`CellContents`], [`CellValue`] - Cell data structures
//! - [`Spreadsheet`] - The cell store with incremental recomputation
//! - [`Snapshot`] - Persistence boundary

mod cell;
mod cell_name;
mod cycle;
mod deps;
mod formula;
mod sheet;
mod snapshot;
mod token;

pub use cell::{Cell, CellContents, CellValue};
pub use cell_name::{canonical_name, is_valid_name};
pub use cycle::{CycleDetected, recalculation_order};
pub use deps::DependencyGraph;
pub use formula::{Formula, FormulaError, FormulaFormatError, LookupError};
pub use sheet::Spreadsheet;
pub use snapshot::Snapshot;
pub use token::{Lexeme, Operator, Token, tokenize};
