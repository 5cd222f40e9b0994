//! The spreadsheet: a cell store kept consistent with a dependency graph.
//!
//! Every successful update recomputes the changed cell and everything
//! downstream of it, in dependency order. Updates that would introduce a
//! circular dependency are rejected before anything is committed.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::cell::{Cell, CellContents, CellValue};
use super::cell_name::canonical_name;
use super::cycle::recalculation_order;
use super::deps::DependencyGraph;
use super::formula::LookupError;
use crate::error::{Result, SheetError};

#[derive(Default, Debug, Clone)]
pub struct Spreadsheet {
    /// Canonical name -> cell. Empty cells are never stored.
    cells: HashMap<String, Cell>,
    /// Edges run from a referenced cell to the formula cell that reads it.
    graph: DependencyGraph,
    changed: bool,
}

impl Spreadsheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the sheet was modified since creation or the last save.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Record that the current state has been persisted.
    pub fn mark_saved(&mut self) {
        self.changed = false;
    }

    /// Contents of a cell; `Text("")` for an empty cell.
    pub fn get_cell_contents(&self, name: &str) -> Result<CellContents> {
        let name = validate_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map(|cell| cell.contents.clone())
            .unwrap_or_default())
    }

    /// Value of a cell; `Text("")` for an empty cell.
    pub fn get_cell_value(&self, name: &str) -> Result<CellValue> {
        let name = validate_name(name)?;
        Ok(self
            .cells
            .get(&name)
            .map(|cell| cell.value.clone())
            .unwrap_or_default())
    }

    /// Shorthand for [`Spreadsheet::get_cell_value`].
    pub fn value(&self, name: &str) -> Result<CellValue> {
        self.get_cell_value(name)
    }

    /// Canonical names of every non-empty cell, sorted.
    pub fn names_of_all_nonempty_cells(&self) -> BTreeSet<String> {
        self.cells.keys().cloned().collect()
    }

    /// Cells whose formulas reference `name` directly.
    pub fn direct_dependents(&self, name: &str) -> Result<BTreeSet<String>> {
        let name = validate_name(name)?;
        Ok(self.graph.dependents(&name).map(str::to_string).collect())
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = (&String, &Cell)> {
        self.cells.iter()
    }

    /// Set a cell's contents from raw input and recompute what it affects.
    ///
    /// Input that parses as a number becomes a number, input starting with `=`
    /// becomes a formula, anything else is text; `""` clears the cell.
    ///
    /// Returns the changed cell followed by every cell that (transitively)
    /// depends on it, in the order they were recomputed. On error the sheet is
    /// left exactly as it was.
    pub fn set_contents_of_cell(&mut self, name: &str, content: &str) -> Result<Vec<String>> {
        let name = validate_name(name)?;
        let contents = CellContents::parse(content).map_err(|err| {
            log::debug!("rejected {name}: {err}");
            SheetError::from(err)
        })?;

        let new_dependees = match &contents {
            CellContents::Formula(formula) => formula.variables(),
            CellContents::Number(_) | CellContents::Text(_) => HashSet::new(),
        };
        let old_dependees = self.graph.get_dependees(&name);
        self.graph.replace_dependees(&name, new_dependees);

        let order = match recalculation_order(&self.graph, &name) {
            Ok(order) => order,
            Err(cycle) => {
                self.graph.replace_dependees(&name, old_dependees);
                log::debug!("rejected {name}: circular dependency");
                return Err(SheetError::CircularDependency { cell: cycle.cell });
            }
        };

        if contents.is_empty() {
            self.cells.remove(&name);
        } else {
            self.cells.insert(name, Cell::new(contents));
        }

        log::trace!("recomputing {} cell(s)", order.len());
        for cell in &order {
            self.recompute(cell);
        }

        self.changed = true;
        Ok(order)
    }

    /// Re-evaluate a formula cell against the current store.
    /// Non-formula cells already hold their value; absent cells are skipped.
    fn recompute(&mut self, name: &str) {
        let value = match self.cells.get(name) {
            Some(Cell {
                contents: CellContents::Formula(formula),
                ..
            }) => match formula.evaluate(|var| self.lookup(var)) {
                Ok(n) => CellValue::Number(n),
                Err(err) => {
                    log::trace!("{name} = {formula}: {err}");
                    CellValue::Error(err)
                }
            },
            Some(_) | None => return,
        };
        if let Some(cell) = self.cells.get_mut(name) {
            cell.value = value;
        }
    }

    /// Numeric value of a referenced cell.
    fn lookup(&self, name: &str) -> std::result::Result<f64, LookupError> {
        match self.cells.get(name).map(|cell| &cell.value) {
            Some(CellValue::Number(n)) => Ok(*n),
            Some(CellValue::Text(_)) => Err(LookupError::new(name, "cell contains text")),
            Some(CellValue::Error(err)) => Err(LookupError::new(name, err.reason.clone())),
            None => Err(LookupError::new(name, "cell is empty")),
        }
    }
}

fn validate_name(name: &str) -> Result<String> {
    canonical_name(name).ok_or_else(|| {
        log::debug!("rejected invalid cell name {name:?}");
        SheetError::InvalidName(name.to_string())
    })
}
