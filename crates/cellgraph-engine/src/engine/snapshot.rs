//! Persistence boundary of the spreadsheet.
//!
//! A [`Snapshot`] is the minimal description of a sheet: each non-empty cell's
//! string form, keyed by canonical name. Values and graph edges are not stored;
//! they are rebuilt by replaying the string forms.

use std::collections::BTreeMap;

use super::sheet::Spreadsheet;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Canonical cell name -> string form, sorted by name.
    pub cells: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Snapshot {
            cells: iter
                .into_iter()
                .map(|(name, form)| (name.into(), form.into()))
                .collect(),
        }
    }
}

impl Spreadsheet {
    /// Encode the sheet as string forms.
    pub fn snapshot(&self) -> Snapshot {
        self.cells()
            .map(|(name, cell)| (name.clone(), cell.string_form()))
            .collect()
    }

    /// Rebuild a sheet by setting every cell from its string form.
    ///
    /// Cells may appear in any order; formulas referencing cells set later
    /// are recomputed when those cells arrive. Any rejected cell fails the
    /// whole decode. The result is unchanged since the snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Spreadsheet> {
        let mut sheet = Spreadsheet::new();
        for (name, form) in &snapshot.cells {
            sheet.set_contents_of_cell(name, form)?;
        }
        sheet.mark_saved();
        Ok(sheet)
    }
}
