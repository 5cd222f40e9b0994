use crate::error::Result;
use cellgraph_engine::engine::{CellContents, CellValue, Spreadsheet};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A spreadsheet plus the file it is persisted to.
#[derive(Default, Debug)]
pub struct Document {
    pub(crate) sheet: Spreadsheet,
    /// Current file path
    pub file_path: Option<PathBuf>,
}

impl Document {
    /// Create an empty document.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path` if it exists, otherwise start empty with `path` remembered
    /// so the first [`Document::save`] creates it.
    pub fn with_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            return Self::open(&path);
        }
        Ok(Document {
            sheet: Spreadsheet::new(),
            file_path: Some(path),
        })
    }

    /// The wrapped spreadsheet.
    pub fn sheet(&self) -> &Spreadsheet {
        &self.sheet
    }

    /// Whether the sheet has been modified since it was opened or saved
    pub fn changed(&self) -> bool {
        self.sheet.changed()
    }

    pub fn set_contents_of_cell(&mut self, name: &str, content: &str) -> Result<Vec<String>> {
        Ok(self.sheet.set_contents_of_cell(name, content)?)
    }

    pub fn get_cell_contents(&self, name: &str) -> Result<CellContents> {
        Ok(self.sheet.get_cell_contents(name)?)
    }

    pub fn get_cell_value(&self, name: &str) -> Result<CellValue> {
        Ok(self.sheet.get_cell_value(name)?)
    }

    pub fn names_of_all_nonempty_cells(&self) -> BTreeSet<String> {
        self.sheet.names_of_all_nonempty_cells()
    }
}
