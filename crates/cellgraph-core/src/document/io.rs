use super::Document;
use crate::error::{CellgraphError, Result};
use crate::storage::{parse_snapshot_content, write_snapshot};
use cellgraph_engine::engine::{Snapshot, Spreadsheet};
use std::path::{Path, PathBuf};

/// Snapshot files larger than this are refused.
pub const MAX_SNAPSHOT_BYTES: u64 = 64 * 1024 * 1024; // 64 MiB

fn read_snapshot_file(path: &Path) -> Result<Snapshot> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_SNAPSHOT_BYTES {
        return Err(CellgraphError::ReadWrite(format!(
            "Refusing to read {}: snapshot too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_SNAPSHOT_BYTES
        )));
    }
    let content = std::fs::read_to_string(path)?;
    parse_snapshot_content(&content)
}

impl Document {
    /// Load a document from a JSON snapshot file.
    ///
    /// Every failure, including a cell that cannot be replayed (invalid name,
    /// bad formula, circular dependency), is reported as `ReadWrite`.
    pub fn open(path: &Path) -> Result<Self> {
        let snapshot = read_snapshot_file(path)?;
        let cells = snapshot.len();
        let sheet = Spreadsheet::from_snapshot(snapshot).map_err(|err| {
            CellgraphError::ReadWrite(format!("{}: {}", path.display(), err))
        })?;
        log::debug!("opened {} ({} cells)", path.display(), cells);

        Ok(Document {
            sheet,
            file_path: Some(path.to_path_buf()),
        })
    }

    /// Save to `path` and remember it as the current file path.
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        write_snapshot(path, &self.sheet.snapshot())?;
        log::debug!("saved {}", path.display());
        self.sheet.mark_saved();
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Save to current file path.
    /// Returns the path saved to.
    pub fn save(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(CellgraphError::NoFilePath);
        };
        self.save_as(&path)?;
        Ok(path)
    }
}
