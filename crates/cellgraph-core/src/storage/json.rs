//! JSON snapshot format
//!
//! ```json
//! { "Cells": { "A1": { "StringForm": "5" }, "B3": { "StringForm": "=A1+2" } } }
//! ```

use crate::error::Result;
use cellgraph_engine::engine::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Default)]
struct SnapshotFile {
    #[serde(rename = "Cells", default)]
    cells: BTreeMap<String, Option<CellRecord>>,
}

#[derive(Serialize, Deserialize)]
struct CellRecord {
    #[serde(rename = "StringForm", default)]
    string_form: Option<String>,
}

/// Parse snapshot JSON. A `null` document is an empty snapshot; a `null`
/// record or string form is read as the empty string.
pub fn parse_snapshot_content(content: &str) -> Result<Snapshot> {
    let file: Option<SnapshotFile> = serde_json::from_str(content)?;
    let file = file.unwrap_or_default();

    let mut snapshot = Snapshot::new();
    for (name, record) in file.cells {
        let form = match record {
            Some(CellRecord {
                string_form: Some(form),
            }) => form,
            Some(CellRecord { string_form: None }) | None => {
                log::warn!("snapshot cell {name} has no string form, treating as empty");
                String::new()
            }
        };
        snapshot.cells.insert(name, form);
    }
    Ok(snapshot)
}

/// Write a snapshot to a pretty-printed JSON string, cells sorted by name
pub fn write_snapshot_content(snapshot: &Snapshot) -> Result<String> {
    let file = SnapshotFile {
        cells: snapshot
            .cells
            .iter()
            .map(|(name, form)| {
                let record = CellRecord {
                    string_form: Some(form.clone()),
                };
                (name.clone(), Some(record))
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Write a snapshot to a JSON file
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let content = write_snapshot_content(snapshot)?;
    fs::write(path, content)?;
    Ok(())
}
