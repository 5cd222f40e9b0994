//! File formats.

pub mod json;

pub use json::{parse_snapshot_content, write_snapshot, write_snapshot_content};
