//! Document state and persistence.

mod io;
mod state;

pub use io::MAX_SNAPSHOT_BYTES;
pub use state::Document;
