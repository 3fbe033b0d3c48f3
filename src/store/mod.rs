pub mod snapshots;

pub use snapshots::{SnapshotStore, load_raw_state, load_state, read_json, write_json};
