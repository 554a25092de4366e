pub mod snapshot;

pub use snapshot::{file_name_of, format_timestamp, SnapshotStore};
