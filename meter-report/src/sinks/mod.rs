pub mod snapshot;

pub use snapshot::SnapshotSink;
