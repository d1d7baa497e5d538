//! Durable storage of universe state

pub mod snapshot;

pub use snapshot::{SnapshotStore, UniverseSnapshot};
