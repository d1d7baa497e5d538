//! Units and the store that owns them

pub mod memory;
pub mod store;
pub mod unit;

pub use memory::{MemoryEntry, MemoryEvent, UnitMemory};
pub use store::{Consumption, EntityStore};
pub use unit::{Unit, UnitKind};
