pub mod config;
pub mod error;
pub mod types;

pub use config::{LoadMode, UniverseConfig};
pub use error::{Result, UniverseError};
pub use types::{PulseId, Tick, UnitId, Vec2};
