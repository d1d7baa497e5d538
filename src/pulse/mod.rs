//! Pulses - directed energy transfers in flight between two units
//!
//! A pulse captures both endpoint positions when it is sent and interpolates
//! between them; it never re-reads the live units, so a destination that
//! moves afterwards does not retarget it.

pub mod store;

use serde::{Deserialize, Serialize};

use crate::core::types::{PulseId, UnitId, Vec2};

pub use store::{PulseOutcome, PulseStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pulse {
    pub id: PulseId,
    pub origin: UnitId,
    pub destination: UnitId,
    /// Energy carried; shrinks a little every advancing tick
    pub energy_payload: f32,
    /// 0.0 = just sent, 1.0 = arrived
    pub progress: f32,
    pub origin_pos: Vec2,
    pub destination_pos: Vec2,
    /// Interpolated position for rendering
    pub current_pos: Vec2,
    pub distance: f32,
    pub speed: f32,
}

impl Pulse {
    /// Whether this pulse links `a` and `b`, in either direction
    pub fn connects(&self, a: UnitId, b: UnitId) -> bool {
        (self.origin == a && self.destination == b) || (self.origin == b && self.destination == a)
    }

    /// Progress as a whole percentage, rounded down
    pub fn percent(&self) -> u32 {
        (self.progress.clamp(0.0, 1.0) * 100.0) as u32
    }
}
