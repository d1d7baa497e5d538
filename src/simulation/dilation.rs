//! Energy decay and local time dilation
//!
//! Each unit's clock runs at `1 / (1 + k * energy)` of universe time: the
//! more energy a unit holds, the slower it experiences time and the slower it
//! burns its own energy.

use crate::core::config::PhysicsConfig;
use crate::entity::store::EntityStore;

/// Local rate of subjective time for a unit holding `energy`
///
/// Always in (0, 1] for non-negative energy and coefficient.
pub fn time_factor(energy: f32, coefficient: f32) -> f32 {
    1.0 / (1.0 + coefficient * energy.max(0.0))
}

/// Decay every live unit and advance its proper time
///
/// The time factor is taken from the energy before this tick's decay.
pub fn apply_decay_and_dilation(entities: &mut EntityStore, physics: &PhysicsConfig, scale: f32) {
    for unit in entities.live_mut() {
        let factor = time_factor(unit.energy, physics.dilation_coefficient);
        let base_rate = physics.consumption.for_kind(unit.kind);

        unit.time_factor = factor;
        unit.energy = (unit.energy - base_rate * factor * scale).clamp(0.0, physics.max_energy);
        unit.proper_time += f64::from(scale) * f64::from(factor);
    }
}
