//! Visual projection of universe state
//!
//! This module is READ-ONLY - it never modifies simulation state.

pub mod colors;

use crate::core::types::{UnitId, Vec2};
use crate::entity::unit::UnitKind;
use crate::universe::Universe;
use colors::{energy_shade, kind_color, pulse_color, unit_radius, Color};

/// Lightweight snapshot of a unit for drawing
#[derive(Debug, Clone)]
pub struct RenderUnit {
    pub id: UnitId,
    pub position: Vec2,
    pub kind: UnitKind,
    pub energy: f32,
    pub radius: f32,
    pub color: Color,
}

/// Lightweight snapshot of a pulse for drawing
#[derive(Debug, Clone)]
pub struct RenderPulse {
    pub position: Vec2,
    pub origin: Vec2,
    pub destination: Vec2,
    pub progress: f32,
    pub color: Color,
}

/// Collects every live unit into a reusable buffer.
/// Call this once per frame, passing the same buffer to avoid allocations.
pub fn collect_render_units(universe: &Universe, buffer: &mut Vec<RenderUnit>) {
    buffer.clear();
    let max_energy = universe.config().physics.max_energy;

    buffer.extend(universe.entities.live().iter().map(|unit| RenderUnit {
        id: unit.id,
        position: unit.position,
        kind: unit.kind,
        energy: unit.energy,
        radius: unit_radius(unit.energy),
        color: energy_shade(kind_color(unit.kind), unit.energy, max_energy),
    }));
}

pub fn collect_render_pulses(universe: &Universe, buffer: &mut Vec<RenderPulse>) {
    buffer.clear();
    buffer.extend(universe.pulses.pulses().iter().map(|pulse| RenderPulse {
        position: pulse.current_pos,
        origin: pulse.origin_pos,
        destination: pulse.destination_pos,
        progress: pulse.progress,
        color: pulse_color(pulse.energy_payload),
    }));
}
