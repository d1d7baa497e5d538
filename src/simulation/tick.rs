//! Tick system - one discrete evolution step of the whole universe
//!
//! Order of operations per tick:
//! pulse advance -> proximity pulses -> decay and dilation -> lifecycle
//!
//! Pulses advance before proximity spawning, so energy delivered this tick is
//! already visible when nearby units decide whether they can afford a pulse.

use crate::core::config::PhysicsConfig;
use crate::core::types::{PulseId, Tick, UnitId};
use crate::entity::store::EntityStore;
use crate::pulse::{PulseOutcome, PulseStore};
use crate::simulation::dilation::apply_decay_and_dilation;
use crate::simulation::proximity::spawn_proximity_pulses;
use crate::universe::{DirtyState, Universe};

/// Events generated during a tick, for the console log and persistence policy
#[derive(Debug, Clone, PartialEq)]
pub enum UniverseEvent {
    /// Proximity field created a pulse
    PulseSpawned {
        pulse: PulseId,
        origin: UnitId,
        destination: UnitId,
    },
    /// A pulse reached the end of its path
    PulseArrived(PulseOutcome),
    /// A unit ran out of energy and was retired
    UnitRetired { unit: UnitId },
}

/// Result of one evolution step
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick: Tick,
    pub effective_scale: f32,
    pub events: Vec<UniverseEvent>,
}

impl TickReport {
    pub fn retired(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.events.iter().filter_map(|e| match e {
            UniverseEvent::UnitRetired { unit } => Some(*unit),
            _ => None,
        })
    }

    pub fn has_retirements(&self) -> bool {
        self.retired().next().is_some()
    }

    pub fn spawned_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, UniverseEvent::PulseSpawned { .. }))
            .count()
    }
}

/// Advance both stores by one tick at `scale`
///
/// A zero scale still runs the tick: proximity pulses can still be created
/// and time factors refreshed, but nothing decays, accumulates or moves.
pub fn evolve(
    entities: &mut EntityStore,
    pulses: &mut PulseStore,
    physics: &PhysicsConfig,
    scale: f32,
    tick: Tick,
) -> Vec<UniverseEvent> {
    let mut events = Vec::new();

    // 1. Pulses
    for outcome in pulses.advance(entities, scale, tick) {
        events.push(UniverseEvent::PulseArrived(outcome));
    }

    // 2. Proximity field
    for (pulse, origin, destination) in spawn_proximity_pulses(entities, pulses, physics, tick) {
        events.push(UniverseEvent::PulseSpawned { pulse, origin, destination });
    }

    // 3. Decay and dilation
    apply_decay_and_dilation(entities, physics, scale);

    // 4. Lifecycle
    for unit in entities.retire_exhausted(tick) {
        events.push(UniverseEvent::UnitRetired { unit });
    }

    events
}

/// Run one evolution step on the universe
pub fn run_evolution_step(universe: &mut Universe) -> TickReport {
    let tick = universe.advance_tick();
    let scale = universe.clock.effective_scale();
    let (entities, pulses, physics) = universe.split_mut();
    let events = evolve(entities, pulses, physics, scale, tick);

    let report = TickReport {
        tick,
        effective_scale: scale,
        events,
    };
    if report.has_retirements() {
        universe.mark_dirty(DirtyState { live: true, dead: true });
    }
    report
}
