//! Proximity field - nearby units start exchanging pulses
//!
//! Every ordered pair of distinct live units closer than the proximity
//! radius gets a pulse, unless one already links them in either direction.
//! Sending is best effort: a unit too weak to pay the request simply does
//! not spawn a pulse this tick.

use ahash::AHashSet;

use crate::core::config::PhysicsConfig;
use crate::core::types::{PulseId, Tick, UnitId, Vec2};
use crate::entity::store::EntityStore;
use crate::pulse::PulseStore;

/// Unordered pair key, smaller id first
fn pair(a: UnitId, b: UnitId) -> (UnitId, UnitId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Spawn pulses between every pair of nearby, unconnected units
///
/// Returns `(pulse, origin, destination)` for each pulse created.
pub fn spawn_proximity_pulses(
    entities: &mut EntityStore,
    pulses: &mut PulseStore,
    physics: &PhysicsConfig,
    tick: Tick,
) -> Vec<(PulseId, UnitId, UnitId)> {
    let snapshot: Vec<(UnitId, Vec2)> = entities.live().iter().map(|u| (u.id, u.position)).collect();

    let mut connected: AHashSet<(UnitId, UnitId)> = pulses
        .pulses()
        .iter()
        .map(|p| pair(p.origin, p.destination))
        .collect();

    let mut spawned = Vec::new();
    for &(a, a_pos) in &snapshot {
        for &(b, b_pos) in &snapshot {
            if a == b || a_pos.distance(&b_pos) >= physics.proximity_radius {
                continue;
            }
            if connected.contains(&pair(a, b)) {
                continue;
            }

            match pulses.send(entities, a, b, physics.pulse_request, tick) {
                Ok(id) => {
                    connected.insert(pair(a, b));
                    spawned.push((id, a, b));
                }
                Err(e) => {
                    tracing::trace!(origin = %a, destination = %b, error = %e, "proximity pulse skipped");
                }
            }
        }
    }

    spawned
}
