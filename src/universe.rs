//! Universe - the aggregate that owns every piece of simulation state
//!
//! The entity store, the pulse store, time control, configuration and the
//! random number generator live here and are passed explicitly to the tick
//! driver and the command router.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::core::config::{PhysicsConfig, UniverseConfig};
use crate::core::error::Result;
use crate::core::types::{PulseId, Tick, UnitId};
use crate::entity::store::{Consumption, EntityStore};
use crate::entity::unit::Unit;
use crate::pulse::PulseStore;
use crate::simulation::clock::TimeControl;

/// Which snapshot files are out of date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyState {
    pub live: bool,
    pub dead: bool,
}

impl DirtyState {
    pub fn any(&self) -> bool {
        self.live || self.dead
    }
}

/// Counts and totals shown by `status`
#[derive(Debug, Clone, Serialize)]
pub struct UniverseStatus {
    pub tick: Tick,
    pub live_units: usize,
    pub dead_units: usize,
    pub pulses: usize,
    pub unit_energy: f32,
    pub pulse_energy: f32,
    pub total_energy: f32,
    pub time_scale: f32,
    pub paused: bool,
    pub last_id: u64,
}

pub struct Universe {
    pub entities: EntityStore,
    pub pulses: PulseStore,
    pub clock: TimeControl,
    config: UniverseConfig,
    /// Random number generator (deterministic when seeded)
    rng: ChaCha8Rng,
    tick: Tick,
    dirty: DirtyState,
}

impl Universe {
    pub fn new(config: UniverseConfig) -> Self {
        let rng = match config.runtime.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            entities: EntityStore::new(&config),
            pulses: PulseStore::new(&config),
            clock: TimeControl::new(config.runtime.default_time_scale),
            config,
            rng,
            tick: 0,
            dirty: DirtyState::default(),
        }
    }

    /// A universe with default configuration and a fixed seed
    pub fn seeded(seed: u64) -> Self {
        let mut config = UniverseConfig::default();
        config.runtime.seed = Some(seed);
        Self::new(config)
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub(crate) fn advance_tick(&mut self) -> Tick {
        self.tick += 1;
        self.tick
    }

    /// Create a unit at a random position
    pub fn create_unit(&mut self) -> UnitId {
        let id = self.entities.create_unit(&mut self.rng, self.tick).id;
        self.dirty.live = true;
        id
    }

    /// Drain the configured amount from a unit (the `usar dado` command)
    pub fn consume(&mut self, id: UnitId) -> Result<Consumption> {
        let amount = self.config.units.consume_amount;
        let consumption = self.entities.consume(id, amount, self.tick)?;
        if consumption.retired {
            self.dirty.live = true;
            self.dirty.dead = true;
        }
        Ok(consumption)
    }

    pub fn duplicate(&mut self, id: UnitId) -> Result<UnitId> {
        let copy = self.entities.duplicate(id, &mut self.rng, self.tick)?.id;
        self.dirty.live = true;
        Ok(copy)
    }

    /// Send a pulse with the default energy request
    pub fn send_pulse(&mut self, origin: UnitId, destination: UnitId) -> Result<PulseId> {
        let requested = self.config.physics.pulse_request;
        self.send_pulse_with(origin, destination, requested)
    }

    pub fn send_pulse_with(&mut self, origin: UnitId, destination: UnitId, requested: f32) -> Result<PulseId> {
        self.pulses
            .send(&mut self.entities, origin, destination, requested, self.tick)
    }

    /// Energy held by live units plus energy in flight
    pub fn total_energy(&self) -> f32 {
        self.entities.total_energy() + self.pulses.total_energy()
    }

    pub fn status(&self) -> UniverseStatus {
        let unit_energy = self.entities.total_energy();
        let pulse_energy = self.pulses.total_energy();
        UniverseStatus {
            tick: self.tick,
            live_units: self.entities.live_count(),
            dead_units: self.entities.dead_count(),
            pulses: self.pulses.len(),
            unit_energy,
            pulse_energy,
            total_energy: unit_energy + pulse_energy,
            time_scale: self.clock.time_scale(),
            paused: self.clock.is_paused(),
            last_id: self.entities.last_id(),
        }
    }

    /// Destroy every unit and pulse and restart ids at 1
    pub fn reset(&mut self) {
        self.entities.reset();
        self.pulses.clear();
        self.dirty = DirtyState { live: true, dead: true };
        tracing::warn!("universe reset");
    }

    /// Replace the unit collections with persisted state
    pub fn restore(&mut self, live: Vec<Unit>, dead: Vec<Unit>, last_id: u64) {
        self.entities.restore(live, dead, last_id);
        self.pulses.clear();
    }

    /// Both stores plus the physics constants, borrowed together for a tick
    pub(crate) fn split_mut(&mut self) -> (&mut EntityStore, &mut PulseStore, &PhysicsConfig) {
        (&mut self.entities, &mut self.pulses, &self.config.physics)
    }

    pub(crate) fn mark_dirty(&mut self, state: DirtyState) {
        self.dirty.live |= state.live;
        self.dirty.dead |= state.dead;
    }

    /// Return and clear the pending snapshot flags
    pub fn take_dirty(&mut self) -> DirtyState {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::UniverseError;

    #[test]
    fn test_create_marks_live_dirty() {
        let mut universe = Universe::seeded(1);
        let id = universe.create_unit();
        assert_eq!(id, UnitId(1));
        assert_eq!(universe.take_dirty(), DirtyState { live: true, dead: false });
        assert!(!universe.take_dirty().any());
    }

    #[test]
    fn test_consume_to_death_marks_both() {
        let mut universe = Universe::seeded(2);
        let id = universe.create_unit();
        universe.take_dirty();

        for _ in 0..9 {
            universe.consume(id).unwrap();
        }
        assert!(!universe.take_dirty().any());

        assert!(universe.consume(id).unwrap().retired);
        assert_eq!(universe.take_dirty(), DirtyState { live: true, dead: true });
    }

    #[test]
    fn test_total_energy_counts_pulses() {
        let mut universe = Universe::seeded(3);
        let a = universe.create_unit();
        let b = universe.create_unit();
        universe.send_pulse(a, b).unwrap();

        let in_flight = universe.pulses.total_energy();
        assert!(in_flight > 0.0);
        assert!((universe.total_energy() - (universe.entities.total_energy() + in_flight)).abs() < 1e-5);
    }

    #[test]
    fn test_reset_clears_pulses() {
        let mut universe = Universe::seeded(4);
        let a = universe.create_unit();
        let b = universe.create_unit();
        universe.send_pulse(a, b).unwrap();

        universe.reset();

        assert!(universe.pulses.is_empty());
        assert_eq!(universe.create_unit(), UnitId(1));
    }

    #[test]
    fn test_send_pulse_reports_missing_unit() {
        let mut universe = Universe::seeded(5);
        let a = universe.create_unit();
        assert!(matches!(
            universe.send_pulse(a, UnitId(9)),
            Err(UniverseError::NotFound(UnitId(9)))
        ));
    }
}
