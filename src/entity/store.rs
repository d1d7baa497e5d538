//! Entity store - owns the live and retired units and hands out ids

use rand::Rng;

use crate::core::config::{CanvasConfig, UniverseConfig};
use crate::core::error::{Result, UniverseError};
use crate::core::types::{Tick, UnitId, Vec2};
use crate::entity::memory::MemoryEvent;
use crate::entity::unit::{Unit, UnitKind};

/// Outcome of draining energy from a unit with `consume`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Consumption {
    pub energy_after: f32,
    pub retired: bool,
}

/// The live and dead unit collections
///
/// Dead units are never mutated again once retired.
#[derive(Debug, Clone)]
pub struct EntityStore {
    live: Vec<Unit>,
    dead: Vec<Unit>,
    last_id: u64,
    canvas: CanvasConfig,
    max_energy: f32,
    initial_energy: f32,
    memory_capacity: usize,
}

impl EntityStore {
    pub fn new(config: &UniverseConfig) -> Self {
        Self {
            live: Vec::new(),
            dead: Vec::new(),
            last_id: 0,
            canvas: config.canvas.clone(),
            max_energy: config.physics.max_energy,
            initial_energy: config.units.initial_energy,
            memory_capacity: config.units.memory_capacity,
        }
    }

    /// Create a unit at a random canvas position with a random kind
    pub fn create_unit(&mut self, rng: &mut impl Rng, tick: Tick) -> &Unit {
        let position = self.random_position(rng);
        let kind = UnitKind::ALL[rng.gen_range(0..UnitKind::ALL.len())];
        self.spawn_at(position, kind, tick)
    }

    /// Create a unit at a chosen position
    pub fn spawn_at(&mut self, position: Vec2, kind: UnitKind, tick: Tick) -> &Unit {
        self.last_id += 1;
        let mut unit = Unit::new(
            UnitId(self.last_id),
            position,
            kind,
            self.initial_energy,
            self.memory_capacity,
        );
        unit.memory.record(tick, MemoryEvent::Created);

        tracing::info!(id = %unit.id, kind = %unit.kind, "unit created");
        let index = self.live.len();
        self.live.push(unit);
        &self.live[index]
    }

    fn random_position(&self, rng: &mut impl Rng) -> Vec2 {
        let min_x = self.canvas.margin.ceil() as i32;
        let max_x = (self.canvas.width - self.canvas.margin).floor() as i32;
        let min_y = self.canvas.margin.ceil() as i32;
        let max_y = (self.canvas.height - self.canvas.margin).floor() as i32;

        Vec2::new(
            rng.gen_range(min_x..=max_x.max(min_x)) as f32,
            rng.gen_range(min_y..=max_y.max(min_y)) as f32,
        )
    }

    pub fn find_live(&self, id: UnitId) -> Option<&Unit> {
        self.live.iter().find(|u| u.id == id)
    }

    pub(crate) fn find_live_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.live.iter_mut().find(|u| u.id == id)
    }

    /// Search the live units, then the dead ones
    pub fn find_any(&self, id: UnitId) -> Option<&Unit> {
        self.find_live(id)
            .or_else(|| self.dead.iter().find(|u| u.id == id))
    }

    pub fn is_live(&self, id: UnitId) -> bool {
        self.find_live(id).is_some()
    }

    /// Drain `amount` from a live unit, retiring it if nothing is left
    pub fn consume(&mut self, id: UnitId, amount: f32, tick: Tick) -> Result<Consumption> {
        let index = self
            .live
            .iter()
            .position(|u| u.id == id)
            .ok_or(UniverseError::NotFound(id))?;

        let unit = &mut self.live[index];
        unit.energy = (unit.energy - amount).min(self.max_energy);
        let energy_after = unit.energy.max(0.0);
        unit.memory.record(tick, MemoryEvent::Used { amount, energy_after });

        if unit.is_exhausted() {
            let unit = self.live.remove(index);
            self.bury(unit, tick);
            return Ok(Consumption { energy_after, retired: true });
        }

        Ok(Consumption { energy_after, retired: false })
    }

    /// Clone kind and energy of a live unit into a freshly created one
    ///
    /// Position, time factor and proper time keep their creation defaults.
    pub fn duplicate(&mut self, id: UnitId, rng: &mut impl Rng, tick: Tick) -> Result<&Unit> {
        let (kind, energy) = self
            .find_live(id)
            .map(|u| (u.kind, u.energy))
            .ok_or(UniverseError::NotFound(id))?;

        let new_id = self.create_unit(rng, tick).id;
        let index = self.live.len() - 1;
        let copy = &mut self.live[index];
        debug_assert_eq!(copy.id, new_id);
        copy.kind = kind;
        copy.energy = energy;
        copy.memory.record(tick, MemoryEvent::DuplicatedFrom { source: id });

        Ok(&self.live[index])
    }

    /// Remove `amount` from a live unit that holds at least that much
    ///
    /// Returns the energy left. No partial debit happens on failure.
    pub fn debit(&mut self, id: UnitId, amount: f32) -> Result<f32> {
        let unit = self.find_live_mut(id).ok_or(UniverseError::NotFound(id))?;
        if unit.energy < amount {
            return Err(UniverseError::InsufficientEnergy {
                unit: id,
                available: unit.energy,
                requested: amount,
            });
        }
        unit.energy = (unit.energy - amount).max(0.0);
        Ok(unit.energy)
    }

    /// Add energy to a live unit, capped at the ceiling
    ///
    /// Returns false when the unit is not live.
    pub fn credit(&mut self, id: UnitId, amount: f32) -> bool {
        let max_energy = self.max_energy;
        match self.find_live_mut(id) {
            Some(unit) => {
                unit.energy = (unit.energy + amount).clamp(0.0, max_energy);
                true
            }
            None => false,
        }
    }

    /// Append an event to a live unit's memory; dead units are left untouched
    pub fn record(&mut self, id: UnitId, tick: Tick, event: MemoryEvent) {
        if let Some(unit) = self.find_live_mut(id) {
            unit.memory.record(tick, event);
        }
    }

    /// Move every live unit with no energy left to the dead collection
    pub fn retire_exhausted(&mut self, tick: Tick) -> Vec<UnitId> {
        let (exhausted, alive): (Vec<Unit>, Vec<Unit>) =
            std::mem::take(&mut self.live).into_iter().partition(|u| u.is_exhausted());
        self.live = alive;

        let mut retired = Vec::with_capacity(exhausted.len());
        for unit in exhausted {
            retired.push(unit.id);
            self.bury(unit, tick);
        }
        retired
    }

    fn bury(&mut self, mut unit: Unit, tick: Tick) {
        if self.dead.iter().any(|d| d.id == unit.id) {
            tracing::warn!(id = %unit.id, "unit already retired, skipping");
            return;
        }
        unit.energy = 0.0;
        unit.memory.record(tick, MemoryEvent::Retired);
        tracing::info!(id = %unit.id, proper_time = unit.proper_time, "unit retired");
        self.dead.push(unit);
    }

    pub fn live(&self) -> &[Unit] {
        &self.live
    }

    pub(crate) fn live_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.live.iter_mut()
    }

    pub fn dead(&self) -> &[Unit] {
        &self.dead
    }

    pub fn live_ids(&self) -> Vec<UnitId> {
        self.live.iter().map(|u| u.id).collect()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn dead_count(&self) -> usize {
        self.dead.len()
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Sum of live units' energy
    pub fn total_energy(&self) -> f32 {
        self.live.iter().fold(0.0, |acc, u| acc + u.energy)
    }

    /// Forget every unit and restart ids at 1; irreversible
    pub fn reset(&mut self) {
        self.live.clear();
        self.dead.clear();
        self.last_id = 0;
    }

    /// Replace both collections with previously persisted state
    ///
    /// The id counter never ends up below an id already in use.
    pub fn restore(&mut self, live: Vec<Unit>, dead: Vec<Unit>, last_id: u64) {
        let highest = live
            .iter()
            .chain(dead.iter())
            .map(|u| u.id.0)
            .max()
            .unwrap_or(0);
        if highest > last_id {
            tracing::warn!(last_id, highest, "stored id counter behind stored units, raising it");
        }

        self.live = live;
        self.dead = dead;
        self.last_id = last_id.max(highest);

        let max_energy = self.max_energy;
        for unit in self.live.iter_mut().chain(self.dead.iter_mut()) {
            unit.energy = unit.energy.clamp(0.0, max_energy);
            unit.memory.set_capacity(self.memory_capacity);
        }
    }
}
