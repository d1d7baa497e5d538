//! A running universe with its console and its snapshot files

use crate::command::{CommandRouter, Response};
use crate::core::config::UniverseConfig;
use crate::core::error::Result;
use crate::persistence::SnapshotStore;
use crate::simulation::tick::{run_evolution_step, TickReport};
use crate::universe::{DirtyState, Universe};

/// Drives ticks and commands, and keeps the snapshot files current
///
/// Snapshots are written after anything that creates, duplicates, retires
/// or resets units, and every `autosave_interval` ticks.
pub struct Session {
    universe: Universe,
    router: CommandRouter,
    snapshots: Option<SnapshotStore>,
    autosave_interval: u64,
}

impl Session {
    /// Load the configured snapshot files and start from them
    pub fn open(config: UniverseConfig) -> Result<Self> {
        let snapshots = SnapshotStore::new(&config.storage);
        let (snapshot, dead) = snapshots.load_all()?;

        let mut universe = Universe::new(config);
        universe.restore(snapshot.units, dead, snapshot.last_id);
        tracing::info!(
            live = universe.entities.live_count(),
            dead = universe.entities.dead_count(),
            last_id = universe.entities.last_id(),
            "session opened"
        );

        Ok(Self::from_parts(universe, CommandRouter::standard(), Some(snapshots)))
    }

    /// A session that never touches the disk
    pub fn in_memory(config: UniverseConfig) -> Self {
        Self::from_parts(Universe::new(config), CommandRouter::standard(), None)
    }

    pub fn from_parts(universe: Universe, router: CommandRouter, snapshots: Option<SnapshotStore>) -> Self {
        let autosave_interval = universe.config().runtime.autosave_interval.max(1);
        Self {
            universe,
            router,
            snapshots,
            autosave_interval,
        }
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn universe_mut(&mut self) -> &mut Universe {
        &mut self.universe
    }

    pub fn router_mut(&mut self) -> &mut CommandRouter {
        &mut self.router
    }

    /// Run one tick; a failed save is logged and retried on the next one
    pub fn step(&mut self) -> TickReport {
        let report = run_evolution_step(&mut self.universe);
        let periodic = report.tick % self.autosave_interval == 0;
        if let Err(e) = self.persist(periodic) {
            tracing::error!(tick = report.tick, error = %e, "autosave failed");
        }
        report
    }

    /// Run one console line; save failures are appended to the response
    pub fn execute(&mut self, line: &str) -> Response {
        let mut response = self.router.dispatch(line, &mut self.universe);
        if let Err(e) = self.persist(false) {
            tracing::error!(command = line, error = %e, "save after command failed");
            response.push(format!("Falha ao salvar universo: {}", e));
        }
        response
    }

    /// Write both snapshot files unconditionally
    pub fn flush(&mut self) -> Result<()> {
        self.universe.take_dirty();
        let Some(snapshots) = &self.snapshots else {
            return Ok(());
        };
        let entities = &self.universe.entities;
        snapshots.save(entities.live(), entities.last_id())?;
        snapshots.save_dead(entities.dead())?;
        tracing::info!("universe flushed");
        Ok(())
    }

    fn persist(&mut self, periodic: bool) -> Result<()> {
        let dirty = self.universe.take_dirty();
        let Some(snapshots) = &self.snapshots else {
            return Ok(());
        };

        let entities = &self.universe.entities;
        let mut pending = dirty;
        if dirty.live || periodic {
            match snapshots.save(entities.live(), entities.last_id()) {
                Ok(()) => pending.live = false,
                Err(e) => {
                    self.universe.mark_dirty(pending);
                    return Err(e);
                }
            }
        }
        if dirty.dead {
            if let Err(e) = snapshots.save_dead(entities.dead()) {
                self.universe.mark_dirty(DirtyState { live: false, dead: true });
                return Err(e);
            }
        }
        Ok(())
    }
}
