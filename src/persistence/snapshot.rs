//! JSON snapshots of the unit collections
//!
//! Two files: the primary snapshot holds the id counter and the live units,
//! the secondary one holds the dead units as a plain array.

use ahash::AHashSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::{LoadMode, StorageConfig};
use crate::core::error::{Result, UniverseError};
use crate::entity::unit::Unit;

/// Contents of the primary snapshot file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseSnapshot {
    pub last_id: u64,
    pub units: Vec<Unit>,
}

/// Reads and writes snapshot files under the configured paths
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    universe_path: PathBuf,
    dead_path: PathBuf,
    load_mode: LoadMode,
}

impl SnapshotStore {
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            universe_path: storage.universe_path.clone(),
            dead_path: storage.dead_path.clone(),
            load_mode: storage.load_mode,
        }
    }

    pub fn universe_path(&self) -> &Path {
        &self.universe_path
    }

    pub fn dead_path(&self) -> &Path {
        &self.dead_path
    }

    /// Write the live units and the id counter
    pub fn save(&self, units: &[Unit], last_id: u64) -> Result<()> {
        #[derive(Serialize)]
        struct Borrowed<'a> {
            last_id: u64,
            units: &'a [Unit],
        }

        write_json(&self.universe_path, &Borrowed { last_id, units })?;
        tracing::debug!(path = ?self.universe_path, units = units.len(), last_id, "universe saved");
        Ok(())
    }

    pub fn load(&self) -> Result<UniverseSnapshot> {
        let snapshot: UniverseSnapshot = self.read_or_empty(&self.universe_path)?;
        tracing::info!(
            path = ?self.universe_path,
            units = snapshot.units.len(),
            last_id = snapshot.last_id,
            "universe loaded"
        );
        Ok(snapshot)
    }

    pub fn save_dead(&self, units: &[Unit]) -> Result<()> {
        write_json(&self.dead_path, &units)?;
        tracing::debug!(path = ?self.dead_path, units = units.len(), "dead units saved");
        Ok(())
    }

    pub fn load_dead(&self) -> Result<Vec<Unit>> {
        self.read_or_empty(&self.dead_path)
    }

    /// Load both files and check that no id appears twice across them
    ///
    /// A repeated id makes the file it shows up in malformed: strict loads
    /// fail, lenient loads keep the first occurrence (live before dead).
    pub fn load_all(&self) -> Result<(UniverseSnapshot, Vec<Unit>)> {
        let mut snapshot = self.load()?;
        let mut dead = self.load_dead()?;

        let mut seen = AHashSet::new();
        self.drop_repeated_ids(&self.universe_path, &mut snapshot.units, &mut seen)?;
        self.drop_repeated_ids(&self.dead_path, &mut dead, &mut seen)?;
        Ok((snapshot, dead))
    }

    fn drop_repeated_ids(&self, path: &Path, units: &mut Vec<Unit>, seen: &mut AHashSet<u64>) -> Result<()> {
        let before = units.len();
        let mut repeated = Vec::new();
        units.retain(|unit| {
            let fresh = seen.insert(unit.id.0);
            if !fresh {
                repeated.push(unit.id.0);
            }
            fresh
        });
        if repeated.is_empty() {
            return Ok(());
        }

        match self.load_mode {
            LoadMode::Strict => Err(UniverseError::Persistence {
                path: path.to_path_buf(),
                reason: format!("repeated unit ids {:?}", repeated),
            }),
            LoadMode::Lenient => {
                tracing::warn!(?path, ?repeated, kept = units.len(), before, "repeated unit ids dropped");
                Ok(())
            }
        }
    }

    /// Missing file is empty state; malformed file depends on the load mode
    fn read_or_empty<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(?path, "no snapshot yet, starting empty");
                return Ok(T::default());
            }
            Err(e) => {
                return Err(UniverseError::Persistence {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => Ok(value),
            Err(e) => match self.load_mode {
                LoadMode::Strict => Err(UniverseError::Persistence {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }),
                LoadMode::Lenient => {
                    tracing::warn!(?path, error = %e, "malformed snapshot ignored");
                    Ok(T::default())
                }
            },
        }
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let persistence_error = |reason: String| UniverseError::Persistence {
        path: path.to_path_buf(),
        reason,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| persistence_error(e.to_string()))?;
        }
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| persistence_error(e.to_string()))
}
