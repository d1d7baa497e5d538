//! Universe configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every field has a default, so a
//! TOML file only needs to name the values it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, UniverseError};
use crate::entity::unit::UnitKind;

/// Complete configuration for a universe and the session driving it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub canvas: CanvasConfig,
    pub physics: PhysicsConfig,
    pub units: UnitConfig,
    pub runtime: RuntimeConfig,
    pub storage: StorageConfig,
}

/// Bounds used when placing new units
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Canvas width in world units
    pub width: f32,
    /// Canvas height in world units
    pub height: f32,
    /// Units are never placed closer than this to an edge
    pub margin: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1360.0,
            height: 600.0,
            margin: 10.0,
        }
    }
}

/// Interaction and dilation constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Energy ceiling; every unit's energy lives in [0, max_energy]
    pub max_energy: f32,

    /// Coefficient k in `time_factor = 1 / (1 + k * energy)`
    ///
    /// At 0.1 a full unit (energy 10) runs its clock at half speed.
    pub dilation_coefficient: f32,

    /// Units closer than this start exchanging pulses
    pub proximity_radius: f32,

    /// Energy reserved from the origin when proximity spawns a pulse,
    /// also the default request for `enviar pulso`
    pub pulse_request: f32,

    /// Fraction of the origin's post-debit energy that actually travels
    pub payload_fraction: f32,

    /// Distance covered per unit of universe time
    pub pulse_speed: f32,

    /// Multiplicative payload loss per advancing tick
    pub transit_decay: f32,

    /// Base consumption per unit kind, scaled by time factor and time scale
    pub consumption: ConsumptionRates,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_energy: 10.0,
            dilation_coefficient: 0.1,
            proximity_radius: 100.0,
            pulse_request: 0.2,
            payload_fraction: 0.1,
            pulse_speed: 1.0,
            transit_decay: 0.995,
            consumption: ConsumptionRates::default(),
        }
    }
}

/// Per-kind base energy consumption per tick
///
/// Processors burn fastest, storage barely at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumptionRates {
    pub processor: f32,
    pub memory: f32,
    pub storage: f32,
    pub power: f32,
    pub network: f32,
}

impl Default for ConsumptionRates {
    fn default() -> Self {
        Self {
            processor: 0.02,
            memory: 0.01,
            storage: 0.002,
            power: 0.01,
            network: 0.01,
        }
    }
}

impl ConsumptionRates {
    pub fn for_kind(&self, kind: UnitKind) -> f32 {
        match kind {
            UnitKind::Processor => self.processor,
            UnitKind::Memory => self.memory,
            UnitKind::Storage => self.storage,
            UnitKind::Power => self.power,
            UnitKind::Network => self.network,
        }
    }

    fn all(&self) -> [f32; 5] {
        [self.processor, self.memory, self.storage, self.power, self.network]
    }
}

/// Unit lifecycle constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    /// Energy of a freshly created unit
    pub initial_energy: f32,
    /// Energy removed by one `usar dado`
    pub consume_amount: f32,
    /// Events kept in each unit's memory before the oldest are evicted
    pub memory_capacity: usize,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            initial_energy: 10.0,
            consume_amount: 1.0,
            memory_capacity: 32,
        }
    }
}

/// Tick driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Fixed tick rate of the interactive loop
    pub ticks_per_second: u32,
    /// A full snapshot is written every this many ticks
    pub autosave_interval: u64,
    /// Time scale when the universe starts
    pub default_time_scale: f32,
    /// Seed for deterministic runs; entropy when absent
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 60,
            autosave_interval: 120,
            default_time_scale: 1.0,
            seed: None,
        }
    }
}

/// How a malformed snapshot file is treated on load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// A malformed file is a configuration error
    #[default]
    Strict,
    /// A malformed file is logged and treated as empty
    Lenient,
}

/// Where snapshots live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub universe_path: PathBuf,
    pub dead_path: PathBuf,
    pub load_mode: LoadMode,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            universe_path: PathBuf::from("data/universe.json"),
            dead_path: PathBuf::from("data/dados_mortos.json"),
            load_mode: LoadMode::Strict,
        }
    }
}

impl StorageConfig {
    /// Both snapshot files placed under `dir` with their default names
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            universe_path: dir.join("universe.json"),
            dead_path: dir.join("dados_mortos.json"),
            ..Self::default()
        }
    }

    /// Directory of the primary snapshot file, `.` when it has none
    pub fn data_dir(&self) -> &Path {
        match self.universe_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl UniverseConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            UniverseError::Config(format!("failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_toml(&contents)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults
    pub fn load_if_exists(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::info!(?path, "loading configuration");
            Self::load(path)
        } else {
            tracing::info!(?path, "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Move both snapshot files into `dir`, keeping the load mode
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.storage = StorageConfig {
            load_mode: self.storage.load_mode,
            ..StorageConfig::in_dir(dir)
        };
        self
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: UniverseConfig = toml::from_str(contents)
            .map_err(|e| UniverseError::Config(format!("failed to parse config TOML: {}", e)))?;

        config.validate().map_err(UniverseError::Config)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        let canvas = &self.canvas;
        if canvas.margin < 0.0 || canvas.width <= 2.0 * canvas.margin || canvas.height <= 2.0 * canvas.margin {
            return Err(format!(
                "canvas {}x{} leaves no room inside margin {}",
                canvas.width, canvas.height, canvas.margin
            ));
        }

        let physics = &self.physics;
        if physics.max_energy <= 0.0 {
            return Err("max_energy must be positive".into());
        }
        if physics.dilation_coefficient < 0.0 {
            return Err("dilation_coefficient must not be negative".into());
        }
        if physics.proximity_radius < 0.0 {
            return Err("proximity_radius must not be negative".into());
        }
        if physics.pulse_speed <= 0.0 {
            return Err("pulse_speed must be positive".into());
        }
        if !(0.0..=1.0).contains(&physics.payload_fraction) {
            return Err(format!(
                "payload_fraction ({}) must be within [0, 1]",
                physics.payload_fraction
            ));
        }
        if physics.transit_decay <= 0.0 || physics.transit_decay > 1.0 {
            return Err(format!(
                "transit_decay ({}) must be within (0, 1]",
                physics.transit_decay
            ));
        }
        if physics.consumption.all().iter().any(|rate| *rate < 0.0) {
            return Err("consumption rates must not be negative".into());
        }

        let units = &self.units;
        if units.initial_energy <= 0.0 || units.initial_energy > physics.max_energy {
            return Err(format!(
                "initial_energy ({}) must be within (0, max_energy ({})]",
                units.initial_energy, physics.max_energy
            ));
        }
        if units.memory_capacity == 0 {
            return Err("memory_capacity must be at least 1".into());
        }

        let runtime = &self.runtime;
        if runtime.ticks_per_second == 0 || runtime.autosave_interval == 0 {
            return Err("ticks_per_second and autosave_interval must be positive".into());
        }
        if !runtime.default_time_scale.is_finite() || runtime.default_time_scale < 0.0 {
            return Err(format!(
                "default_time_scale ({}) must be a finite, non-negative number",
                runtime.default_time_scale
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(UniverseConfig::default().validate().is_ok());
    }

    #[test]
    fn test_consumption_rates_by_kind() {
        let rates = ConsumptionRates::default();
        assert_eq!(rates.for_kind(UnitKind::Processor), 0.02);
        assert_eq!(rates.for_kind(UnitKind::Memory), 0.01);
        assert_eq!(rates.for_kind(UnitKind::Storage), 0.002);
        assert_eq!(rates.for_kind(UnitKind::Power), 0.01);
        assert_eq!(rates.for_kind(UnitKind::Network), 0.01);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = UniverseConfig::from_toml(
            r#"
            [runtime]
            seed = 7
            autosave_interval = 30

            [storage]
            load_mode = "lenient"
            "#,
        )
        .unwrap();

        assert_eq!(config.runtime.seed, Some(7));
        assert_eq!(config.runtime.autosave_interval, 30);
        assert_eq!(config.runtime.ticks_per_second, 60);
        assert_eq!(config.storage.load_mode, LoadMode::Lenient);
        assert_eq!(config.physics.proximity_radius, 100.0);
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = UniverseConfig::from_toml(include_str!("../../data/universe.toml")).unwrap();
        let defaults = UniverseConfig::default();
        assert_eq!(config.physics.proximity_radius, defaults.physics.proximity_radius);
        assert_eq!(config.physics.consumption.storage, defaults.physics.consumption.storage);
        assert_eq!(config.runtime.autosave_interval, defaults.runtime.autosave_interval);
        assert_eq!(config.storage.universe_path, defaults.storage.universe_path);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("dado-universe-no-such-config.toml");
        let config = UniverseConfig::load_if_exists(&path).unwrap();
        assert_eq!(config.canvas.width, 1360.0);
    }

    #[test]
    fn test_data_dir_keeps_load_mode() {
        let mut config = UniverseConfig::default();
        config.storage.load_mode = LoadMode::Lenient;
        let config = config.with_data_dir(Path::new("/tmp/dados"));
        assert_eq!(config.storage.universe_path, Path::new("/tmp/dados/universe.json"));
        assert_eq!(config.storage.dead_path, Path::new("/tmp/dados/dados_mortos.json"));
        assert_eq!(config.storage.load_mode, LoadMode::Lenient);
    }

    #[test]
    fn test_storage_paths_from_toml_are_kept() {
        let config = UniverseConfig::from_toml(
            r#"
            [storage]
            universe_path = "saves/u.json"
            dead_path = "saves/mortos.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.universe_path, Path::new("saves/u.json"));
        assert_eq!(config.storage.dead_path, Path::new("saves/mortos.json"));
        assert_eq!(config.storage.data_dir(), Path::new("saves"));
    }

    #[test]
    fn test_data_dir_of_bare_file_name() {
        let mut config = UniverseConfig::default();
        config.storage.universe_path = "u.json".into();
        assert_eq!(config.storage.data_dir(), Path::new("."));
        assert_eq!(UniverseConfig::default().storage.data_dir(), Path::new("data"));
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        let result = UniverseConfig::from_toml(
            r#"
            [physics]
            transit_decay = 1.5
            "#,
        );
        assert!(matches!(result, Err(UniverseError::Config(_))));
    }

    #[test]
    fn test_storage_in_dir() {
        let storage = StorageConfig::in_dir(Path::new("/tmp/universe"));
        assert_eq!(storage.universe_path, PathBuf::from("/tmp/universe/universe.json"));
        assert_eq!(storage.dead_path, PathBuf::from("/tmp/universe/dados_mortos.json"));
    }
}
