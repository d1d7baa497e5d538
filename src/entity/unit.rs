//! The unit ("dado") record

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{UnitId, Vec2};
use crate::entity::memory::UnitMemory;

/// What a unit is; chosen at creation and never changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Memory,
    Processor,
    Storage,
    Power,
    Network,
}

impl UnitKind {
    pub const ALL: [UnitKind; 5] = [
        UnitKind::Memory,
        UnitKind::Processor,
        UnitKind::Storage,
        UnitKind::Power,
        UnitKind::Network,
    ];

    /// Name shown on the console
    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Memory => "Memória",
            UnitKind::Processor => "Processador",
            UnitKind::Storage => "Armazenamento",
            UnitKind::Power => "Energia",
            UnitKind::Network => "Rede",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An energy-bearing unit with its own dilated clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub position: Vec2,
    pub kind: UnitKind,
    /// Vitality, kept within [0, max_energy]
    pub energy: f32,
    /// Local rate of subjective time, (0, 1]; recomputed every tick
    pub time_factor: f32,
    /// Subjective time accumulated so far
    pub proper_time: f64,
    #[serde(default)]
    pub memory: UnitMemory,
}

impl Unit {
    pub fn new(id: UnitId, position: Vec2, kind: UnitKind, energy: f32, memory_capacity: usize) -> Self {
        Self {
            id,
            position,
            kind,
            energy,
            time_factor: 1.0,
            proper_time: 0.0,
            memory: UnitMemory::with_capacity(memory_capacity),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.energy <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_unit_defaults() {
        let unit = Unit::new(UnitId(3), Vec2::new(1.0, 2.0), UnitKind::Storage, 10.0, 8);
        assert_eq!(unit.time_factor, 1.0);
        assert_eq!(unit.proper_time, 0.0);
        assert!(unit.memory.is_empty());
        assert!(!unit.is_exhausted());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(UnitKind::Processor.to_string(), "Processador");
        assert_eq!(UnitKind::Storage.label(), "Armazenamento");
    }

    #[test]
    fn test_unit_json_fields() {
        let unit = Unit::new(UnitId(1), Vec2::new(10.0, 20.0), UnitKind::Network, 10.0, 4);
        let value = serde_json::to_value(&unit).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["kind"], "Network");
        assert_eq!(value["position"]["x"], 10.0);
        assert!(value["memory"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_unit_without_memory_field_loads() {
        let json = r#"{"id":4,"position":{"x":1.0,"y":2.0},"kind":"Power",
            "energy":5.5,"time_factor":0.6,"proper_time":12.0}"#;
        let unit: Unit = serde_json::from_str(json).unwrap();
        assert_eq!(unit.id, UnitId(4));
        assert_eq!(unit.kind, UnitKind::Power);
        assert!(unit.memory.is_empty());
    }
}
