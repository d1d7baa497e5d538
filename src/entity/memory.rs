//! Per-unit event memory
//!
//! Every live unit remembers the last few things that happened to it. The
//! buffer is bounded; when full, the oldest entry is evicted.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::core::types::{PulseId, Tick, UnitId};

const DEFAULT_CAPACITY: usize = 32;

/// Something a unit experienced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MemoryEvent {
    Created,
    DuplicatedFrom { source: UnitId },
    Used { amount: f32, energy_after: f32 },
    PulseSent { pulse: PulseId, destination: UnitId, payload: f32 },
    PulseReceived { pulse: PulseId, origin: UnitId, payload: f32 },
    Retired,
}

/// A memory event stamped with the universe tick it happened on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub tick: Tick,
    #[serde(flatten)]
    pub event: MemoryEvent,
}

impl fmt::Display for MemoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} | ", self.tick)?;
        match &self.event {
            MemoryEvent::Created => write!(f, "criado"),
            MemoryEvent::DuplicatedFrom { source } => {
                write!(f, "criado como cópia do dado {}", source)
            }
            MemoryEvent::Used { amount, energy_after } => {
                write!(f, "usado (-{:.2}) | energia = {:.2}", amount, energy_after)
            }
            MemoryEvent::PulseSent { pulse, destination, payload } => write!(
                f,
                "enviou pulso {} → dado {} | Energia: {:.2}",
                pulse, destination, payload
            ),
            MemoryEvent::PulseReceived { pulse, origin, payload } => write!(
                f,
                "recebeu pulso {} ← dado {} | Energia: {:.2}",
                pulse, origin, payload
            ),
            MemoryEvent::Retired => write!(f, "esgotado e removido"),
        }
    }
}

/// Bounded event log; persisted as a plain JSON array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<MemoryEntry>", into = "Vec<MemoryEntry>")]
pub struct UnitMemory {
    entries: VecDeque<MemoryEntry>,
    capacity: usize,
}

impl Default for UnitMemory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl UnitMemory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, tick: Tick, event: MemoryEvent) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(MemoryEntry { tick, event });
    }

    /// Change the bound, evicting the oldest entries if it shrank
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&MemoryEntry> {
        self.entries.back()
    }
}

impl From<Vec<MemoryEntry>> for UnitMemory {
    fn from(entries: Vec<MemoryEntry>) -> Self {
        let capacity = entries.len().max(DEFAULT_CAPACITY);
        Self {
            entries: entries.into(),
            capacity,
        }
    }
}

impl From<UnitMemory> for Vec<MemoryEntry> {
    fn from(memory: UnitMemory) -> Self {
        memory.entries.into()
    }
}
