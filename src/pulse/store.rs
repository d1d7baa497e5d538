//! Pulse store - sends, advances and delivers pulses

use crate::core::config::UniverseConfig;
use crate::core::error::{Result, UniverseError};
use crate::core::types::{PulseId, Tick, UnitId};
use crate::entity::memory::MemoryEvent;
use crate::entity::store::EntityStore;
use crate::pulse::Pulse;

/// What happened to a pulse that reached the end of its path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PulseOutcome {
    /// Payload credited to a live destination
    Delivered {
        pulse: PulseId,
        origin: UnitId,
        destination: UnitId,
        payload: f32,
    },
    /// Destination retired before arrival; the payload is gone
    Lost {
        pulse: PulseId,
        destination: UnitId,
        payload: f32,
    },
}

#[derive(Debug, Clone)]
pub struct PulseStore {
    pulses: Vec<Pulse>,
    next_id: u64,
    payload_fraction: f32,
    speed: f32,
    transit_decay: f32,
}

impl PulseStore {
    pub fn new(config: &UniverseConfig) -> Self {
        Self {
            pulses: Vec::new(),
            next_id: 0,
            payload_fraction: config.physics.payload_fraction,
            speed: config.physics.pulse_speed,
            transit_decay: config.physics.transit_decay,
        }
    }

    /// Send a pulse from `origin` to `destination`
    ///
    /// The origin is debited the full `requested` amount, but what travels is
    /// `payload_fraction` of the energy the origin has left after the debit.
    pub fn send(
        &mut self,
        entities: &mut EntityStore,
        origin: UnitId,
        destination: UnitId,
        requested: f32,
        tick: Tick,
    ) -> Result<PulseId> {
        if origin == destination {
            return Err(UniverseError::InvalidArgument(format!(
                "origem e destino iguais ({})",
                origin
            )));
        }
        if !requested.is_finite() || requested < 0.0 {
            return Err(UniverseError::InvalidArgument(format!(
                "energia de pulso inválida: {}",
                requested
            )));
        }

        let origin_pos = entities
            .find_live(origin)
            .ok_or(UniverseError::NotFound(origin))?
            .position;
        let destination_pos = entities
            .find_live(destination)
            .ok_or(UniverseError::NotFound(destination))?
            .position;

        let remaining = entities.debit(origin, requested)?;
        let payload = remaining * self.payload_fraction;

        self.next_id += 1;
        let id = PulseId(self.next_id);
        self.pulses.push(Pulse {
            id,
            origin,
            destination,
            energy_payload: payload,
            progress: 0.0,
            origin_pos,
            destination_pos,
            current_pos: origin_pos,
            distance: origin_pos.distance(&destination_pos),
            speed: self.speed,
        });

        entities.record(
            origin,
            tick,
            MemoryEvent::PulseSent { pulse: id, destination, payload },
        );
        tracing::debug!(pulse = %id, %origin, %destination, payload, "pulse sent");

        Ok(id)
    }

    /// Move every pulse forward by `scale` units of universe time
    ///
    /// Arrived pulses are removed whether or not their destination still
    /// exists. A scale of zero leaves every pulse untouched.
    pub fn advance(&mut self, entities: &mut EntityStore, scale: f32, tick: Tick) -> Vec<PulseOutcome> {
        let mut outcomes = Vec::new();
        if scale <= 0.0 {
            return outcomes;
        }

        let decay = self.transit_decay;
        self.pulses.retain_mut(|pulse| {
            pulse.distance = pulse.origin_pos.distance(&pulse.destination_pos);
            if pulse.distance > 0.0 {
                pulse.progress += (pulse.speed * scale) / pulse.distance;
            } else {
                pulse.progress = 1.0;
            }

            pulse.energy_payload *= decay;
            let t = pulse.progress.min(1.0);
            pulse.current_pos = pulse.origin_pos.lerp(&pulse.destination_pos, t);

            if pulse.progress < 1.0 {
                return true;
            }
            pulse.progress = 1.0;

            if entities.credit(pulse.destination, pulse.energy_payload) {
                entities.record(
                    pulse.destination,
                    tick,
                    MemoryEvent::PulseReceived {
                        pulse: pulse.id,
                        origin: pulse.origin,
                        payload: pulse.energy_payload,
                    },
                );
                tracing::debug!(pulse = %pulse.id, destination = %pulse.destination, "pulse delivered");
                outcomes.push(PulseOutcome::Delivered {
                    pulse: pulse.id,
                    origin: pulse.origin,
                    destination: pulse.destination,
                    payload: pulse.energy_payload,
                });
            } else {
                tracing::debug!(pulse = %pulse.id, destination = %pulse.destination, "pulse lost");
                outcomes.push(PulseOutcome::Lost {
                    pulse: pulse.id,
                    destination: pulse.destination,
                    payload: pulse.energy_payload,
                });
            }
            false
        });

        outcomes
    }

    /// Whether any pulse links `a` and `b`, in either direction
    pub fn connects(&self, a: UnitId, b: UnitId) -> bool {
        self.pulses.iter().any(|p| p.connects(a, b))
    }

    /// Energy currently in flight
    pub fn total_energy(&self) -> f32 {
        self.pulses.iter().fold(0.0, |acc, p| acc + p.energy_payload)
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    pub fn find(&self, id: PulseId) -> Option<&Pulse> {
        self.pulses.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    pub fn clear(&mut self) {
        self.pulses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::entity::unit::UnitKind;

    fn setup(distance: f32) -> (EntityStore, PulseStore, UnitId, UnitId) {
        let config = UniverseConfig::default();
        let mut entities = EntityStore::new(&config);
        let a = entities.spawn_at(Vec2::new(100.0, 100.0), UnitKind::Memory, 0).id;
        let b = entities.spawn_at(Vec2::new(100.0 + distance, 100.0), UnitKind::Storage, 0).id;
        (entities, PulseStore::new(&config), a, b)
    }

    #[test]
    fn test_send_debits_and_sets_payload() {
        let (mut entities, mut pulses, a, b) = setup(50.0);
        let id = pulses.send(&mut entities, a, b, 0.2, 0).unwrap();

        let origin_energy = entities.find_live(a).unwrap().energy;
        assert!((origin_energy - 9.8).abs() < 1e-5);

        let pulse = pulses.find(id).unwrap();
        assert_eq!(pulse.energy_payload, origin_energy * 0.1);
        assert_eq!(pulse.progress, 0.0);
        assert_eq!(pulse.current_pos, Vec2::new(100.0, 100.0));
        assert_eq!(pulse.destination_pos, Vec2::new(150.0, 100.0));
    }

    #[test]
    fn test_send_unknown_endpoint() {
        let (mut entities, mut pulses, a, _) = setup(50.0);
        assert!(matches!(
            pulses.send(&mut entities, a, UnitId(99), 0.2, 0),
            Err(UniverseError::NotFound(UnitId(99)))
        ));
        assert!(matches!(
            pulses.send(&mut entities, UnitId(98), a, 0.2, 0),
            Err(UniverseError::NotFound(UnitId(98)))
        ));
        assert_eq!(entities.find_live(a).unwrap().energy, 10.0);
        assert!(pulses.is_empty());
    }

    #[test]
    fn test_send_insufficient_energy_leaves_origin_untouched() {
        let (mut entities, mut pulses, a, b) = setup(50.0);
        let err = pulses.send(&mut entities, a, b, 10.5, 0).unwrap_err();
        assert!(matches!(err, UniverseError::InsufficientEnergy { .. }));
        assert_eq!(entities.find_live(a).unwrap().energy, 10.0);
        assert!(pulses.is_empty());
    }

    #[test]
    fn test_send_to_self_rejected() {
        let (mut entities, mut pulses, a, _) = setup(50.0);
        assert!(matches!(
            pulses.send(&mut entities, a, a, 0.2, 0),
            Err(UniverseError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_advance_interpolates_and_decays() {
        let (mut entities, mut pulses, a, b) = setup(50.0);
        let id = pulses.send(&mut entities, a, b, 0.2, 0).unwrap();
        let initial = pulses.find(id).unwrap().energy_payload;

        pulses.advance(&mut entities, 5.0, 1);
        let pulse = pulses.find(id).unwrap();
        assert!((pulse.progress - 0.1).abs() < 1e-6);
        assert!((pulse.current_pos.x - 105.0).abs() < 1e-4);
        assert!((pulse.energy_payload - initial * 0.995).abs() < 1e-6);
    }

    #[test]
    fn test_zero_scale_is_noop() {
        let (mut entities, mut pulses, a, b) = setup(50.0);
        let id = pulses.send(&mut entities, a, b, 0.2, 0).unwrap();
        let before = pulses.find(id).unwrap().clone();

        assert!(pulses.advance(&mut entities, 0.0, 1).is_empty());
        let after = pulses.find(id).unwrap();
        assert_eq!(after.progress, before.progress);
        assert_eq!(after.energy_payload, before.energy_payload);
    }

    #[test]
    fn test_arrival_credits_destination() {
        let (mut entities, mut pulses, a, b) = setup(10.0);
        entities.consume(b, 4.0, 0).unwrap();
        pulses.send(&mut entities, a, b, 0.2, 0).unwrap();

        let mut delivered = Vec::new();
        for tick in 1..=20 {
            delivered.extend(pulses.advance(&mut entities, 1.0, tick));
        }

        assert!(pulses.is_empty());
        assert_eq!(delivered.len(), 1);
        let PulseOutcome::Delivered { payload, .. } = delivered[0] else {
            panic!("expected delivery, got {:?}", delivered[0]);
        };
        let energy = entities.find_live(b).unwrap().energy;
        assert!((energy - (6.0 + payload)).abs() < 1e-5);
    }

    #[test]
    fn test_arrival_at_dead_destination_is_lost() {
        let (mut entities, mut pulses, a, b) = setup(10.0);
        pulses.send(&mut entities, a, b, 0.2, 0).unwrap();
        entities.consume(b, 10.0, 0).unwrap();

        let mut outcomes = Vec::new();
        for tick in 1..=20 {
            outcomes.extend(pulses.advance(&mut entities, 1.0, tick));
        }

        assert!(pulses.is_empty());
        assert!(matches!(outcomes[0], PulseOutcome::Lost { .. }));
        assert_eq!(entities.find_any(b).unwrap().energy, 0.0);
    }

    #[test]
    fn test_zero_distance_arrives_immediately() {
        let (mut entities, mut pulses, a, b) = setup(0.0);
        pulses.send(&mut entities, a, b, 0.2, 0).unwrap();
        let outcomes = pulses.advance(&mut entities, 1.0, 1);
        assert_eq!(outcomes.len(), 1);
        assert!(pulses.is_empty());
    }

    #[test]
    fn test_connects_either_direction() {
        let (mut entities, mut pulses, a, b) = setup(50.0);
        pulses.send(&mut entities, a, b, 0.2, 0).unwrap();
        assert!(pulses.connects(a, b));
        assert!(pulses.connects(b, a));
        assert!(!pulses.connects(a, UnitId(77)));
    }

    #[test]
    fn test_total_energy_without_pulses_is_positive_zero() {
        let pulses = PulseStore::new(&UniverseConfig::default());
        assert!(pulses.total_energy().is_sign_positive());
        assert_eq!(format!("{:.2}", pulses.total_energy()), "0.00");
    }
}
