//! Color definitions for unit kinds, energy levels and pulses

use crate::entity::unit::UnitKind;

/// RGBA color (0.0 to 1.0 per channel)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Darken color by a factor (0.0 = black, 1.0 = unchanged)
    pub fn darken(&self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }

    /// 8-bit channels for terminal backends
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }
}

/// Canvas background
pub const BACKGROUND: Color = Color::new(30.0 / 255.0, 30.0 / 255.0, 30.0 / 255.0, 1.0);

/// Units never fade completely out of sight
const MIN_BRIGHTNESS: f32 = 0.25;

pub fn kind_color(kind: UnitKind) -> Color {
    match kind {
        UnitKind::Memory => Color::new(1.0, 0.0, 0.0, 1.0),    // Red
        UnitKind::Processor => Color::new(0.0, 1.0, 0.0, 1.0), // Green
        UnitKind::Storage => Color::new(0.0, 0.0, 1.0, 1.0),   // Blue
        UnitKind::Power => Color::new(1.0, 1.0, 0.0, 1.0),     // Yellow
        UnitKind::Network => Color::new(0.5, 0.0, 0.5, 1.0),   // Purple
    }
}

/// Kind color dimmed in proportion to the energy left
pub fn energy_shade(base: Color, energy: f32, max_energy: f32) -> Color {
    let level = if max_energy > 0.0 { energy / max_energy } else { 0.0 };
    base.darken(MIN_BRIGHTNESS + (1.0 - MIN_BRIGHTNESS) * level.clamp(0.0, 1.0))
}

/// Pulses shift from blue (weak) to red (one unit of energy or more)
pub fn pulse_color(payload: f32) -> Color {
    let level = payload.clamp(0.0, 1.0);
    Color::new(level, 50.0 / 255.0, 1.0 - level, 1.0)
}

/// Drawn radius of a unit; grows with energy, never below 2
pub fn unit_radius(energy: f32) -> f32 {
    energy.max(2.0)
}
