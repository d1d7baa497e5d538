//! Universe time control - time scale and pause

use crate::core::error::{Result, UniverseError};

/// Global time scale and pause flag
///
/// Pausing does not stop the tick loop; it makes the effective scale zero so
/// every decay and accumulation term in a tick becomes a no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeControl {
    time_scale: f32,
    paused: bool,
}

impl TimeControl {
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale,
            paused: false,
        }
    }

    /// Scale applied to this tick: zero while paused
    pub fn effective_scale(&self) -> f32 {
        if self.paused {
            0.0
        } else {
            self.time_scale
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Flip the pause flag, returning the new state
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Set the configured multiplier; must be finite and non-negative
    pub fn set_time_scale(&mut self, scale: f32) -> Result<()> {
        if !scale.is_finite() || scale < 0.0 {
            return Err(UniverseError::InvalidArgument(format!(
                "escala de tempo inválida: {}",
                scale
            )));
        }
        self.time_scale = scale;
        Ok(())
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(1.0)
    }
}
