pub mod clock;
pub mod dilation;
pub mod proximity;
pub mod tick;

pub use clock::TimeControl;
pub use dilation::{apply_decay_and_dilation, time_factor};
pub use proximity::spawn_proximity_pulses;
pub use tick::{evolve, run_evolution_step, TickReport, UniverseEvent};
