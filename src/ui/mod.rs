//! UI module - ratatui console over a crossterm terminal

pub mod input;
pub mod state;
pub mod terminal;

pub use input::{handle_key, UiAction};
pub use state::{ConsoleState, LogCategory, LogEntry, Screen};
pub use terminal::{draw, Scene};
