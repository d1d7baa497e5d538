//! Console state: the log, the line being typed and the command history

use std::collections::VecDeque;

use crate::command::Response;
use crate::core::types::Tick;
use crate::pulse::PulseOutcome;
use crate::simulation::tick::{TickReport, UniverseEvent};

/// Maximum log entries to keep
const MAX_LOG_ENTRIES: usize = 500;

/// Maximum remembered commands
const MAX_HISTORY: usize = 100;

/// Which view fills the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// The canvas, with the last few log lines underneath
    #[default]
    Visual,
    /// The full console log
    Terminal,
}

/// An entry in the console log
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub tick: Tick,
    pub message: String,
    pub category: LogCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    /// A line the user typed
    Command,
    Response,
    /// Something the universe did on its own
    Event,
    System,
}

#[derive(Debug, Default)]
pub struct ConsoleState {
    pub log: VecDeque<LogEntry>,
    pub input: String,
    pub screen: Screen,
    history: Vec<String>,
    /// Position while browsing history with Up/Down; `None` when editing
    history_cursor: Option<usize>,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self {
            log: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            ..Self::default()
        }
    }

    /// Add an entry to the log
    pub fn log(&mut self, tick: Tick, message: impl Into<String>, category: LogCategory) {
        if self.log.len() >= MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry {
            tick,
            message: message.into(),
            category,
        });
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
        self.history_cursor = None;
    }

    pub fn backspace(&mut self) {
        self.input.pop();
        self.history_cursor = None;
    }

    /// Take the typed line, remembering it in the history
    ///
    /// Returns `None` for a blank line.
    pub fn submit(&mut self) -> Option<String> {
        let line = std::mem::take(&mut self.input);
        self.history_cursor = None;
        let line = line.trim().to_string();
        if line.is_empty() {
            return None;
        }

        if self.history.last() != Some(&line) {
            if self.history.len() >= MAX_HISTORY {
                self.history.remove(0);
            }
            self.history.push(line.clone());
        }
        Some(line)
    }

    /// Step back through the history (Up)
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.history_cursor {
            Some(0) => 0,
            Some(i) => i - 1,
            None => self.history.len() - 1,
        };
        self.history_cursor = Some(index);
        self.input = self.history[index].clone();
    }

    /// Step forward through the history (Down); past the newest clears the line
    pub fn history_next(&mut self) {
        let Some(index) = self.history_cursor else {
            return;
        };
        if index + 1 < self.history.len() {
            self.history_cursor = Some(index + 1);
            self.input = self.history[index + 1].clone();
        } else {
            self.history_cursor = None;
            self.input.clear();
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Visual => Screen::Terminal,
            Screen::Terminal => Screen::Visual,
        };
    }

    /// Show the outcome of a command
    pub fn apply_response(&mut self, tick: Tick, command: &str, response: &Response) {
        match response {
            Response::Clear => self.clear_log(),
            Response::Lines(lines) => {
                self.log(tick, format!("> {}", command), LogCategory::Command);
                for line in lines {
                    self.log(tick, line.clone(), LogCategory::Response);
                }
            }
        }
    }

    /// Log what the universe did on its own during a tick
    ///
    /// Proximity pulses and deliveries happen every few ticks and are left
    /// to `listar pulsos`; only retirements and lost pulses are logged.
    pub fn log_report(&mut self, report: &TickReport) {
        for event in &report.events {
            let message = match event {
                UniverseEvent::UnitRetired { unit } => format!("dado {} esgotado e removido", unit),
                UniverseEvent::PulseArrived(PulseOutcome::Lost { pulse, destination, .. }) => {
                    format!("pulso {} perdido: dado {} não existe mais", pulse, destination)
                }
                _ => continue,
            };
            self.log(report.tick, message, LogCategory::Event);
        }
    }

    /// The newest `count` entries, oldest first
    pub fn tail(&self, count: usize) -> impl Iterator<Item = &LogEntry> {
        self.log.iter().skip(self.log.len().saturating_sub(count))
    }
}
