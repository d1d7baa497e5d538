//! Time scale command
//!
//! Accepted spellings: `tempo: 2`, `tempo 2`, `tempo:2`. A bare `tempo`
//! reports the current scale.

use crate::command::args::parse_scale;
use crate::command::{CommandHandler, ParsedCommand, Response};
use crate::universe::Universe;

const INVALID: &str = "Valor inválido para tempo";

pub struct TimeCommands;

impl CommandHandler for TimeCommands {
    fn name(&self) -> &'static str {
        "time"
    }

    fn try_handle(&self, command: &ParsedCommand, universe: &mut Universe) -> Option<Response> {
        let first = command.token(0)?;

        let value = match (first, command.len()) {
            ("tempo", 1) => {
                return Some(Response::line(format!(
                    "Escala de tempo atual: {:.2}",
                    universe.clock.time_scale()
                )))
            }
            ("tempo" | "tempo:", 2) => command.token(1)?,
            (_, 1) if first.starts_with("tempo:") => &first["tempo:".len()..],
            ("tempo" | "tempo:", _) => return Some(Response::line(INVALID)),
            _ => return None,
        };

        let Some(scale) = parse_scale(value) else {
            return Some(Response::line(INVALID));
        };
        match universe.clock.set_time_scale(scale) {
            Ok(()) => {
                tracing::info!(scale, "time scale changed");
                Some(Response::line(format!("Escala de tempo ajustada para {:.2}", scale)))
            }
            Err(_) => Some(Response::line(INVALID)),
        }
    }
}
