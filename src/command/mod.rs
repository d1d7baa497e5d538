//! Console command dispatch
//!
//! A line typed on the console becomes a `ParsedCommand` and is offered to
//! each registered handler in priority order. The first handler that
//! recognises it answers; anything nobody claims is rejected.

pub mod args;
pub mod data;
pub mod pulse;
pub mod system;
pub mod time;

use crate::universe::Universe;

pub use data::DataCommands;
pub use pulse::PulseCommands;
pub use system::SystemCommands;
pub use time::TimeCommands;

/// A console line, trimmed, lower-cased and split on whitespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    raw: String,
    tokens: Vec<String>,
}

impl ParsedCommand {
    pub fn parse(line: &str) -> Self {
        let raw = line.trim().to_lowercase();
        let tokens = raw.split_whitespace().map(str::to_string).collect();
        Self { raw, tokens }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Exactly these words, nothing more
    pub fn is(&self, words: &[&str]) -> bool {
        self.tokens.len() == words.len() && self.starts_with(words)
    }

    pub fn starts_with(&self, words: &[&str]) -> bool {
        self.tokens.len() >= words.len() && self.tokens.iter().zip(words).all(|(t, w)| t == w)
    }
}

/// What the console shows after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Lines(Vec<String>),
    /// Wipe the console log
    Clear,
}

impl Response {
    pub fn line(text: impl Into<String>) -> Self {
        Response::Lines(vec![text.into()])
    }

    /// Lines to print; empty for `Clear`
    pub fn lines(&self) -> &[String] {
        match self {
            Response::Lines(lines) => lines,
            Response::Clear => &[],
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        match self {
            Response::Lines(lines) => lines.push(text.into()),
            Response::Clear => *self = Response::line(text),
        }
    }
}

/// One family of console commands
pub trait CommandHandler {
    fn name(&self) -> &'static str;

    /// `None` if the command does not belong to this family
    fn try_handle(&self, command: &ParsedCommand, universe: &mut Universe) -> Option<Response>;
}

/// Ordered list of handlers with an "invalid command" fallback
pub struct CommandRouter {
    handlers: Vec<Box<dyn CommandHandler>>,
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandRouter {
    /// Router with no handlers; every command is rejected
    pub fn empty() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Data, pulse, system and time commands, in that priority
    pub fn standard() -> Self {
        let mut router = Self::empty();
        router.register(Box::new(DataCommands));
        router.register(Box::new(PulseCommands));
        router.register(Box::new(SystemCommands));
        router.register(Box::new(TimeCommands));
        router
    }

    /// Append a handler at the lowest priority
    pub fn register(&mut self, handler: Box<dyn CommandHandler>) {
        tracing::debug!(handler = handler.name(), "command handler registered");
        self.handlers.push(handler);
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn dispatch(&self, line: &str, universe: &mut Universe) -> Response {
        let command = ParsedCommand::parse(line);
        if command.is_empty() {
            return Response::Lines(Vec::new());
        }

        for handler in &self.handlers {
            if let Some(response) = handler.try_handle(&command, universe) {
                tracing::debug!(handler = handler.name(), command = command.raw(), "command handled");
                return response;
            }
        }

        tracing::debug!(command = command.raw(), "command rejected");
        Response::line(format!("Comando inválido: {}", command.raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl CommandHandler for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn try_handle(&self, command: &ParsedCommand, _universe: &mut Universe) -> Option<Response> {
            if command.token(0) == Some("echo") {
                Some(Response::line(command.tokens()[1..].join(" ")))
            } else {
                None
            }
        }
    }

    #[test]
    fn test_parse_normalises_case_and_whitespace() {
        let command = ParsedCommand::parse("  Usar   DADO 3 ");
        assert_eq!(command.raw(), "usar   dado 3");
        assert_eq!(command.tokens(), &["usar", "dado", "3"]);
        assert!(command.starts_with(&["usar", "dado"]));
        assert!(!command.is(&["usar", "dado"]));
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let mut universe = Universe::seeded(1);
        let router = CommandRouter::standard();
        let response = router.dispatch("voar alto", &mut universe);
        assert_eq!(response, Response::line("Comando inválido: voar alto"));
    }

    #[test]
    fn test_empty_line_is_silent() {
        let mut universe = Universe::seeded(1);
        let router = CommandRouter::standard();
        assert_eq!(router.dispatch("   ", &mut universe), Response::Lines(Vec::new()));
    }

    #[test]
    fn test_registered_handler_extends_router() {
        let mut universe = Universe::seeded(1);
        let mut router = CommandRouter::standard();
        assert_eq!(router.dispatch("echo oi", &mut universe), Response::line("Comando inválido: echo oi"));

        router.register(Box::new(Echo));
        assert_eq!(router.dispatch("echo oi", &mut universe), Response::line("oi"));
        assert_eq!(router.handler_names(), vec!["data", "pulse", "system", "time", "echo"]);
    }

    #[test]
    fn test_earlier_handler_wins() {
        let mut universe = Universe::seeded(1);
        let router = CommandRouter::standard();
        // "c" belongs to the data family
        let response = router.dispatch("c", &mut universe);
        assert_eq!(response, Response::line("Dado criado id=1"));
    }

    #[test]
    fn test_push_onto_clear_becomes_lines() {
        let mut response = Response::Clear;
        response.push("falhou");
        assert_eq!(response.lines(), &["falhou".to_string()]);
    }
}
