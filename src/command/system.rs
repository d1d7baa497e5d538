//! Console and universe-wide commands: help, pause, status, clear, reset

use crate::command::{CommandHandler, ParsedCommand, Response};
use crate::universe::Universe;

/// Command syntax and what it does, shown by `help`
const HELP: &[(&str, &str)] = &[
    ("c", "cria um novo dado no universo"),
    ("listar dados", "lista todos os dados ativos"),
    ("listar dados mortos", "lista dados sem energia"),
    ("listar pulsos", "mostra todos os pulsos existentes"),
    ("usar dado <id>", "consome 1 unidade de energia do dado"),
    ("duplicar dado <id>", "cria uma cópia do dado"),
    ("memoria dado <id>", "mostra os eventos lembrados pelo dado"),
    ("enviar pulso <origem> <destino>", "envia energia entre dados"),
    ("energia total", "mostra a energia total do universo"),
    ("status universo", "mostra o estado geral do universo"),
    ("tempo <valor>", "ajusta a escala temporal do universo"),
    ("pause", "pausa o universo; executar de novo retoma a evolução"),
    ("clear", "limpa o terminal"),
    ("reset universo", "apaga todos os dados e pulsos"),
    ("help <comando>", "mostra a ajuda de um comando"),
];

pub struct SystemCommands;

impl CommandHandler for SystemCommands {
    fn name(&self) -> &'static str {
        "system"
    }

    fn try_handle(&self, command: &ParsedCommand, universe: &mut Universe) -> Option<Response> {
        if command.token(0) == Some("help") {
            return Some(help(&command.tokens()[1..]));
        }
        if command.is(&["pause"]) {
            let paused = universe.clock.toggle_pause();
            tracing::info!(paused, "pause toggled");
            return Some(Response::line(if paused {
                "Universo pausado"
            } else {
                "Universo retomado"
            }));
        }
        if command.is(&["status"]) || command.is(&["status", "universo"]) {
            return Some(status(universe));
        }
        if command.is(&["clear"]) {
            return Some(Response::Clear);
        }
        if command.is(&["reset", "universo"]) {
            universe.reset();
            return Some(Response::line(
                "Universo reiniciado: todos os dados foram apagados, IDs resetados",
            ));
        }
        None
    }
}

fn help(topic: &[String]) -> Response {
    if topic.is_empty() {
        let mut lines = vec!["comandos disponíveis:".to_string()];
        lines.extend(HELP.iter().map(|(syntax, _)| syntax.to_string()));
        return Response::Lines(lines);
    }

    let term = topic.join(" ");
    let found: Vec<String> = HELP
        .iter()
        .filter(|(syntax, _)| syntax.starts_with(&term))
        .map(|(syntax, text)| format!("{} → {}", syntax, text))
        .collect();

    if found.is_empty() {
        Response::line(format!("Nenhuma ajuda encontrada para: {}", term))
    } else {
        Response::Lines(found)
    }
}

fn status(universe: &Universe) -> Response {
    let s = universe.status();
    Response::Lines(vec![
        format!("Universo | tick {}", s.tick),
        format!("Dados vivos: {}", s.live_units),
        format!("Dados mortos: {}", s.dead_units),
        format!("Pulsos ativos: {}", s.pulses),
        format!(
            "Energia total: {:.2} (dados {:.2} + pulsos {:.2})",
            s.total_energy, s.unit_energy, s.pulse_energy
        ),
        format!("Escala de tempo: {:.2}", s.time_scale),
        format!("Pausado: {}", if s.paused { "sim" } else { "não" }),
        format!("Último id: {}", s.last_id),
    ])
}
