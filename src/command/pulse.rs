//! Pulse commands

use crate::command::args::parse_unit_id;
use crate::command::{CommandHandler, ParsedCommand, Response};
use crate::universe::Universe;

const USAGE: &str = "Uso: enviar pulso <origem> <destino>";

pub struct PulseCommands;

impl CommandHandler for PulseCommands {
    fn name(&self) -> &'static str {
        "pulse"
    }

    fn try_handle(&self, command: &ParsedCommand, universe: &mut Universe) -> Option<Response> {
        if command.is(&["listar", "pulsos"]) {
            return Some(list_pulses(universe));
        }
        if command.starts_with(&["enviar", "pulso"]) {
            return Some(send_pulse(command, universe));
        }
        None
    }
}

fn list_pulses(universe: &Universe) -> Response {
    let pulses = universe.pulses.pulses();
    if pulses.is_empty() {
        return Response::line("Nenhum pulso ativo no universo");
    }

    Response::Lines(
        pulses
            .iter()
            .enumerate()
            .map(|(i, pulse)| {
                format!(
                    "Pulso {} | Origem: {} → Destino: {} | Energia: {:.2} | Progresso: {}%",
                    i + 1,
                    pulse.origin,
                    pulse.destination,
                    pulse.energy_payload,
                    pulse.percent()
                )
            })
            .collect(),
    )
}

fn send_pulse(command: &ParsedCommand, universe: &mut Universe) -> Response {
    if command.len() != 4 {
        return Response::line(USAGE);
    }
    let ids = command
        .token(2)
        .and_then(parse_unit_id)
        .zip(command.token(3).and_then(parse_unit_id));
    let Some((origin, destination)) = ids else {
        return Response::line(USAGE);
    };

    match universe.send_pulse(origin, destination) {
        Ok(_) => Response::line(format!("Pulso {} → {}", origin, destination)),
        Err(e) => Response::line(format!("Falha ao enviar pulso: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(universe: &mut Universe, line: &str) -> Vec<String> {
        PulseCommands
            .try_handle(&ParsedCommand::parse(line), universe)
            .expect("pulse command")
            .lines()
            .to_vec()
    }

    #[test]
    fn test_send_and_list() {
        let mut universe = Universe::seeded(1);
        universe.create_unit();
        universe.create_unit();

        assert_eq!(run(&mut universe, "listar pulsos"), vec!["Nenhum pulso ativo no universo"]);
        assert_eq!(run(&mut universe, "enviar pulso 1 2"), vec!["Pulso 1 → 2"]);

        let listed = run(&mut universe, "listar pulsos");
        // 0.2 debited, payload is a tenth of the 9.8 left
        assert_eq!(listed, vec!["Pulso 1 | Origem: 1 → Destino: 2 | Energia: 0.98 | Progresso: 0%"]);
    }

    #[test]
    fn test_usage_on_bad_arguments() {
        let mut universe = Universe::seeded(2);
        assert_eq!(run(&mut universe, "enviar pulso 1"), vec![USAGE]);
        assert_eq!(run(&mut universe, "enviar pulso a b"), vec![USAGE]);
        assert_eq!(run(&mut universe, "enviar pulso 1 2 3"), vec![USAGE]);
    }

    #[test]
    fn test_failures_name_the_reason() {
        let mut universe = Universe::seeded(3);
        universe.create_unit();

        let missing = run(&mut universe, "enviar pulso 1 5");
        assert_eq!(missing, vec!["Falha ao enviar pulso: dado 5 não encontrado"]);

        let to_self = run(&mut universe, "enviar pulso 1 1");
        assert!(to_self[0].starts_with("Falha ao enviar pulso: "));
        assert!(universe.pulses.is_empty());
    }

    #[test]
    fn test_unrelated_commands_are_ignored() {
        let mut universe = Universe::seeded(4);
        assert!(PulseCommands
            .try_handle(&ParsedCommand::parse("listar dados"), &mut universe)
            .is_none());
    }
}
