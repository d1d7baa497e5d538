//! Unit commands: create, use, duplicate, inspect

use crate::command::args::parse_unit_id;
use crate::command::{CommandHandler, ParsedCommand, Response};
use crate::core::error::UniverseError;
use crate::entity::unit::Unit;
use crate::universe::Universe;

pub struct DataCommands;

impl CommandHandler for DataCommands {
    fn name(&self) -> &'static str {
        "data"
    }

    fn try_handle(&self, command: &ParsedCommand, universe: &mut Universe) -> Option<Response> {
        if command.is(&["c"]) {
            let id = universe.create_unit();
            return Some(Response::line(format!("Dado criado id={}", id)));
        }
        if command.is(&["energia", "total"]) {
            return Some(Response::line(format!(
                "Energia total do universo: {:.2}",
                universe.total_energy()
            )));
        }
        if command.is(&["listar", "dados"]) {
            return Some(list_live(universe));
        }
        if command.is(&["listar", "dados", "mortos"]) {
            return Some(list_dead(universe));
        }

        let action = command.token(0)?;
        if command.len() != 3 || command.token(1) != Some("dado") {
            return None;
        }
        let raw_id = command.token(2)?;

        let handler: fn(&mut Universe, &str) -> Response = match action {
            "usar" => use_unit,
            "duplicar" => duplicate_unit,
            "memoria" | "memória" => show_memory,
            _ => return None,
        };
        Some(handler(universe, raw_id))
    }
}

fn use_unit(universe: &mut Universe, raw_id: &str) -> Response {
    let Some(id) = parse_unit_id(raw_id) else {
        return Response::line("id inválido");
    };

    match universe.consume(id) {
        Ok(consumption) => {
            let mut lines = vec![format!("dado {} usado | energia = {:.2}", id, consumption.energy_after)];
            if consumption.retired {
                lines.push(format!("dado {} esgotado e removido", id));
            }
            Response::Lines(lines)
        }
        Err(UniverseError::NotFound(_)) => Response::line(format!("dado {} não existe", id)),
        Err(e) => Response::line(e.to_string()),
    }
}

fn duplicate_unit(universe: &mut Universe, raw_id: &str) -> Response {
    let Some(id) = parse_unit_id(raw_id) else {
        return Response::line("id inválido");
    };

    match universe.duplicate(id) {
        Ok(copy) => Response::line(format!("dado {} duplicado como id={}", id, copy)),
        Err(UniverseError::NotFound(_)) => Response::line(format!("Dado {} não encontrado", id)),
        Err(e) => Response::line(e.to_string()),
    }
}

fn show_memory(universe: &mut Universe, raw_id: &str) -> Response {
    let Some(id) = parse_unit_id(raw_id) else {
        return Response::line("id inválido");
    };
    let Some(unit) = universe.entities.find_any(id) else {
        return Response::line(format!("Dado {} não encontrado", id));
    };
    if unit.memory.is_empty() {
        return Response::line(format!("Dado {} tem memória vazia", id));
    }

    let mut lines = Vec::with_capacity(unit.memory.len() + 1);
    lines.push(format!("Memória do dado {}:", id));
    lines.extend(unit.memory.iter().map(|entry| entry.to_string()));
    Response::Lines(lines)
}

fn describe(unit: &Unit) -> String {
    format!(
        "Dado {} | Posição: ({:.0}, {:.0}) | Tipo: {} | Energia: {:.2} | Tempo próprio: {:.2} | Fator tempo: {:.3} | Memória: {} eventos",
        unit.id,
        unit.position.x,
        unit.position.y,
        unit.kind,
        unit.energy,
        unit.proper_time,
        unit.time_factor,
        unit.memory.len()
    )
}

fn list_live(universe: &Universe) -> Response {
    let live = universe.entities.live();
    if live.is_empty() {
        return Response::line("Nenhum dado presente no universo");
    }
    Response::Lines(live.iter().map(describe).collect())
}

fn list_dead(universe: &Universe) -> Response {
    let dead = universe.entities.dead();
    if dead.is_empty() {
        return Response::line("Não há dados mortos");
    }

    let mut lines = vec!["Dados mortos:".to_string()];
    lines.extend(
        dead.iter()
            .map(|unit| format!("id: {} | Tipo: {} | Tempo próprio: {:.2}", unit.id, unit.kind, unit.proper_time)),
    );
    Response::Lines(lines)
}
