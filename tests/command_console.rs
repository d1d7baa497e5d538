//! Console behaviour through a full session: commands, persistence and output

use std::path::PathBuf;

use dado_universe::command::{CommandHandler, CommandRouter, ParsedCommand, Response};
use dado_universe::core::config::{LoadMode, StorageConfig, UniverseConfig};
use dado_universe::core::error::UniverseError;
use dado_universe::core::types::UnitId;
use dado_universe::entity::Unit;
use dado_universe::persistence::SnapshotStore;
use dado_universe::runtime::Session;
use dado_universe::universe::Universe;

fn scratch_config(name: &str) -> (UniverseConfig, PathBuf) {
    let dir = std::env::temp_dir().join(format!("dado-console-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let mut config = UniverseConfig::default();
    config.runtime.seed = Some(42);
    config.storage = StorageConfig::in_dir(&dir);
    (config, dir)
}

/// Extra command family registered from outside the crate
struct Census;

impl CommandHandler for Census {
    fn name(&self) -> &'static str {
        "census"
    }

    fn try_handle(&self, command: &ParsedCommand, universe: &mut Universe) -> Option<Response> {
        if !command.is(&["censo"]) {
            return None;
        }
        Some(Response::line(format!(
            "{} vivos, {} mortos",
            universe.entities.live_count(),
            universe.entities.dead_count()
        )))
    }
}

#[test]
fn test_session_round_trip_of_a_short_game() {
    let (config, dir) = scratch_config("game");
    let mut session = Session::open(config.clone()).unwrap();

    assert_eq!(session.execute("c"), Response::line("Dado criado id=1"));
    assert_eq!(session.execute("c"), Response::line("Dado criado id=2"));
    assert_eq!(session.execute("duplicar dado 1"), Response::line("dado 1 duplicado como id=3"));
    for _ in 0..10 {
        session.execute("usar dado 2");
    }
    for _ in 0..30 {
        session.step();
    }
    session.flush().unwrap();

    let before: Vec<Unit> = session
        .universe()
        .entities
        .live()
        .iter()
        .chain(session.universe().entities.dead())
        .cloned()
        .collect();
    drop(session);

    let mut reopened = Session::open(config).unwrap();
    let universe = reopened.universe();
    assert_eq!(universe.entities.live_ids().len(), 2);
    assert_eq!(universe.entities.dead_count(), 1);
    assert_eq!(universe.entities.last_id(), 3);
    let after: Vec<&Unit> = universe.entities.live().iter().chain(universe.entities.dead()).collect();
    assert_eq!(after.len(), before.len());
    for (saved, loaded) in before.iter().zip(after) {
        assert_eq!(loaded.id, saved.id);
        assert_eq!(loaded.kind, saved.kind);
        assert_eq!(loaded.position, saved.position);
        assert!((loaded.energy - saved.energy).abs() < 1e-6);
        assert!((loaded.time_factor - saved.time_factor).abs() < 1e-6);
        assert!((loaded.proper_time - saved.proper_time).abs() < 1e-9);
        assert_eq!(loaded.memory.len(), saved.memory.len());
    }
    // pulses are not persisted
    assert!(universe.pulses.is_empty());

    assert_eq!(reopened.execute("c"), Response::line("Dado criado id=4"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_reset_is_persisted() {
    let (config, dir) = scratch_config("reset");
    let mut session = Session::open(config.clone()).unwrap();
    for _ in 0..5 {
        session.execute("c");
    }
    session.execute("reset universo");
    drop(session);

    let mut reopened = Session::open(config).unwrap();
    assert_eq!(reopened.universe().entities.live_count(), 0);
    assert_eq!(reopened.execute("c"), Response::line("Dado criado id=1"));
    let _ = std::fs::remove_dir_all(dir);
}

const REPEATED_IDS: &str = r#"{
    "last_id": 3,
    "units": [
        {"id": 3, "position": {"x": 50.0, "y": 60.0}, "kind": "Storage", "energy": 4.0, "time_factor": 0.7, "proper_time": 1.0},
        {"id": 3, "position": {"x": 80.0, "y": 90.0}, "kind": "Power", "energy": 6.0, "time_factor": 0.6, "proper_time": 2.0}
    ]
}"#;

const DEAD_TWO: &str = r#"[
    {"id": 2, "position": {"x": 10.0, "y": 10.0}, "kind": "Memory", "energy": 0.0, "time_factor": 1.0, "proper_time": 5.0}
]"#;

fn write_snapshots(config: &UniverseConfig, live: &str, dead: &str) {
    std::fs::create_dir_all(config.storage.data_dir()).unwrap();
    std::fs::write(&config.storage.universe_path, live).unwrap();
    std::fs::write(&config.storage.dead_path, dead).unwrap();
}

#[test]
fn test_repeated_ids_refuse_strict_open() {
    let (config, dir) = scratch_config("repeated-strict");
    write_snapshots(&config, REPEATED_IDS, DEAD_TWO);

    let result = Session::open(config);
    assert!(matches!(result, Err(UniverseError::Persistence { .. })));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_repeated_ids_dropped_on_lenient_open() {
    let (mut config, dir) = scratch_config("repeated-lenient");
    config.storage.load_mode = LoadMode::Lenient;
    write_snapshots(&config, REPEATED_IDS, DEAD_TWO);

    let mut session = Session::open(config).unwrap();
    assert_eq!(session.universe().entities.live_ids().len(), 1);
    assert_eq!(session.universe().entities.find_live(UnitId(3)).unwrap().energy, 4.0);

    for _ in 0..4 {
        session.execute("usar dado 3");
    }
    let entities = &session.universe().entities;
    assert_eq!(entities.live_count(), 0);
    let dead: Vec<u64> = entities.dead().iter().map(|u| u.id.0).collect();
    assert_eq!(dead, vec![2, 3]);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_unwritable_storage_is_reported() {
    let (mut config, dir) = scratch_config("unwritable");
    std::fs::create_dir_all(&dir).unwrap();
    // a regular file where the snapshot directory should be
    let blocker = dir.join("blocker");
    std::fs::write(&blocker, "x").unwrap();
    config.storage = StorageConfig::in_dir(&blocker.join("data"));

    let snapshots = SnapshotStore::new(&config.storage);
    let mut session = Session::from_parts(Universe::new(config), CommandRouter::standard(), Some(snapshots));
    let response = session.execute("c");
    assert_eq!(response.lines()[0], "Dado criado id=1");
    assert!(response.lines()[1].starts_with("Falha ao salvar universo: "));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_custom_handler_is_consulted_after_standard_ones() {
    let mut session = Session::in_memory(UniverseConfig::default());
    session.router_mut().register(Box::new(Census));

    session.execute("c");
    assert_eq!(session.execute("censo"), Response::line("1 vivos, 0 mortos"));
    assert_eq!(session.execute("CENSO"), Response::line("1 vivos, 0 mortos"));
}

#[test]
fn test_every_help_entry_is_understood() {
    let mut session = Session::in_memory(UniverseConfig::default());
    session.execute("c");
    session.execute("c");

    let help = session.execute("help");
    for entry in &help.lines()[1..] {
        let line = entry
            .replace("<id>", "1")
            .replace("<origem> <destino>", "1 2")
            .replace("<valor>", "1")
            .replace("<comando>", "c");
        let response = session.execute(&line);
        assert!(
            !response.lines().iter().any(|l| l.starts_with("Comando inválido")),
            "{} was rejected",
            line
        );
    }
}
