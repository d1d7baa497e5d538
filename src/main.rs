//! Dado Universe - interactive console
//!
//! Runs the universe at a fixed tick rate in the terminal.
//! Controls:
//!   Enter: run the typed command
//!   Up/Down: command history
//!   Tab / Escape: switch between canvas and full console
//!   Ctrl+C: save and quit

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use dado_universe::core::config::{LoadMode, UniverseConfig};
use dado_universe::core::error::Result;
use dado_universe::runtime::Session;
use dado_universe::ui::{self, ConsoleState, LogCategory, Scene, UiAction};

/// Interactive universe console
#[derive(Parser, Debug)]
#[command(name = "dado-universe")]
#[command(about = "Run the universe of dados with a command console")]
struct Args {
    /// TOML configuration file (defaults are used when it does not exist)
    #[arg(long, default_value = "data/universe.toml")]
    config: PathBuf,

    /// Directory for the snapshot files and the log, overriding the
    /// configured storage paths
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Start empty instead of failing when a snapshot file is malformed
    #[arg(long)]
    lenient: bool,
}

type Backend = CrosstermBackend<io::Stdout>;

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = UniverseConfig::load_if_exists(&args.config)?;
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir);
    }
    if args.seed.is_some() {
        config.runtime.seed = args.seed;
    }
    if args.lenient {
        config.storage.load_mode = LoadMode::Lenient;
    }

    let log_dir = config.storage.data_dir();
    fs::create_dir_all(log_dir)?;
    let log_file = File::create(log_dir.join("universe.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dado_universe=info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();

    let tick_interval = Duration::from_secs_f64(1.0 / f64::from(config.runtime.ticks_per_second));
    let mut session = Session::open(config)?;
    tracing::info!("Dado Universe starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let outcome = run(&mut terminal, &mut session, tick_interval);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = session.flush() {
        tracing::error!(error = %e, "final save failed");
        eprintln!("Falha ao salvar universo: {}", e);
    }
    tracing::info!(tick = session.universe().tick(), "Dado Universe stopped");
    outcome
}

fn run(terminal: &mut Terminal<Backend>, session: &mut Session, tick_interval: Duration) -> Result<()> {
    let mut console = ConsoleState::new();
    let mut scene = Scene::new();
    console.log(0, "Digite help para ver os comandos", LogCategory::System);

    let mut next_tick = Instant::now() + tick_interval;
    loop {
        terminal.draw(|f| ui::draw(f, &console, session.universe(), &mut scene))?;

        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match ui::handle_key(&mut console, key) {
                    UiAction::Submit(line) => {
                        let response = session.execute(&line);
                        console.apply_response(session.universe().tick(), &line, &response);
                    }
                    UiAction::Quit => return Ok(()),
                    UiAction::None => {}
                }
            }
        }

        let now = Instant::now();
        if now >= next_tick {
            let report = session.step();
            console.log_report(&report);
            next_tick += tick_interval;
            // Fell far behind (terminal stalled); resume from now instead of bursting
            if next_tick + tick_interval * 4 < now {
                next_tick = now + tick_interval;
            }
        }
    }
}
