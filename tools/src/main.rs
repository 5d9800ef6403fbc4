//! geocoin-runner: headless driver for the GeoCoin Collector core.
//!
//! Usage:
//!   geocoin-runner --db geocoin.db --steps 20
//!   geocoin-runner --db geocoin.db --ipc-mode

use anyhow::Result;
use geocoin_core::{
    cache::Token,
    config::GameConfig,
    error::GameResult,
    event::GameEvent,
    geo::LatLng,
    session::{Direction, GameSession},
    store::SqliteKv,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Move { direction: Direction },
    MoveTo { lat: f64, lng: f64 },
    Withdraw { i: i32, j: i32 },
    Deposit { i: i32, j: i32 },
    Reset,
    Quit,
}

#[derive(serde::Serialize)]
struct CacheView {
    i: i32,
    j: i32,
    tokens: Vec<Token>,
}

#[derive(serde::Serialize)]
struct UiState {
    position: LatLng,
    cell: (i32, i32),
    inventory: Vec<Token>,
    caches: Vec<CacheView>,
    events: Vec<GameEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let steps = parse_arg(&args, "--steps", 10u32);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    let config = GameConfig::load(data_dir).unwrap_or_else(|e| {
        log::warn!("{e}; falling back to built-in configuration");
        GameConfig::default_test()
    });

    if !ipc_mode {
        println!("GeoCoin Collector: runner");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!("  steps:     {steps}");
        println!();
    }

    let kv = if db == ":memory:" {
        SqliteKv::in_memory()?
    } else {
        SqliteKv::open(db)?
    };
    kv.migrate()?;

    let mut session = GameSession::start(kv, config)?;

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else {
        walk(&mut session, steps)?;
        print_summary(&session);
    }

    Ok(())
}

fn run_ipc_loop(session: &mut GameSession<SqliteKv>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let events = match cmd {
            IpcCommand::Quit => break,
            cmd => match apply(session, cmd) {
                Ok(events) => events,
                Err(e) => {
                    log::warn!("command failed: {e}");
                    let err_json = serde_json::json!({ "error": e.to_string() });
                    writeln!(stdout, "{}", err_json)?;
                    stdout.flush()?;
                    continue;
                }
            },
        };

        let state = build_ui_state(session, events);
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn apply(session: &mut GameSession<SqliteKv>, cmd: IpcCommand) -> GameResult<Vec<GameEvent>> {
    Ok(match cmd {
        IpcCommand::GetState | IpcCommand::Quit => Vec::new(),
        IpcCommand::Move { direction } => session.step(direction)?,
        IpcCommand::MoveTo { lat, lng } => session.move_player(LatLng::new(lat, lng))?,
        IpcCommand::Withdraw { i, j } => {
            if session.withdraw_from(i, j)?.is_none() {
                log::debug!("withdraw at {i},{j}: nothing to take");
            }
            Vec::new()
        }
        IpcCommand::Deposit { i, j } => {
            if session.deposit_into(i, j)?.is_none() {
                log::debug!("deposit at {i},{j}: nothing to give");
            }
            Vec::new()
        }
        IpcCommand::Reset => session.reset()?,
    })
}

/// Walk north, emptying every cache within reach into the inventory.
fn walk(session: &mut GameSession<SqliteKv>, steps: u32) -> Result<()> {
    for _ in 0..steps {
        session.step(Direction::North)?;
        let cell = session.player_cell();
        while session.withdraw_from(cell.i, cell.j)?.is_some() {}
    }
    Ok(())
}

fn build_ui_state(session: &GameSession<SqliteKv>, events: Vec<GameEvent>) -> UiState {
    let cell = session.player_cell();
    UiState {
        position: session.position(),
        cell: (cell.i, cell.j),
        inventory: session.inventory().tokens().to_vec(),
        caches: session
            .visible_caches()
            .map(|c| CacheView {
                i: c.cell.i,
                j: c.cell.j,
                tokens: c.tokens.clone(),
            })
            .collect(),
        events,
    }
}

fn print_summary(session: &GameSession<SqliteKv>) {
    let cell = session.player_cell();
    let position = session.position();
    let caches: Vec<_> = session.visible_caches().collect();
    let cached_tokens: usize = caches.iter().map(|c| c.len()).sum();

    println!("=== SESSION SUMMARY ===");
    println!("  position:       ({:.6}, {:.6})", position.lat, position.lng);
    println!("  cell:           {cell}");
    println!("  known cells:    {}", session.board().known_cell_count());
    println!("  visible caches: {}", caches.len());
    println!("  tokens nearby:  {cached_tokens}");
    println!("  inventory:      {}", session.inventory().len());

    if !session.inventory().is_empty() {
        println!();
        println!("=== INVENTORY (most recent first) ===");
        for token in session.inventory().tokens().iter().rev().take(10) {
            println!("  {token}");
        }
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
