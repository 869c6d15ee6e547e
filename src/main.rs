mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use topdown_shooter::compute::{
    fire_random, hud, init_state, press_direction, release_direction, tick, toggle_pause,
};
use topdown_shooter::config::GameConfig;
use topdown_shooter::entities::{Direction, FrameInput, GameState};
use topdown_shooter::logging;
use topdown_shooter::persistence::{JsonFileStore, KeyValueStore};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Longest step fed to the simulation, so a stalled terminal doesn't
/// teleport everything across the arena.
const MAX_DT: f32 = 0.1;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 4;

#[derive(Debug, Parser)]
#[command(about = "Top-down arena shooter in the terminal")]
struct Args {
    /// JSON file overriding tuning values and level templates.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the max score is kept. Defaults to ~/.topdown_shooter.json.
    #[arg(long)]
    save_file: Option<PathBuf>,

    /// Seed for level selection and random shots.
    #[arg(long)]
    seed: Option<u64>,

    /// Include debug records in the log.
    #[arg(short, long)]
    verbose: bool,

    /// Log file; the terminal itself is busy drawing the game.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn default_save_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".topdown_shooter.json")
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn direction_for(code: &KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Directional keys map onto the core's discrete press/release calls. On
/// terminals without release events, a held direction is released once its
/// key has been silent for `HOLD_WINDOW` frames.
fn game_loop<W: Write>(
    out: &mut W,
    mut state: GameState,
    store: &mut dyn KeyValueStore,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<GameState> {
    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    // Key that produced the currently held direction.
    let mut held_key: Option<KeyCode> = None;
    let mut frame: u64 = 0;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        while let Ok(Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        })) = rx.try_recv()
        {
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    let fresh = kind == KeyEventKind::Press && !key_frame.contains_key(&code);
                    key_frame.insert(code, frame);
                    if let Some(dir) = direction_for(&code) {
                        if held_key != Some(code) {
                            state = press_direction(&state, dir);
                            held_key = Some(code);
                        }
                        continue;
                    }
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(state);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(state);
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') if fresh => {
                            state = toggle_pause(&state);
                        }
                        KeyCode::Char('x') | KeyCode::Char('X')
                            if fresh && !hud(&state).paused =>
                        {
                            state = fire_random(&state, rng);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // Expire keys that stopped repeating, then drop a stale direction.
        key_frame.retain(|_, &mut last| frame.saturating_sub(last) <= HOLD_WINDOW);
        if let Some(code) = held_key {
            if !is_held(&key_frame, &code, frame) {
                if let Some(dir) = direction_for(&code) {
                    state = release_direction(&state, dir);
                }
                held_key = None;
            }
        }

        let input = FrameInput {
            fire_aimed: is_held(&key_frame, &KeyCode::Char(' '), frame),
            ..FrameInput::default()
        };
        let dt = last_frame.elapsed().as_secs_f32().min(MAX_DT);
        last_frame = Instant::now();
        state = tick(&state, &input, dt, store, rng);

        display::render(out, &state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("topdown_shooter.log"));
    logging::init(args.verbose, Some(&log_file))
        .with_context(|| format!("opening log file {}", log_file.display()))?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path).context("loading game config")?,
        None => GameConfig::default(),
    };
    let save_path = args.save_file.clone().unwrap_or_else(default_save_path);
    let mut store = JsonFileStore::open(&save_path).context("opening save file")?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let state = init_state(config, &store, &mut rng).context("invalid game config")?;
    info!("starting; max score {} from {}", state.max_score, save_path.display());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, state, &mut store, &mut rng, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    let state = result.context("terminal I/O failed")?;
    info!(
        "quit after {} restarts; score {}, max score {}",
        state.restarts, state.score, state.max_score
    );
    Ok(())
}
