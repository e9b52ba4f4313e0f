//! Terminal runner (default binary).
//!
//! Polls crossterm for keys until the next frame, feeds actions and elapsed
//! time to the game, persists the best score and redraws through the
//! framebuffer renderer.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

use blockfall::core::{GameConfig, GameEvent, GameSnapshot, GameState, Randomizer};
use blockfall::input::{map_key, should_quit, KeyRepeat};
use blockfall::store::{
    load_best_or_default, save_best_logged, JsonScoreStore, MemoryScoreStore, ScoreStore,
    GAME_KEY,
};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

#[derive(Debug, Parser)]
#[command(name = "blockfall", version, about = "Falling-block puzzle game for the terminal")]
struct Cli {
    #[arg(long, help = "Seed for the piece randomizer (default: clock)")]
    seed: Option<u32>,

    #[arg(long, help = "Use the 7-bag randomizer instead of uniform draws")]
    bag: bool,

    #[arg(long, help = "Path to a JSON game config")]
    config: Option<PathBuf>,

    #[arg(long, help = "Path to the best-score file")]
    scores: Option<PathBuf>,

    #[arg(long, help = "Keep the best score in memory only")]
    no_persist: bool,

    #[arg(long, help = "Write logs to this file (logs are off otherwise)")]
    log_file: Option<PathBuf>,

    #[arg(short = 'v', long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v = DEBUG, -vv = TRACE)")]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = load_config(&cli)?;
    let mut store = open_store(&cli);
    let best = load_best_or_default(store.as_ref(), GAME_KEY);
    info!(seed = config.seed, randomizer = ?config.randomizer, best, "starting");

    let mut term = TerminalRenderer::new();
    term.enter()?;
    install_panic_restore();

    let mut game = GameState::new(config).with_best_score(best);
    let mut saved_best = best;
    let result = run(&mut term, &mut game, store.as_mut(), &mut saved_best);

    // Always try to restore terminal state.
    let _ = term.exit();

    // Records are saved as they happen; this catches events never drained.
    if game.best_score() > saved_best {
        save_best_logged(store.as_mut(), GAME_KEY, game.best_score());
    }
    info!(best = game.best_score(), "exiting");
    result
}

/// The terminal belongs to the renderer, so logs only ever go to a file.
fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("create log file {}", path.display()))?;

    let level = match cli.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(level)
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            GameConfig::from_json(&text)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => GameConfig::default().with_seed(clock_seed()),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if cli.bag {
        config = config.with_randomizer(Randomizer::SevenBag);
    }
    Ok(config)
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(1)
}

fn open_store(cli: &Cli) -> Box<dyn ScoreStore> {
    if cli.no_persist {
        return Box::new(MemoryScoreStore::new());
    }
    let store = match &cli.scores {
        Some(path) => JsonScoreStore::new(path),
        None => JsonScoreStore::from_env(),
    };
    debug!(path = %store.path().display(), "score file");
    Box::new(store)
}

/// Leave raw mode before the panic message is printed.
fn install_panic_restore() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::event::PopKeyboardEnhancementFlags,
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );
        default_hook(info);
    }));
}

fn run(
    term: &mut TerminalRenderer,
    game: &mut GameState,
    store: &mut dyn ScoreStore,
    saved_best: &mut u32,
) -> Result<()> {
    let view = GameView::default();
    let mut repeat = KeyRepeat::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snapshot = GameSnapshot::default();

    let frame = Duration::from_millis(game.config().frame_ms.max(1) as u64);
    let mut last_tick = Instant::now();

    loop {
        game.snapshot_into(&mut snapshot);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snapshot, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next frame.
        let timeout = frame.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if let Some(action) = map_key(key).and_then(|a| repeat.press(a)) {
                            let applied = game.apply_action(action);
                            trace!(action = action.as_str(), applied, "key");
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(action) = map_key(key) {
                            repeat.release(action);
                        }
                    }
                },
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= frame {
            last_tick = Instant::now();
            let elapsed_ms = elapsed.as_millis().min(u32::MAX as u128) as u32;

            for action in repeat.update(elapsed_ms) {
                game.apply_action(action);
            }
            game.tick(elapsed_ms);
        }

        handle_events(game, &mut repeat, store, saved_best);
    }
}

/// Log drained game events and persist every new record as it is set.
///
/// `saved_best` is the value last written to `store`.
fn handle_events(
    game: &mut GameState,
    repeat: &mut KeyRepeat,
    store: &mut dyn ScoreStore,
    saved_best: &mut u32,
) {
    for event in game.drain_events() {
        match event {
            GameEvent::Started { episode } => {
                repeat.reset();
                info!(episode, "game started");
            }
            GameEvent::LinesCleared { count, points } => debug!(count, points, "lines cleared"),
            GameEvent::LevelUp { level } => info!(level, "level up"),
            GameEvent::NewBest { score } => {
                debug!(score, "new best");
                if score > *saved_best {
                    save_best_logged(store, GAME_KEY, score);
                    *saved_best = score;
                }
            }
            GameEvent::GameOver { score } => info!(score, "game over"),
            GameEvent::Locked { .. } => {}
        }
    }
}
