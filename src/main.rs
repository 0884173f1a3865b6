mod display;
mod keyboard;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use pixel_raider::config::STARTING_LIVES;
use pixel_raider::{Engine, PhaseTable, RunEnd, SystemClock};

use display::TerminalBoard;
use keyboard::KeyboardControls;

#[derive(Parser, Debug)]
#[command(
    name = "pixel_raider",
    version,
    about = "Side-scrolling wave shooter on an 84×48 pixel panel"
)]
struct Cli {
    /// Lives at the start of the run.
    #[arg(
        long,
        default_value_t = STARTING_LIVES,
        value_parser = clap::value_parser!(u32).range(1..=9)
    )]
    lives: u32,

    /// Seed the enemy RNG for a repeatable run.
    #[arg(long)]
    seed: Option<u64>,

    /// Write tracing output here (filter with RUST_LOG). The terminal
    /// belongs to the game, so nothing is logged without this.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file: {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut engine =
        Engine::new(PhaseTable::standard(), cli.lives, rng).context("invalid phase table")?;

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release events; terminals without the protocol fall back
    // to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();

    let result = play(&mut engine, &mut out);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    match result? {
        RunEnd::GameOver(score) => println!("Game over. Score: {score}"),
        RunEnd::Quit => println!("Quit. Score: {}", engine.world().score),
    }
    Ok(())
}

fn play<W: Write>(engine: &mut Engine<StdRng>, out: &mut W) -> Result<RunEnd> {
    let controls = Arc::new(KeyboardControls::default());
    let signals = engine.signals();
    keyboard::spawn_reader(Arc::clone(&controls), Arc::clone(&signals));

    let mut board = TerminalBoard::new(out);
    let end = engine.run(&mut board, controls.as_ref(), &SystemClock::new());
    if let Some(e) = board.take_error() {
        return Err(e).context("failed to draw frame");
    }

    // Leave the end screen up until the player quits
    if let RunEnd::GameOver(_) = end {
        while !signals.quit_requested() {
            thread::sleep(Duration::from_millis(50));
        }
    }
    Ok(end)
}
