use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use typing_rain::config::load_alphabet;
use typing_rain::display::TerminalSurface;
use typing_rain::entities::{Rules, Session};
use typing_rain::input::FrameInput;

/// Pop falling words by typing their short form before they hit the bottom.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// TOML alphabet file of `long = "short"` pairs
    alphabet: PathBuf,

    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Initial ms per frame (lower = faster)
    #[arg(long)]
    frame_ms: Option<u64>,

    /// Fall speed in play-area pixels per frame
    #[arg(long)]
    speed: Option<i32>,

    /// Chance per frame of a new word appearing
    #[arg(long)]
    spawn_chance: Option<f64>,

    /// Write logs here (the terminal is busy drawing the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn rules(&self) -> Result<Rules> {
        let mut rules = Rules::default();
        if let Some(ms) = self.frame_ms {
            rules.frame_interval_ms = ms;
        }
        if let Some(speed) = self.speed {
            rules.scroll_speed = speed;
        }
        if let Some(p) = self.spawn_chance {
            rules.spawn_chance = p;
        }
        rules.validate().context("invalid command-line tuning")?;
        Ok(rules)
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not create log file {}", path.display()))?;
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        None => env_logger::init(),
    }
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Sleep, clear, gather input, simulate, present. Returns on quit.
fn game_loop<W: Write>(
    surface: &mut TerminalSurface<W>,
    session: &mut Session,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    loop {
        thread::sleep(Duration::from_millis(session.frame_interval_ms));
        surface.begin_frame()?;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        let events: Vec<Event> = rx.try_iter().collect();
        for ev in &events {
            if let Event::Resize(cols, rows) = ev {
                surface.resize(*cols, *rows);
            }
        }
        let input = FrameInput::collect(events);

        // The quitting frame still completes before the loop ends.
        let running = session.run_frame(input, rng, surface);
        surface.present()?;
        if !running {
            return Ok(());
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    // Everything that can fail on bad input happens before the terminal is touched.
    let rules = args.rules()?;
    let items = load_alphabet(&args.alphabet)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!(
        "loaded {} items from {}, seed {seed}",
        items.len(),
        args.alphabet.display()
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut session = Session::new(items, rules);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
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

    let result = terminal::size().and_then(|(cols, rows)| {
        let mut surface = TerminalSurface::new(
            &mut out,
            session.rules.width,
            session.rules.height,
            cols,
            rows,
        );
        game_loop(&mut surface, &mut session, &mut rng, &rx)
    });

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    log::info!("quit with score {}", session.score);
    result.context("terminal error")
}
