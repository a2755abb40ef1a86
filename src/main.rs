use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use skyward_shooter::assets::{self, AssetStore};
use skyward_shooter::compute::Game;
use skyward_shooter::config::{self, GameConfig};
use skyward_shooter::display;
use skyward_shooter::hud::HudPanel;

#[derive(Debug, Parser)]
#[command(name = "skyward_shooter", about = "Mouse-aimed arcade shooter for the terminal")]
struct Args {
    /// TOML file overriding the built-in constant table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding sprite text files
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Where log output goes (the terminal belongs to the game)
    #[arg(long, default_value = "skyward_shooter.log")]
    log_file: PathBuf,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Drain input, advance one tick, draw, then sleep out the frame.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game<HudPanel>,
    assets: &mut AssetStore,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let frame = Duration::from_millis(game.config().frame.target_ms);
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    modifiers,
                    ..
                }) => match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(());
                    }
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') if game.is_game_over() => {
                        game.reset(rng);
                    }
                    // The title screen stands in for the intro sequence.
                    _ if !game.is_started() => game.start(),
                    _ => {}
                },
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Moved | MouseEventKind::Drag(_),
                    column,
                    row,
                    ..
                }) => {
                    let pointer = display::cell_to_pixel(column, row, &game.config().display);
                    game.set_pointer(pointer);
                }
                Event::Resize(cols, rows) => {
                    let viewport = display::viewport_for(cols, rows, &game.config().display);
                    game.resize(viewport);
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let dt_ms = now.duration_since(last).as_secs_f64() * 1000.0;
        last = now;

        if assets.is_loading() {
            assets.poll();
        }
        game.tick(dt_ms, rng);
        display::render(out, game, assets)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let config = match &args.config {
        Some(path) => config::load(path)?,
        None => GameConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (cols, rows) = terminal::size().context("no terminal to draw on")?;
    let viewport = display::viewport_for(cols, rows, &config.display);
    let mut assets = AssetStore::load_in_background(&args.assets, assets::manifest(&config));
    let mut game = Game::new(config, viewport, HudPanel::default(), &mut rng)?;
    tracing::info!(cols, rows, seed = ?args.seed, "session created");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Blocking event reads live on their own thread so the loop never waits.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut game, &mut assets, &mut rng, &rx);

    // Always restore the terminal
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result?;
    tracing::info!(score = game.session.score, coins = game.session.coins, "quit");
    Ok(())
}
