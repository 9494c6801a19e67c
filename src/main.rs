mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, terminal,
};
use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use flappy_arcade::{
    FrameClock, Game, JsonFileStore, MemoryStore, ObstacleSpawner, ScoreStore, Session, Tuning,
    WorldBounds, store,
};
use tui::{Intent, Renderer, SoundCues, Viewport};

#[derive(Parser, Debug)]
#[command(name = "flappy-arcade")]
#[command(about = "Flap through the gaps. Space/Up/click to flap, p to pause, r to restart, q to quit")]
struct Cli {
    /// Seed for obstacle placement; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// JSON file holding the best score
    #[arg(long)]
    best_file: Option<PathBuf>,
    /// Keep the best score in memory only
    #[arg(long)]
    no_save: bool,
    #[arg(long)]
    mute: bool,
    /// Enable live tuning keys (a/z gravity, s/x flap, d/c speed) and the HUD
    #[arg(long)]
    tuning: bool,
    /// World height in game units; the width follows the terminal's aspect
    #[arg(long, default_value_t = 600.0)]
    world_height: f64,
    #[arg(long)]
    gravity: Option<f64>,
    #[arg(long)]
    flap: Option<f64>,
    #[arg(long)]
    speed: Option<f64>,
    /// Log file; RUST_LOG controls the level
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn tuning(&self) -> Tuning {
        let mut tuning = Tuning::default();
        if let Some(g) = self.gravity {
            tuning.gravity = g;
        }
        if let Some(f) = self.flap {
            tuning.flap_velocity = f;
        }
        if let Some(s) = self.speed {
            tuning.obstacle_speed = s;
        }
        tuning.validated()
    }

    fn store(&self) -> Result<Box<dyn ScoreStore>> {
        if self.no_save {
            return Ok(Box::new(MemoryStore::default()));
        }
        Ok(match &self.best_file {
            Some(path) => Box::new(JsonFileStore::new(path, store::DEFAULT_KEY)),
            None => Box::new(JsonFileStore::in_data_dir()?),
        })
    }
}

/// The screen belongs to the game, so logs go to a file. Without one the game
/// runs unlogged.
fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => store::data_dir()?.join("flappy-arcade.log"),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Main ────────────────────────────────────────────────────────────────────

/// Steps are tuned for this rate; see `Tuning`.
const FRAME_DUR: Duration = Duration::from_micros(16_667);

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log_file.clone()) {
        eprintln!("logging disabled: {e:#}");
    }

    let tuning = cli.tuning();
    let spawner = match cli.seed {
        Some(seed) => ObstacleSpawner::seeded(seed, &tuning),
        None => ObstacleSpawner::from_entropy(&tuning),
    };
    let store = cli.store()?;

    let (cols, rows) = terminal::size().context("reading terminal size")?;
    let view = Viewport::fitted(cols, rows, cli.world_height, &tuning);
    let world = WorldBounds {
        width: view.world_width(),
        height: view.world_height(),
    };
    let session = Session::new(tuning, world, spawner, 0);
    let mut game = Game::new(session, store, SoundCues::new(!cli.mute));
    info!(
        best = game.session().best(),
        width = world.width,
        height = world.height,
        "ready"
    );

    let mut renderer = Renderer::new(view);
    renderer.show_hud = cli.tuning;

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let result = run(&mut out, &mut game, &mut renderer, &cli);
    cleanup(&mut out)?;
    result
}

fn run(
    out: &mut io::Stdout,
    game: &mut Game<SoundCues>,
    renderer: &mut Renderer,
    cli: &Cli,
) -> Result<()> {
    let clock = FrameClock::new();

    loop {
        let frame_start = Instant::now();
        // Requested before input is handled, so a pause or restart in this
        // iteration leaves the ticket stale.
        let ticket = game.request_frame();
        game.observe_time(clock.now_ms());

        while event::poll(Duration::ZERO)? {
            let Some(intent) = tui::intent_for(&event::read()?, cli.tuning) else {
                continue;
            };
            match intent {
                Intent::Quit => {
                    info!(best = game.session().best(), "quit");
                    return Ok(());
                }
                Intent::Resize { cols, rows } => {
                    let tuning = game.session().tuning();
                    let view = Viewport::fitted(cols, rows, cli.world_height, tuning);
                    renderer.resize(view);
                    game.on_resize(view.world_width(), view.world_height());
                }
                other => tui::apply(game, other),
            }
        }

        if let Some(ticket) = ticket {
            game.frame(ticket, clock.now_ms());
        }

        renderer.draw(game);
        renderer.present(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DUR {
            std::thread::sleep(FRAME_DUR - elapsed);
        }
    }
}
