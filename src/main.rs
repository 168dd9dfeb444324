use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute, terminal,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::{self, Stdout, Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use flappy_arcade::audio::{self, Audio};
use flappy_arcade::config::Tuning;
use flappy_arcade::driver::{Cadence, FrameClock};
use flappy_arcade::input::{Activation, InputMapper};
use flappy_arcade::render::Renderer;
use flappy_arcade::store::{self, JsonScoreStore, MemoryScoreStore, ScoreStore};
use flappy_arcade::{Game, TickOutcome, Viewport};

/// Flappy Bird in your terminal
#[derive(Parser, Debug)]
#[command(name = "flappy-arcade", version, about)]
struct Cli {
    /// Simulation ticks per second while playing
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for the pipe layout (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding game tuning
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where the best score and log live
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Disable sound
    #[arg(short, long)]
    mute: bool,

    /// Treat mouse clicks as touch taps (double tap dismisses game over)
    #[arg(long)]
    touch: bool,
}

/// Restore terminal state - called on exit and from the panic hook
fn restore_terminal() {
    let _ = execute!(
        io::stdout(),
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    );
    let _ = terminal::disable_raw_mode();
}

/// Log to a file: the terminal belongs to the game.
fn init_logging(data_dir: Option<&Path>) {
    let writer: Box<dyn Write + Send> = data_dir
        .and_then(|dir| {
            std::fs::create_dir_all(dir).ok()?;
            std::fs::File::create(dir.join("flappy-arcade.log")).ok()
        })
        .map(|file| Box::new(file) as Box<dyn Write + Send>)
        .unwrap_or_else(|| Box::new(io::sink()));

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(writer))
        .with_ansi(false)
        .init();
}

fn surface_size() -> io::Result<(usize, usize)> {
    let (cols, rows) = terminal::size()?;
    Ok((cols as usize, rows as usize * 2))
}

/// Wait up to `timeout` for the first event, then take everything else that
/// is already queued without waiting again.
fn drain_events<E>(
    timeout: Duration,
    mut poll: impl FnMut(Duration) -> io::Result<bool>,
    mut read: impl FnMut() -> io::Result<E>,
) -> io::Result<Vec<E>> {
    let mut events = Vec::new();
    let mut wait = timeout;
    while poll(wait)? {
        events.push(read()?);
        wait = Duration::ZERO;
    }
    Ok(events)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().or_else(store::default_data_dir);
    init_logging(data_dir.as_deref());

    let tuning = match &cli.config {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };

    let mut scores: Box<dyn ScoreStore> = match &data_dir {
        Some(dir) => Box::new(JsonScoreStore::in_dir(dir)),
        None => {
            tracing::warn!("No data directory, best score will not persist");
            Box::new(MemoryScoreStore::default())
        }
    };
    let best = scores.read_best();

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut sound = audio::open(cli.mute);

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    terminal::enable_raw_mode().context("enabling raw mode")?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let result = surface_size().map_err(anyhow::Error::from).and_then(|(pw, ph)| {
        let game = Game::new(tuning, Viewport::from_surface(pw, ph), best, rng);
        run(&mut out, &cli, game, pw, ph, sound.as_mut(), scores.as_mut())
    });

    restore_terminal();
    tracing::info!("Exited");
    result
}

fn run(
    out: &mut Stdout,
    cli: &Cli,
    mut game: Game,
    pw: usize,
    ph: usize,
    sound: &mut dyn Audio,
    scores: &mut dyn ScoreStore,
) -> Result<()> {
    let mut renderer = Renderer::new(pw, ph);
    let mut mapper = InputMapper::new(Duration::from_millis(game.tuning().double_tap_ms));
    let mut clock = FrameClock::new(cli.fps, Instant::now());
    let pointer = if cli.touch {
        Activation::Touch
    } else {
        Activation::Pointer
    };

    renderer.paint(&game, out)?;

    loop {
        // Input lands between frames; a jump takes effect on the next tick.
        for ev in drain_events(clock.until_due(Instant::now()), event::poll, event::read)? {
            let activation = match ev {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ')
                    | KeyCode::Up
                    | KeyCode::Enter
                    | KeyCode::Char('r')
                    | KeyCode::Char('R') => Some(Activation::Key),
                    _ => None,
                },
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    Some(pointer)
                }
                Event::Resize(cols, rows) => {
                    let (npw, nph) = (cols as usize, rows as usize * 2);
                    renderer.resize(npw, nph);
                    game.resize(Viewport::from_surface(npw, nph));
                    renderer.paint(&game, out)?;
                    None
                }
                _ => None,
            };

            if let Some(activation) = activation
                && let Some(command) = mapper.map(activation, game.state(), Instant::now())
                && game.apply(command, sound)
            {
                tracing::debug!(?command, state = ?game.state(), "command applied");
                clock.sync(game.state(), Instant::now());
            }
        }

        let Some(cadence) = clock.take_due(Instant::now()) else {
            continue;
        };
        match cadence {
            Cadence::Playing => {
                if let TickOutcome::Over(crash) = game.tick(sound, scores) {
                    tracing::debug!(?crash, "session ended");
                }
            }
            Cadence::Idle => game.idle_step(),
            Cadence::Frozen => {}
        }
        clock.sync(game.state(), Instant::now());
        renderer.paint(&game, out)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[test]
    fn test_drain_takes_every_queued_event() {
        let mut queue: VecDeque<u32> = (0..50).collect();
        let mut waits = Vec::new();
        let queue_len = std::cell::Cell::new(queue.len());
        let events = drain_events(
            Duration::from_millis(16),
            |wait| {
                waits.push(wait);
                Ok(queue_len.get() > 0)
            },
            || {
                queue_len.set(queue_len.get() - 1);
                Ok(queue.pop_front().unwrap())
            },
        )
        .unwrap();
        assert_eq!(events, (0..50).collect::<Vec<_>>());
        assert_eq!(waits[0], Duration::from_millis(16));
        assert!(waits[1..].iter().all(|w| w.is_zero()));
    }

    #[test]
    fn test_drain_empty_queue_waits_once() {
        let mut polls = 0;
        let events: Vec<u32> = drain_events(
            Duration::from_millis(5),
            |_| {
                polls += 1;
                Ok(false)
            },
            || unreachable!(),
        )
        .unwrap();
        assert!(events.is_empty());
        assert_eq!(polls, 1);
    }
}
