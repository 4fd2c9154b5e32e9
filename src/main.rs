mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ondot::{
    app_dirs::AppDirs,
    challenge::Nudge,
    clock::{Clock, MonotonicClock, Timestamp},
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    presenter::Presenter,
    runtime::{CrosstermEventSource, EventSource, FixedTicker, GameEvent, Runner, Ticker},
    Challenge,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use ui::TerminalView;

/// stop the clock as close to the target time as you can
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A precision stopwatch drill. Start the clock, count the target time in your head, stop it, and get graded S to C on how close you landed."
)]
pub struct Cli {
    /// target in seconds to start on (clamped to 2.00-5.00); random when omitted
    #[clap(short = 't', long)]
    target: Option<f64>,

    /// start with focus mode on: the live readout is hidden while the clock runs
    #[clap(short = 'f', long)]
    focus: bool,

    /// seed for random targets, for repeatable sessions
    #[clap(long)]
    seed: Option<u64>,

    /// readout refresh interval in milliseconds
    #[clap(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// path to the config file (defaults to the platform config dir)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write the effective settings to the config file before starting
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line flags over the stored config
    fn apply(&self, mut config: Config) -> Config {
        if self.focus {
            config.focus_mode = true;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(tick_ms) = self.tick_ms {
            config.frame_interval_ms = tick_ms;
        }
        config
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

/// Time between animation steps, measured on the session clock so a burst of
/// key presses does not speed the sparks up
struct FrameTimer {
    last: Timestamp,
}

impl FrameTimer {
    fn new(now: Timestamp) -> Self {
        Self { last: now }
    }

    /// Seconds since the previous lap
    fn lap(&mut self, now: Timestamp) -> f64 {
        let dt = now.saturating_since(self.last).as_secs_f64();
        self.last = now;
        dt
    }
}

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = AppDirs::log_path() {
        if let Err(err) = logging::init(&log_path) {
            eprintln!("logging disabled: {err}");
        }
    }

    let store = cli.config_store();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        log::info!("saved config to {}", store.path().display());
    }
    let tick = config.frame_interval();

    let clock = MonotonicClock::new();
    let mut challenge = match cli.target {
        Some(target) => Challenge::with_target(clock, TerminalView::new(), config, target),
        None => Challenge::new(clock, TerminalView::new(), config),
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(tick));
    let outcome = start_tui(&mut terminal, &mut challenge, &runner);
    challenge.teardown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn start_tui<B, C, E, T>(
    terminal: &mut Terminal<B>,
    challenge: &mut Challenge<C, TerminalView>,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    C: Clock,
    E: EventSource,
    T: Ticker,
{
    let mut frame_timer = FrameTimer::new(challenge.clock().now());
    draw(terminal, challenge)?;

    loop {
        let mut dirty = match runner.step() {
            GameEvent::Tick => false,
            GameEvent::Resize(width, height) => {
                challenge.presenter_mut().set_area(width, height);
                true
            }
            GameEvent::Key(key) => {
                if handle_key(challenge, key) == Flow::Quit {
                    break;
                }
                true
            }
            GameEvent::Closed => {
                log::warn!("terminal input closed, leaving");
                break;
            }
        };

        // Due frames fire even when a burst of key presses keeps the
        // runner from timing out.
        dirty |= challenge.on_tick();
        let dt = frame_timer.lap(challenge.clock().now());
        dirty |= challenge.presenter_mut().animate(dt);

        if dirty {
            draw(terminal, challenge)?;
        }
    }

    Ok(())
}

fn draw<B: Backend, C: Clock>(
    terminal: &mut Terminal<B>,
    challenge: &mut Challenge<C, TerminalView>,
) -> io::Result<()> {
    let size = terminal.size()?;
    challenge.presenter_mut().set_area(size.width, size.height);
    terminal.draw(|f| f.render_widget(challenge.presenter(), f.area()))?;
    Ok(())
}

fn handle_key<C: Clock, P: Presenter>(challenge: &mut Challenge<C, P>, key: KeyEvent) -> Flow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char(' ') | KeyCode::Enter => {
            challenge.start_or_stop();
        }
        KeyCode::Char('n') => {
            challenge.new_random_target();
        }
        KeyCode::Left | KeyCode::Char('-') => {
            challenge.nudge_target(Nudge::Down);
        }
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
            challenge.nudge_target(Nudge::Up);
        }
        KeyCode::Char('f') => {
            challenge.toggle_focus_mode();
        }
        _ => {}
    }
    Flow::Continue
}
