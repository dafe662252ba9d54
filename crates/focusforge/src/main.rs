//! FocusForge - Pomodoro timer, task list and streak tracker
//!
//! Work 25 minutes, rest 5, keep the chain going.

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use focusforge::app::{App, Exit};
use focusforge::clock::SystemClock;
use focusforge::layout::check_min_size;
use focusforge::signals;
use focusforge::store::FocusStore;
use focusforge::terminal::{TerminalGuard, Tui};
use focusforge::ticker::Ticker;
use focusforge::ui;
use focusforge_core::{Paths, StartupError};
use ratatui::layout::Rect;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const TICK_RATE: Duration = Duration::from_secs(1);

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    signals::install()?;

    let paths = Paths::new()?;
    let store = FocusStore::new(paths);
    store.init()?;

    if let Err(err) = init_logging(&store.paths().log) {
        eprintln!("Warning: logging disabled: {err:#}");
    }
    tracing::info!(version = focusforge::VERSION, "starting");

    let mut app = App::new(store, Box::new(SystemClock));

    let (cols, rows) = crossterm::terminal::size().map_err(StartupError::TerminalInit)?;
    check_min_size(cols, rows)?;

    let (guard, mut terminal) = TerminalGuard::enter().map_err(StartupError::TerminalInit)?;
    let result = run_app(&mut terminal, &mut app);
    guard.restore();

    app.shutdown();
    result?;

    let code = Exit::resolve(app.exit, signals::terminate_signal());
    tracing::info!(code, "exiting");
    Ok(code)
}

/// Log to a file; stderr would corrupt the full-screen UI
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
}

fn resize(terminal: &mut Tui, app: &mut App) -> Result<()> {
    terminal.autoresize()?;
    let size = terminal.size()?;
    app.resize(Rect::new(0, 0, size.width, size.height));
    Ok(())
}

fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut ticker = Ticker::new(TICK_RATE, Instant::now());
    resize(terminal, app)?;

    while signals::running() && app.exit.is_none() {
        if signals::take_resize() {
            resize(terminal, app)?;
        }

        app.check_expiry();
        app.prune_notification();
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(ticker.timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Resize(_, _) => signals::request_resize(),
                _ => {}
            }
        }

        if ticker.due(Instant::now()) {
            app.tick();
        }
    }

    Ok(())
}
