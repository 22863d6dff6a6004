//! storefront — a terminal storefront with an infinite-scroll product feed.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ LoadMsg   ┌──────────┐  draw()  ┌──────────┐
//! │ loader.rs │ ────────► │  app.rs  │ ───────► │  ui.rs   │
//! │  (tokio)  │ (channel) │ (state)  │          │ (render) │
//! └───────────┘           └──────────┘          └──────────┘
//!       ▲                   │      ▲
//!       │ request()         │      │ handle_key_event()
//!       └── feed.rs ◄───────┘ ┌──────────┐
//!                             │ input.rs │
//!                             └──────────┘
//! ```
//!
//! * **`catalog/`** — the `Product` type and the seeded synthetic catalog.
//! * **`feed`** — pages, favorites, the Added list and the view filter.
//! * **`loader`** — delivers pages after a simulated latency.
//! * **`store/`** — the key-value persistence service (JSON file / memory).
//! * **`account`**, **`submission`** — registration, login, profile and
//!   user-submitted products on top of the store.
//! * **`nav`**, **`form`** — the screen stack and form-field state.
//! * **`app`** — owns all application state.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`main`** — wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop.

mod account;
mod app;
mod catalog;
mod config;
mod feed;
mod form;
mod input;
mod loader;
mod nav;
mod store;
mod submission;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{fmt, EnvFilter};

use app::App;
use catalog::Catalog;
use config::{Args, Config};
use loader::PageLoader;
use store::FileStore;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Send `tracing` output to the log file; the terminal belongs to the UI.
fn init_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating {}", config.data_dir.display()))?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .with_context(|| format!("opening {}", config.log_path().display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::from_args(Args::parse())?;
    init_logging(&config)?;
    tracing::info!(?config, "starting");

    // -- state ---------------------------------------------------------------
    let store = FileStore::open(config.store_path())
        .with_context(|| format!("opening store {}", config.store_path().display()))?;
    let catalog = Arc::new(Catalog::generate(config.catalog_size, config.seed));

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let (loader, rx) = PageLoader::new(runtime.handle().clone(), config.latency);

    let mut app = App::new(
        Box::new(store),
        catalog,
        loader,
        config.page_size,
        config.prefetch,
    );

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    install_panic_hook();
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Apply any pages the loader has delivered.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = rx.try_recv() {
            app.handle_load(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    tracing::info!("shutting down");
    Ok(())
}
