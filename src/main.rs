//! dormdesk - a terminal dashboard for hostel maintenance management.
//!
//! Students submit maintenance requests; officers, hall officers, and
//! administrators move them through the request lifecycle. All state
//! lives in the hostel management REST backend; this client renders it.

mod api;
mod app;
mod auth;
mod config;
mod demo;
mod models;
mod ui;
mod utils;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use auth::{MemoryStore, SessionStore};
use config::Config;
use models::Role;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name inside the cache directory
const LOG_FILE: &str = "dormdesk.log";

/// Initialize tracing. Logs go to a file so the alternate screen is
/// never corrupted; RUST_LOG controls the level. The returned guard
/// must stay alive for the buffered writer to flush.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Ok(dir) = Config::log_dir() {
        if std::fs::create_dir_all(&dir).is_ok() {
            let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            return Some(guard);
        }
    }

    // No usable log directory; stderr is better than silence
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
    None
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--check-connection") {
        return check_connection().await;
    }
    let demo_role = args
        .iter()
        .position(|a| a == "--demo")
        .map(|i| match args.get(i + 1) {
            Some(name) if !name.starts_with("--") => Role::from_name_or_student(name),
            _ => Role::Student,
        });

    let _log_guard = init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "dormdesk starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app (restores a persisted session or lands on login)
    let mut app = App::new(demo_role).await?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("dormdesk shutting down");
    Ok(())
}

/// Print a reachability diagnostic for the configured backend and exit.
async fn check_connection() -> Result<()> {
    let config = Config::load().unwrap_or_default();
    let base_url = config.resolved_base_url();
    let session = SessionStore::new(&base_url, Box::new(MemoryStore::new()))?;

    eprintln!("Checking {} ...", base_url);
    let status = session.test_connection().await;
    if status.connected {
        println!("OK: {}", status.message);
    } else {
        println!("FAILED: {}", status.message);
    }
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with a timeout so message updates render
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C quits from anywhere, including the login form
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
