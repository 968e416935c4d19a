mod api;
mod app;
mod config;
mod dashboard;
mod error;
mod fetch;
mod notify;
mod types;
mod ui;
mod view;

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::AdminClient;
use crate::app::{Action, App};
use crate::config::{Config, INPUT_POLL_MS};
use crate::error::Result;
use crate::notify::ToastQueue;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&cfg) {
        eprintln!("Cannot open log file {}: {e}", cfg.log_file.display());
        std::process::exit(1);
    }

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        eprintln!("Fatal error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(cfg: &Config) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(cfg: Config) -> Result<()> {
    let client = Arc::new(AdminClient::new(&cfg)?);
    info!(api_url = %cfg.api_url, page_size = cfg.page_size, locale = cfg.locale.tag, "starting admin console");

    let toasts = Arc::new(ToastQueue::default());
    let mut app = App::new(&cfg, client.clone(), client, toasts);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map_err(Into::into)
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let poll = Duration::from_millis(INPUT_POLL_MS);
    let mut dirty = true;
    let mut had_toasts = false;

    loop {
        app.drain();
        // toasts expire on their own, so repaint while any are up and once after
        let has_toasts = !app.toasts.visible().is_empty();
        if dirty || app.take_changed() || has_toasts || had_toasts {
            terminal.draw(|f| ui::render(f, app))?;
            dirty = false;
        }
        had_toasts = has_toasts;

        if event::poll(poll)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = Action::from_key(key.code) {
                    if !app.handle(action) {
                        info!("quit requested");
                        return Ok(());
                    }
                    dirty = true;
                }
            } else {
                // resize and friends
                dirty = true;
            }
        }
    }
}
