//! user-console binary entry point.
//!
//! Parses configuration, sets up logging and the API dispatcher, then runs
//! the TUI in raw mode and restores the terminal state on exit.
//!
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info};

use user_console::api::ReqresClient;
use user_console::api::dispatch::Dispatcher;
use user_console::app::keymap::Keymap;
use user_console::app::{self, AppState, Theme};
use user_console::config::Config;
use user_console::logging;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> anyhow::Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init_tracing(&config.log_file)?;

    let client = ReqresClient::new(&config.base_url, config.api_key.as_deref())
        .map_err(|e| anyhow::anyhow!("build API client: {e}"))?;
    info!(base_url = client.base_url(), route = config.route.path(), "Starting user-console");
    let dispatcher = Dispatcher::new(Arc::new(client));

    let theme = Theme::load_or_init(&config.theme);
    let keymap = Keymap::load_or_init(&config.keybinds);
    let mut state = AppState::new(config.session_store(), theme, keymap);
    state.start(config.route);

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut state, &dispatcher);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        error!(error = %err, "Application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
