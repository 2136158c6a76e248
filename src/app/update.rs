use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::{Duration, Instant};

use crate::api::dispatch::Dispatcher;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState, Route};
use crate::ui;

/// Drive the UI: submit queued requests, apply arrived outcomes, advance
/// timers, draw, then wait up to 100ms for a key.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    dispatcher: &Dispatcher,
) -> Result<()> {
    loop {
        flush_requests(app, dispatcher);
        for outcome in dispatcher.drain() {
            app.apply_outcome(outcome, Instant::now());
        }
        app.tick(Instant::now());
        flush_requests(app, dispatcher);

        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }
    }
    Ok(())
}

fn flush_requests(app: &mut AppState, dispatcher: &Dispatcher) {
    for req in app.take_requests() {
        dispatcher.submit(req);
    }
}

/// Apply one key press to the current screen.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    match app.route {
        Route::Login => handle_login_key(app, key),
        Route::Users => match app.input_mode {
            InputMode::Normal => handle_list_key(app, key),
            InputMode::Search => handle_search_key(app, key.code),
            InputMode::Modal => handle_modal_key(app, key.code),
        },
    }
}

fn handle_login_key(app: &mut AppState, key: KeyEvent) {
    if !app.login.is_editable() {
        return;
    }
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.login.toggle_focus(),
        KeyCode::Enter => app.submit_login(),
        KeyCode::Backspace => app.login.backspace(),
        KeyCode::Char(c) => app.login.insert_char(c),
        _ => {}
    }
}

fn handle_list_key(app: &mut AppState, key: KeyEvent) {
    let Some(action) = app.keymap.resolve(&key) else {
        return;
    };
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::OpenHelp => app.open_help(),
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::MoveUp => app.users.select_prev(),
        KeyAction::MoveDown => app.users.select_next(),
        KeyAction::PrevPage => app.prev_page(),
        KeyAction::NextPage => app.next_page(),
        KeyAction::Reload => app.reload(),
        KeyAction::Logout => app.logout(),
        KeyAction::DismissBanner => app.users.dismiss_banner(),
        // Mutations are disabled while one is in flight.
        KeyAction::EditSelection => {
            if !app.users.is_mutating() {
                app.open_edit();
            }
        }
        KeyAction::DeleteSelection => {
            if !app.users.is_mutating() {
                app.open_delete_confirm();
            }
        }
        KeyAction::Ignore => {}
    }
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.users.set_search_query("");
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => app.users.pop_search_char(),
        KeyCode::Char(c) => app.users.push_search_char(c),
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match app.modal.as_mut() {
        Some(ModalState::EditUser(form)) => {
            if !form.is_editable() {
                return;
            }
            match code {
                KeyCode::Esc => app.close_modal(),
                KeyCode::Tab | KeyCode::Down => form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                KeyCode::Enter => app.submit_edit(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) => form.insert_char(c),
                _ => {}
            }
        }
        Some(ModalState::DeleteConfirm { selected, .. }) => match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *selected = 1 - *selected;
            }
            KeyCode::Enter => {
                if *selected == 0 {
                    app.confirm_delete();
                } else {
                    app.close_modal();
                }
            }
            KeyCode::Char('y') => app.confirm_delete(),
            KeyCode::Esc | KeyCode::Char('n') => app.close_modal(),
            _ => {}
        },
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_modal()
            }
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            _ => {}
        },
        None => app.close_modal(),
    }
}
