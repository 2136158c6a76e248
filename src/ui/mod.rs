pub mod components;
pub mod login;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState, Route};

pub fn render(f: &mut Frame, app: &AppState) {
    let area = f.area();
    match app.route {
        Route::Login => login::render_login(f, area, app),
        Route::Users => render_users_screen(f, app),
    }
}

fn render_users_screen(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let list = &app.users;
    let search = match app.input_mode {
        InputMode::Search => format!("  Search: {}_", list.search_query),
        _ if !list.search_query.is_empty() => format!("  Search: {}", list.search_query),
        _ => String::new(),
    };
    let p = Paragraph::new(format!(
        "User List  page:{}  users:{}/{}{search}  /: search; Enter: edit; d: delete; ←/→: page; x: logout; ?: help; q: quit",
        list.page,
        list.visible.len(),
        list.fetched.len(),
    ))
    .block(
        Block::default()
            .title("user-console")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    users::render_users_table(f, root[1], app);
    components::render_status_bar(f, root[2], app);
    components::render_banner(f, root[1], app);

    if let Some(state) = &app.modal {
        let area = f.area();
        match state {
            ModalState::EditUser(_) | ModalState::DeleteConfirm { .. } => {
                users::render_user_modal(f, area, app, state);
            }
            ModalState::Help { scroll } => {
                components::render_help_modal(f, area, app, *scroll);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiOutcome, UserRecord};
    use crate::app::Theme;
    use crate::app::keymap::Keymap;
    use crate::error::ApiError;
    use crate::session::MemorySessionStore;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::Instant;

    fn screen_text(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn list_app() -> AppState {
        let mut app = AppState::new(
            Box::new(MemorySessionStore::with_token("t")),
            Theme::dark(),
            Keymap::default(),
        );
        app.start(Route::Users);
        app
    }

    #[test]
    fn login_screen_shows_form() {
        let mut app = AppState::new(Box::new(MemorySessionStore::new()), Theme::dark(), Keymap::default());
        app.start(Route::Login);
        let text = screen_text(&app);
        assert!(text.contains("Welcome Back!"));
        assert!(text.contains("Email"));
    }

    #[test]
    fn empty_page_and_failed_load_render_differently() {
        let mut app = list_app();
        app.apply_outcome(ApiOutcome::UsersListed { page: 1, result: Ok(vec![]) }, Instant::now());
        assert!(screen_text(&app).contains("No users available"));

        let _ = app.users.reload();
        app.apply_outcome(
            ApiOutcome::UsersListed { page: 1, result: Err(ApiError::Fetch("HTTP 500".into())) },
            Instant::now(),
        );
        assert!(screen_text(&app).contains("Failed to load users"));
    }

    #[test]
    fn failed_reload_keeps_rows_and_flags_the_error() {
        let mut app = list_app();
        let users = vec![UserRecord {
            id: 1,
            first_name: "George".into(),
            last_name: "Bluth".into(),
            email: "george.bluth@reqres.in".into(),
            avatar: String::new(),
        }];
        app.apply_outcome(ApiOutcome::UsersListed { page: 1, result: Ok(users) }, Instant::now());
        let _ = app.users.reload();
        app.apply_outcome(
            ApiOutcome::UsersListed { page: 1, result: Err(ApiError::Fetch("HTTP 500".into())) },
            Instant::now(),
        );
        let text = screen_text(&app);
        assert!(text.contains("George Bluth"));
        assert!(text.contains("Failed to load users"));
    }

    #[test]
    fn rows_and_banner_are_drawn() {
        let mut app = list_app();
        let users = vec![UserRecord {
            id: 1,
            first_name: "George".into(),
            last_name: "Bluth".into(),
            email: "george.bluth@reqres.in".into(),
            avatar: "https://reqres.in/img/faces/1-image.jpg".into(),
        }];
        app.apply_outcome(ApiOutcome::UsersListed { page: 1, result: Ok(users) }, Instant::now());
        let _ = app.users.begin_delete(7);
        app.apply_outcome(ApiOutcome::UserDeleted { id: 7, result: Ok(()) }, Instant::now());

        let text = screen_text(&app);
        assert!(text.contains("George Bluth"));
        assert!(text.contains("User deleted successfully!"));
    }
}
