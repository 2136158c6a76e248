//! Application state types and entry glue.
//!
//! `AppState` owns the two page controllers, the open modal, and the injected
//! session store. Controllers never perform I/O themselves: they queue
//! `ApiRequest`s in the outbox, the event loop runs them, and the outcomes are
//! fed back through `apply_outcome`.
//!
pub mod edit;
pub mod keymap;
pub mod login;
pub mod update;
pub mod users;

use std::time::Instant;

use ratatui::style::Color;
use tracing::{debug, info, warn};

use crate::api::{ApiOutcome, ApiRequest};
use crate::session::SessionStore;
use edit::EditForm;
use keymap::Keymap;
use login::LoginController;
use users::UserListController;

pub const MSG_LOGOUT_FAILED: &str = "Failed to log out";

/// Navigable entry points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Route {
    /// Login view, served at `/`.
    Login,
    /// User list view, served at `/users`.
    Users,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Users => "/users",
        }
    }
}

/// Current input mode for key handling on the list screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// Dark default theme.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "success" => theme.success = color,
                    "error" => theme.error = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-console theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        // Named colors have no stable RGB; they are written as reset.
        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                _ => "reset".to_string(),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("success", self.success);
        kv("error", self.error);

        std::fs::write(path, buf)
    }

    /// Load `path` if present, otherwise write and return `mocha`.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            debug!(path, error = %e, "Could not write default theme");
        }
        t
    }
}

/// Modal dialogs on the user list screen.
#[derive(Clone, Debug)]
pub enum ModalState {
    EditUser(EditForm),
    DeleteConfirm {
        user_id: u64,
        name: String,
        /// 0 = Yes, 1 = No
        selected: usize,
    },
    Help {
        scroll: u16,
    },
}

pub struct AppState {
    pub route: Route,
    pub login: LoginController,
    pub users: UserListController,
    pub modal: Option<ModalState>,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub keymap: Keymap,
    pub session: Box<dyn SessionStore>,
    /// Requests queued by controllers, drained by the event loop.
    pub outbox: Vec<ApiRequest>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(session: Box<dyn SessionStore>, theme: Theme, keymap: Keymap) -> Self {
        Self {
            route: Route::Login,
            login: LoginController::new(),
            users: UserListController::new(),
            modal: None,
            input_mode: InputMode::Normal,
            theme,
            keymap,
            session,
            outbox: Vec::new(),
            should_quit: false,
        }
    }

    /// Open the given entry point.
    pub fn start(&mut self, entry: Route) {
        self.navigate(entry);
    }

    /// Switch views. The list is only reachable with a stored token; the login
    /// view forwards straight to the list when one is already present.
    pub fn navigate(&mut self, route: Route) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
        let has_token = self.session.get_token().is_some();
        match route {
            Route::Users if !has_token => {
                info!("No session token; showing login");
                self.show_login();
            }
            Route::Login if has_token => {
                debug!("Session token present; skipping login");
                self.show_users();
            }
            Route::Login => self.show_login(),
            Route::Users => self.show_users(),
        }
    }

    fn show_login(&mut self) {
        self.route = Route::Login;
        self.login = LoginController::new();
    }

    fn show_users(&mut self) {
        self.route = Route::Users;
        self.users = UserListController::new();
        let req = self.users.mount();
        self.outbox.push(req);
    }

    /// Forget the token and return to login. If the token cannot be removed
    /// the list stays up with a failure banner.
    pub fn logout(&mut self) {
        if let Err(e) = self.session.clear_token() {
            warn!(error = %e, "Clearing session token failed");
            self.users.notify_failure(MSG_LOGOUT_FAILED, Instant::now());
            return;
        }
        info!("Logged out");
        self.navigate(Route::Login);
    }

    pub fn take_requests(&mut self) -> Vec<ApiRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Route an API outcome to the controller that issued it.
    pub fn apply_outcome(&mut self, outcome: ApiOutcome, now: Instant) {
        match outcome {
            ApiOutcome::Authenticated(result) => {
                self.login
                    .on_authenticated(result, self.session.as_mut(), now);
            }
            ApiOutcome::UsersListed { page, result } => {
                if self.route == Route::Users {
                    self.users.on_users_listed(page, result);
                } else {
                    debug!(page, "Dropping user list response outside the list view");
                }
            }
            ApiOutcome::UserUpdated { id, update, result } => {
                if let Some(ModalState::EditUser(form)) = self.modal.as_mut()
                    && form.user_id == id
                {
                    form.on_result(&result, now);
                }
                self.users.on_user_updated(id, &update, result, now);
            }
            ApiOutcome::UserDeleted { id, result } => {
                self.users.on_user_deleted(id, result, now);
            }
        }
    }

    /// Advance timers: login redirect, banner expiry, edit modal auto-close.
    pub fn tick(&mut self, now: Instant) {
        if self.route == Route::Login && self.login.redirect_due(now) {
            self.navigate(Route::Users);
        }
        self.users.tick(now);
        if let Some(ModalState::EditUser(form)) = &self.modal
            && form.should_close(now)
        {
            self.close_modal();
        }
    }

    pub fn submit_login(&mut self) {
        if let Some(req) = self.login.submit() {
            self.outbox.push(req);
        }
    }

    pub fn next_page(&mut self) {
        if let Some(req) = self.users.next_page() {
            self.outbox.push(req);
        }
    }

    pub fn prev_page(&mut self) {
        if let Some(req) = self.users.prev_page() {
            self.outbox.push(req);
        }
    }

    pub fn reload(&mut self) {
        let req = self.users.reload();
        self.outbox.push(req);
    }

    pub fn open_edit(&mut self) {
        if let Some(user) = self.users.selected_user() {
            self.modal = Some(ModalState::EditUser(EditForm::open(user)));
            self.input_mode = InputMode::Modal;
        }
    }

    pub fn submit_edit(&mut self) {
        let staged = match self.modal.as_mut() {
            Some(ModalState::EditUser(form)) => form.submit(),
            _ => None,
        };
        if let Some((id, update)) = staged {
            let req = self.users.begin_update(id, update);
            self.outbox.push(req);
        }
    }

    pub fn open_delete_confirm(&mut self) {
        if let Some(user) = self.users.selected_user() {
            self.modal = Some(ModalState::DeleteConfirm {
                user_id: user.id,
                name: user.full_name(),
                selected: 1,
            });
            self.input_mode = InputMode::Modal;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(ModalState::DeleteConfirm { user_id, .. }) = self.modal {
            self.close_modal();
            let req = self.users.begin_delete(user_id);
            self.outbox.push(req);
        }
    }

    pub fn open_help(&mut self) {
        self.modal = Some(ModalState::Help { scroll: 0 });
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::UserRecord;
    use crate::session::MemorySessionStore;

    fn app_with(session: MemorySessionStore) -> AppState {
        AppState::new(Box::new(session), Theme::dark(), Keymap::default())
    }

    fn user(id: u64) -> UserRecord {
        UserRecord {
            id,
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            email: format!("user{id}@reqres.in"),
            avatar: String::new(),
        }
    }

    #[test]
    fn list_entry_without_token_falls_back_to_login() {
        let mut app = app_with(MemorySessionStore::new());
        app.start(Route::Users);
        assert_eq!(app.route, Route::Login);
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn stored_token_skips_login_and_loads_page_one() {
        let mut app = app_with(MemorySessionStore::with_token("t"));
        app.start(Route::Login);
        assert_eq!(app.route, Route::Users);
        assert_eq!(app.take_requests(), vec![ApiRequest::ListUsers { page: 1 }]);
    }

    #[test]
    fn logout_clears_token_and_returns_to_login() {
        let mut app = app_with(MemorySessionStore::with_token("t"));
        app.start(Route::Users);
        app.logout();
        assert_eq!(app.route, Route::Login);
        assert!(app.session.get_token().is_none());
    }

    struct StuckSession;

    impl SessionStore for StuckSession {
        fn get_token(&self) -> Option<String> {
            Some("t".into())
        }

        fn set_token(&mut self, _token: &str) -> crate::error::Result<()> {
            Ok(())
        }

        fn clear_token(&mut self) -> crate::error::Result<()> {
            Err(crate::error::simple_error("read-only session file"))
        }
    }

    #[test]
    fn logout_that_cannot_clear_token_reports_failure() {
        let mut app = AppState::new(Box::new(StuckSession), Theme::dark(), Keymap::default());
        app.start(Route::Users);
        let _ = app.take_requests();
        app.logout();
        assert_eq!(app.route, Route::Users);
        let banner = app.users.banner.as_ref().unwrap();
        assert_eq!(banner.kind, users::BannerKind::Failure);
        assert_eq!(banner.text, MSG_LOGOUT_FAILED);
        assert!(app.take_requests().is_empty());
    }

    #[test]
    fn update_outcome_reaches_open_edit_form_and_list() {
        let mut app = app_with(MemorySessionStore::with_token("t"));
        app.start(Route::Users);
        app.apply_outcome(
            ApiOutcome::UsersListed { page: 1, result: Ok(vec![user(1), user(2)]) },
            Instant::now(),
        );
        app.users.select_next();
        app.open_edit();
        app.submit_edit();
        let reqs = app.take_requests();
        assert!(matches!(reqs.last(), Some(ApiRequest::UpdateUser { id: 2, .. })));
        assert!(app.users.is_mutating());

        let t0 = Instant::now();
        let update = match reqs.into_iter().last() {
            Some(ApiRequest::UpdateUser { update, .. }) => update,
            _ => unreachable!(),
        };
        app.apply_outcome(ApiOutcome::UserUpdated { id: 2, update, result: Ok(()) }, t0);
        assert!(matches!(app.modal, Some(ModalState::EditUser(_))));
        app.tick(t0 + edit::EDIT_CLOSE_DELAY);
        assert!(app.modal.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn theme_parse_color_accepts_hex_and_reset() {
        assert_eq!(Theme::parse_color("#0a0B0c"), Some(Color::Rgb(10, 11, 12)));
        assert_eq!(Theme::parse_color("RESET"), Some(Color::Reset));
        assert_eq!(Theme::parse_color("blue"), None);
    }
}
