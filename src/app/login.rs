//! Login controller: `Form -> Submitting -> Success | Error`.
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::api::ApiRequest;
use crate::error::ApiError;
use crate::session::SessionStore;

/// Time "Login successful!" is shown before moving to the user list.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const MSG_FIELDS_REQUIRED: &str = "Email and password are required";
pub const MSG_SESSION_NOT_SAVED: &str = "Could not save session";
pub const MSG_NO_TOKEN: &str = "Login failed: no token received";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginPhase {
    Form,
    Submitting,
    Success { at: Instant },
    /// Inline message; the form stays editable.
    Error(String),
}

#[derive(Clone, Debug)]
pub struct LoginController {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub phase: LoginPhase,
}

impl LoginController {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: LoginField::Email,
            phase: LoginPhase::Form,
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self.phase, LoginPhase::Form | LoginPhase::Error(_))
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn insert_char(&mut self, c: char) {
        if !self.is_editable() {
            return;
        }
        match self.focus {
            LoginField::Email => self.email.push(c),
            LoginField::Password => self.password.push(c),
        }
    }

    pub fn backspace(&mut self) {
        if !self.is_editable() {
            return;
        }
        match self.focus {
            LoginField::Email => self.email.pop(),
            LoginField::Password => self.password.pop(),
        };
    }

    /// Validate locally and produce the authenticate call.
    pub fn submit(&mut self) -> Option<ApiRequest> {
        if !self.is_editable() {
            return None;
        }
        if self.email.trim().is_empty() || self.password.is_empty() {
            self.phase = LoginPhase::Error(MSG_FIELDS_REQUIRED.to_string());
            return None;
        }
        self.phase = LoginPhase::Submitting;
        Some(ApiRequest::Authenticate {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    /// Persist the token on success. Any failure leaves the store untouched.
    pub fn on_authenticated(
        &mut self,
        result: Result<String, ApiError>,
        session: &mut dyn SessionStore,
        now: Instant,
    ) {
        if self.phase != LoginPhase::Submitting {
            debug!("Ignoring login response outside of submit");
            return;
        }
        match result {
            Ok(token) if token.trim().is_empty() => {
                warn!(email = %self.email, "Login response carried an empty token");
                self.phase = LoginPhase::Error(MSG_NO_TOKEN.to_string());
            }
            Ok(token) => match session.set_token(token.trim()) {
                Ok(()) => {
                    info!(email = %self.email, "Logged in");
                    self.password.clear();
                    self.phase = LoginPhase::Success { at: now };
                }
                Err(e) => {
                    warn!(error = %e, "Storing session token failed");
                    self.phase = LoginPhase::Error(MSG_SESSION_NOT_SAVED.to_string());
                }
            },
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.phase = LoginPhase::Error(MSG_INVALID_CREDENTIALS.to_string());
            }
        }
    }

    pub fn redirect_due(&self, now: Instant) -> bool {
        match self.phase {
            LoginPhase::Success { at } => now.saturating_duration_since(at) >= REDIRECT_DELAY,
            _ => false,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            LoginPhase::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

impl Default for LoginController {
    fn default() -> Self {
        Self::new()
    }
}
