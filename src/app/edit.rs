//! Edit workflow for a single user record.
//!
//! The form holds a staged copy of the editable fields. It stays open on
//! failure so the user can retry, and asks to be closed a short while after a
//! successful save.
use std::time::{Duration, Instant};

use tracing::warn;

use crate::api::{UserRecord, UserUpdate};
use crate::error::ApiError;

/// Time the success confirmation stays visible before the modal closes.
pub const EDIT_CLOSE_DELAY: Duration = Duration::from_millis(1500);

pub const MSG_EDIT_SAVED: &str = "User successfully updated!";
pub const MSG_EDIT_FAILED: &str = "Failed to update user";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditField {
    FirstName,
    LastName,
    Email,
}

impl EditField {
    pub fn next(self) -> Self {
        match self {
            EditField::FirstName => EditField::LastName,
            EditField::LastName => EditField::Email,
            EditField::Email => EditField::FirstName,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            EditField::FirstName => EditField::Email,
            EditField::LastName => EditField::FirstName,
            EditField::Email => EditField::LastName,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EditField::FirstName => "First Name",
            EditField::LastName => "Last Name",
            EditField::Email => "Email",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditPhase {
    Editing,
    Saving,
    Saved { at: Instant },
}

#[derive(Clone, Debug)]
pub struct EditForm {
    pub user_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub focus: EditField,
    pub phase: EditPhase,
    pub error: Option<String>,
}

impl EditForm {
    pub fn open(user: &UserRecord) -> Self {
        Self {
            user_id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            focus: EditField::FirstName,
            phase: EditPhase::Editing,
            error: None,
        }
    }

    pub fn staged(&self) -> UserUpdate {
        UserUpdate {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn value(&self, field: EditField) -> &str {
        match field {
            EditField::FirstName => &self.first_name,
            EditField::LastName => &self.last_name,
            EditField::Email => &self.email,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            EditField::FirstName => &mut self.first_name,
            EditField::LastName => &mut self.last_name,
            EditField::Email => &mut self.email,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.phase == EditPhase::Editing
    }

    pub fn insert_char(&mut self, c: char) {
        if self.is_editable() {
            self.focused_mut().push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.is_editable() {
            self.focused_mut().pop();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Move to `Saving` and hand back what to send. `None` unless editing.
    pub fn submit(&mut self) -> Option<(u64, UserUpdate)> {
        if !self.is_editable() {
            return None;
        }
        self.phase = EditPhase::Saving;
        self.error = None;
        Some((self.user_id, self.staged()))
    }

    pub fn on_result(&mut self, result: &Result<(), ApiError>, now: Instant) {
        if self.phase != EditPhase::Saving {
            return;
        }
        match result {
            Ok(()) => self.phase = EditPhase::Saved { at: now },
            Err(e) => {
                warn!(id = self.user_id, error = %e, "Edit not saved");
                self.phase = EditPhase::Editing;
                self.error = Some(MSG_EDIT_FAILED.to_string());
            }
        }
    }

    /// True once the confirmation has been visible for `EDIT_CLOSE_DELAY`.
    pub fn should_close(&self, now: Instant) -> bool {
        match self.phase {
            EditPhase::Saved { at } => now.saturating_duration_since(at) >= EDIT_CLOSE_DELAY,
            _ => false,
        }
    }
}
