//! User list controller: page cursor, fetched page, filtered view and banners.
//!
//! Phases: `Idle -> Loading -> Loaded | ErrorShown`, and `Loaded -> Mutating -> Loaded`
//! around a delete or update. Search changes only recompute the view.
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::api::{ApiRequest, UserRecord, UserUpdate};
use crate::error::ApiError;
use crate::search::apply_search;

/// How long a success/failure banner stays up unless dismissed.
pub const BANNER_TTL: Duration = Duration::from_secs(3);

pub const MSG_USER_DELETED: &str = "User deleted successfully!";
pub const MSG_DELETE_FAILED: &str = "Failed to delete user";
pub const MSG_USER_UPDATED: &str = "User updated successfully!";
pub const MSG_UPDATE_FAILED: &str = "Failed to update user";
pub const MSG_NO_USERS: &str = "No users available";
pub const MSG_LOAD_FAILED: &str = "Failed to load users";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading,
    Loaded,
    /// A delete or update is in flight.
    Mutating,
    ErrorShown(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Failure,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    pub shown_at: Instant,
}

impl Banner {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= BANNER_TTL
    }
}

#[derive(Clone, Debug)]
pub struct UserListController {
    /// 1-based page cursor; no upper bound is known.
    pub page: u32,
    /// Server response for the last completed fetch.
    pub fetched: Vec<UserRecord>,
    /// `fetched` filtered by `search_query`.
    pub visible: Vec<UserRecord>,
    pub search_query: String,
    /// Index into `visible`.
    pub selected: usize,
    pub phase: ListPhase,
    pub banner: Option<Banner>,
}

impl UserListController {
    pub fn new() -> Self {
        Self {
            page: 1,
            fetched: Vec::new(),
            visible: Vec::new(),
            search_query: String::new(),
            selected: 0,
            phase: ListPhase::Idle,
            banner: None,
        }
    }

    /// Entering the list view loads the current page.
    pub fn mount(&mut self) -> ApiRequest {
        self.begin_fetch()
    }

    pub fn reload(&mut self) -> ApiRequest {
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> ApiRequest {
        info!(page = self.page, "Loading users");
        self.phase = ListPhase::Loading;
        ApiRequest::ListUsers { page: self.page }
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 1
    }

    /// Next is offered while the current view has something in it.
    pub fn can_go_next(&self) -> bool {
        !self.visible.is_empty()
    }

    pub fn next_page(&mut self) -> Option<ApiRequest> {
        if !self.can_go_next() {
            return None;
        }
        self.page += 1;
        self.selected = 0;
        Some(self.begin_fetch())
    }

    pub fn prev_page(&mut self) -> Option<ApiRequest> {
        if !self.can_go_prev() {
            return None;
        }
        self.page -= 1;
        self.selected = 0;
        Some(self.begin_fetch())
    }

    /// Apply a page response. Responses are applied in arrival order even if
    /// the cursor has moved on since the request was sent.
    pub fn on_users_listed(&mut self, page: u32, result: Result<Vec<UserRecord>, ApiError>) {
        if page != self.page {
            debug!(response_page = page, current_page = self.page, "Applying response for a previous cursor");
        }
        match result {
            Ok(users) => {
                info!(page, count = users.len(), "Users loaded");
                self.fetched = users;
                self.phase = ListPhase::Loaded;
            }
            Err(e) => {
                // The last good page stays on screen.
                warn!(page, error = %e, "Loading users failed");
                self.phase = ListPhase::ErrorShown(MSG_LOAD_FAILED.to_string());
            }
        }
        apply_search(self);
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        apply_search(self);
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_query.push(c);
        apply_search(self);
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
        apply_search(self);
    }

    pub fn begin_delete(&mut self, id: u64) -> ApiRequest {
        info!(id, "Deleting user");
        self.phase = ListPhase::Mutating;
        ApiRequest::DeleteUser { id }
    }

    pub fn begin_update(&mut self, id: u64, update: UserUpdate) -> ApiRequest {
        info!(id, "Updating user");
        self.phase = ListPhase::Mutating;
        ApiRequest::UpdateUser { id, update }
    }

    /// Remove the record with `id` only if the server acknowledged the delete.
    pub fn on_user_deleted(&mut self, id: u64, result: Result<(), ApiError>, now: Instant) {
        match result {
            Ok(()) => {
                self.fetched.retain(|u| u.id != id);
                self.show_banner(BannerKind::Success, MSG_USER_DELETED, now);
            }
            Err(e) => {
                warn!(id, error = %e, "Delete failed");
                self.show_banner(BannerKind::Failure, MSG_DELETE_FAILED, now);
            }
        }
        self.finish_mutation();
    }

    /// Replace the editable fields of the record with `id` on success.
    pub fn on_user_updated(
        &mut self,
        id: u64,
        update: &UserUpdate,
        result: Result<(), ApiError>,
        now: Instant,
    ) {
        match result {
            Ok(()) => {
                for user in self.fetched.iter_mut().filter(|u| u.id == id) {
                    *user = user.with_update(update);
                }
                self.show_banner(BannerKind::Success, MSG_USER_UPDATED, now);
            }
            Err(e) => {
                warn!(id, error = %e, "Update failed");
                self.show_banner(BannerKind::Failure, MSG_UPDATE_FAILED, now);
            }
        }
        self.finish_mutation();
    }

    fn finish_mutation(&mut self) {
        // A page change while mutating already moved us to Loading.
        if self.phase == ListPhase::Mutating {
            self.phase = ListPhase::Loaded;
        }
        apply_search(self);
    }

    /// Raise a failure banner for something outside the list's own calls.
    pub fn notify_failure(&mut self, text: &str, now: Instant) {
        self.show_banner(BannerKind::Failure, text, now);
    }

    fn show_banner(&mut self, kind: BannerKind, text: &str, now: Instant) {
        self.banner = Some(Banner {
            kind,
            text: text.to_string(),
            shown_at: now,
        });
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Expire the banner once its display time has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if self.banner.as_ref().is_some_and(|b| b.is_expired(now)) {
            self.banner = None;
        }
    }

    pub fn is_mutating(&self) -> bool {
        self.phase == ListPhase::Mutating
    }

    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.visible.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Load failure to show alongside rows kept from the last good page.
    pub fn load_error(&self) -> Option<&str> {
        match &self.phase {
            ListPhase::ErrorShown(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Message for an empty view, distinguishing load failures from empty pages.
    pub fn empty_message(&self) -> &str {
        match &self.phase {
            ListPhase::ErrorShown(msg) => msg.as_str(),
            ListPhase::Idle | ListPhase::Loading => "Loading users...",
            ListPhase::Loaded | ListPhase::Mutating => MSG_NO_USERS,
        }
    }
}

impl Default for UserListController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_user(id: u64, first: &str, last: &str) -> UserRecord {
        UserRecord {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
            avatar: format!("https://reqres.in/img/faces/{id}-image.jpg"),
        }
    }

    fn loaded() -> UserListController {
        let mut list = UserListController::new();
        let _ = list.mount();
        list.on_users_listed(
            1,
            Ok(vec![
                mk_user(1, "George", "Bluth"),
                mk_user(2, "Janet", "Weaver"),
                mk_user(3, "Emma", "Wong"),
            ]),
        );
        list
    }

    #[test]
    fn mount_requests_current_page() {
        let mut list = UserListController::new();
        assert_eq!(list.mount(), ApiRequest::ListUsers { page: 1 });
        assert_eq!(list.phase, ListPhase::Loading);
    }

    #[test]
    fn fetch_failure_is_distinct_from_empty_page() {
        let mut list = UserListController::new();
        let _ = list.mount();
        list.on_users_listed(1, Err(ApiError::Fetch("HTTP 500".into())));
        assert_eq!(list.phase, ListPhase::ErrorShown(MSG_LOAD_FAILED.into()));
        assert!(list.visible.is_empty());
        assert_eq!(list.empty_message(), MSG_LOAD_FAILED);

        let _ = list.reload();
        list.on_users_listed(1, Ok(vec![]));
        assert_eq!(list.empty_message(), MSG_NO_USERS);
        assert_eq!(list.load_error(), None);
    }

    #[test]
    fn failed_reload_keeps_last_good_page_and_search() {
        let mut list = loaded();
        list.set_search_query("george");
        let _ = list.reload();
        list.on_users_listed(1, Err(ApiError::Fetch("HTTP 503".into())));

        let ids: Vec<u64> = list.visible.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(list.fetched.len(), 3);
        assert_eq!(list.load_error(), Some(MSG_LOAD_FAILED));
    }

    #[test]
    fn delete_success_removes_only_that_id() {
        let mut list = loaded();
        let now = Instant::now();
        assert_eq!(list.begin_delete(2), ApiRequest::DeleteUser { id: 2 });
        assert!(list.is_mutating());

        list.on_user_deleted(2, Ok(()), now);
        let ids: Vec<u64> = list.fetched.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(list.phase, ListPhase::Loaded);
        let banner = list.banner.clone().unwrap();
        assert_eq!(banner.kind, BannerKind::Success);
        assert_eq!(banner.text, MSG_USER_DELETED);
    }

    #[test]
    fn delete_failure_leaves_list_unchanged() {
        let mut list = loaded();
        let before = list.fetched.clone();
        let _ = list.begin_delete(2);
        list.on_user_deleted(2, Err(ApiError::Delete("HTTP 500".into())), Instant::now());
        assert_eq!(list.fetched, before);
        assert_eq!(list.banner.as_ref().unwrap().text, MSG_DELETE_FAILED);
        assert_eq!(list.phase, ListPhase::Loaded);
    }

    #[test]
    fn update_failure_leaves_list_unchanged() {
        let mut list = loaded();
        let before = list.fetched.clone();
        let update = UserUpdate {
            first_name: "Jan".into(),
            last_name: "Weaver".into(),
            email: "jan@example.com".into(),
        };
        let _ = list.begin_update(2, update.clone());
        list.on_user_updated(2, &update, Err(ApiError::Update("HTTP 500".into())), Instant::now());
        assert_eq!(list.fetched, before);
        let banner = list.banner.as_ref().unwrap();
        assert_eq!(banner.kind, BannerKind::Failure);
        assert_eq!(banner.text, MSG_UPDATE_FAILED);
        assert_eq!(list.phase, ListPhase::Loaded);
    }

    #[test]
    fn update_reconciles_only_matching_id() {
        let mut list = loaded();
        let update = UserUpdate {
            first_name: "Jan".into(),
            last_name: "Weaver-Smith".into(),
            email: "jan@example.com".into(),
        };
        let _ = list.begin_update(2, update.clone());
        list.on_user_updated(2, &update, Ok(()), Instant::now());

        assert_eq!(list.fetched[0], mk_user(1, "George", "Bluth"));
        assert_eq!(list.fetched[1].email, "jan@example.com");
        assert_eq!(list.fetched[1].avatar, "https://reqres.in/img/faces/2-image.jpg");
        assert_eq!(list.fetched[2], mk_user(3, "Emma", "Wong"));
        assert_eq!(list.banner.as_ref().unwrap().text, MSG_USER_UPDATED);
    }

    #[test]
    fn banner_expires_after_three_seconds_or_on_dismiss() {
        let mut list = loaded();
        let t0 = Instant::now();
        let _ = list.begin_delete(1);
        list.on_user_deleted(1, Ok(()), t0);

        list.tick(t0 + Duration::from_millis(2999));
        assert!(list.banner.is_some());
        list.tick(t0 + BANNER_TTL);
        assert!(list.banner.is_none());

        let _ = list.begin_delete(3);
        list.on_user_deleted(3, Ok(()), t0);
        list.dismiss_banner();
        assert!(list.banner.is_none());
    }

    #[test]
    fn paging_floors_at_one_and_stops_on_empty_view() {
        let mut list = loaded();
        assert_eq!(list.prev_page(), None);
        assert_eq!(list.page, 1);

        assert_eq!(list.next_page(), Some(ApiRequest::ListUsers { page: 2 }));
        list.on_users_listed(2, Ok(vec![]));
        assert!(!list.can_go_next());
        assert_eq!(list.next_page(), None);
        assert_eq!(list.page, 2);

        assert_eq!(list.prev_page(), Some(ApiRequest::ListUsers { page: 1 }));
        assert_eq!(list.phase, ListPhase::Loading);
    }

    #[test]
    fn stale_page_response_is_still_applied() {
        let mut list = loaded();
        let _ = list.next_page();
        list.on_users_listed(1, Ok(vec![mk_user(9, "Old", "Page")]));
        assert_eq!(list.page, 2);
        assert_eq!(list.fetched[0].id, 9);
    }

    #[test]
    fn search_narrows_view_without_touching_fetched() {
        let mut list = loaded();
        list.set_search_query("WONG");
        assert_eq!(list.visible.len(), 1);
        assert_eq!(list.fetched.len(), 3);
        assert_eq!(list.phase, ListPhase::Loaded);
        list.pop_search_char();
        list.set_search_query("");
        assert_eq!(list.visible.len(), 3);
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut list = loaded();
        list.select_prev();
        assert_eq!(list.selected, 0);
        for _ in 0..10 {
            list.select_next();
        }
        assert_eq!(list.selected, 2);
        assert_eq!(list.selected_user().unwrap().id, 3);
    }
}
