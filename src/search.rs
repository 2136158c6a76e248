use crate::api::UserRecord;
use crate::app::users::UserListController;

/// Case-insensitive substring match over first name, last name and email.
/// An empty query matches everything.
pub fn matches_query(user: &UserRecord, query: &str) -> bool {
    let q = query.to_lowercase();
    q.is_empty()
        || user.first_name.to_lowercase().contains(&q)
        || user.last_name.to_lowercase().contains(&q)
        || user.email.to_lowercase().contains(&q)
}

pub fn filter_users(users: &[UserRecord], query: &str) -> Vec<UserRecord> {
    if query.is_empty() {
        return users.to_vec();
    }
    users
        .iter()
        .filter(|u| matches_query(u, query))
        .cloned()
        .collect()
}

/// Recompute the visible list from the fetched page and the current search term.
pub fn apply_search(list: &mut UserListController) {
    list.visible = filter_users(&list.fetched, &list.search_query);
    list.selected = list.selected.min(list.visible.len().saturating_sub(1));
}
