// Keep user naming logic in one place so handlers stay thin.

use teloxide::types::User;

const FALLBACK_NAME: &str = "there";

// Name used when addressing a user: first name, else @username, else a neutral fallback.
pub fn display_name(user: Option<&User>) -> String {
    let Some(user) = user else {
        return FALLBACK_NAME.to_string();
    };

    let first = user.first_name.trim();
    if !first.is_empty() {
        return first.to_string();
    }

    user.username
        .as_deref()
        .map(|u| format!("@{u}"))
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}
