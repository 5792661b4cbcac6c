use serde::{Deserialize, Serialize};

/// Profile document stored at `users/{uid}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Identity attached to a server session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub uid: String,
    pub email: String,
    pub display_name: String,
}

/// Display name for a new account: the given name when it has content,
/// otherwise the local part of the email
pub fn resolve_display_name(display_name: Option<&str>, email: &str) -> String {
    match display_name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => email.split('@').next().unwrap_or(email).to_string(),
    }
}
