/// Canonical form of a username. Used for storage, duplicate checks and login lookups.
pub fn normalize_username(username: &str) -> String {
    username.to_lowercase()
}

/// Usernames are stored as the lowercased input, so padding would be kept verbatim.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("username cannot be empty".to_string());
    }
    if username.trim() != username {
        return Err("username cannot start or end with whitespace".to_string());
    }
    Ok(())
}
