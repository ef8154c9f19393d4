//! Project invite codes.
//!
//! A code is generated once when the project is created and never changes.

use rand::Rng;

/// Length of a generated invite code.
pub const INVITE_CODE_LENGTH: usize = 12;

/// Upper bound accepted on input, to reject junk before hitting the database.
pub const MAX_INVITE_CODE_LENGTH: usize = 64;

/// Generate a new random alphanumeric invite code.
pub fn generate_invite_code() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(INVITE_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Normalize a user-supplied code. Returns `None` if it cannot be a valid code.
pub fn normalize_invite_code(raw: &str) -> Option<&str> {
    let code = raw.trim();
    if code.is_empty()
        || code.len() > MAX_INVITE_CODE_LENGTH
        || !code.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(code)
}
