//! API route handlers.

use regex::Regex;

pub mod auth;
pub mod health;

/// Usernames are 3-32 chars: lowercase letters, digits, `.`, `_` or `-`,
/// starting with a letter or digit.
pub fn valid_username(username: &str) -> bool {
    Regex::new(r"^[a-z0-9][a-z0-9._-]{2,31}$").is_ok_and(|re| re.is_match(username))
}

/// Passwords must be 12-128 characters.
pub fn valid_password(password: &str) -> bool {
    (12..=128).contains(&password.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(valid_username("ana"));
        assert!(valid_username("ana.maria_99"));
        assert!(!valid_username("an"));
        assert!(!valid_username("Ana"));
        assert!(!valid_username(".ana"));
        assert!(!valid_username("ana maria"));
    }

    #[test]
    fn password_rules() {
        assert!(valid_password("a-long-enough-password"));
        assert!(!valid_password("short"));
        assert!(!valid_password(&"x".repeat(129)));
    }
}
