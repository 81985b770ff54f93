//! Administrative accounts.
//!
//! Passwords are never stored; only their SHA-256 digest (lowercase hex) is
//! kept and persisted.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// ID of the account seeded on first run.
pub const DEFAULT_LIBRARIAN_ID: &str = "LIB001";

/// Password of the account seeded on first run.
pub const DEFAULT_LIBRARIAN_PASSWORD: &str = "admin123";

/// Display name of the account seeded on first run.
pub const DEFAULT_LIBRARIAN_NAME: &str = "Administrator";

/// Hashes a password for storage or comparison.
#[must_use]
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// A librarian account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Librarian {
    /// Display name.
    #[serde(default)]
    pub name: String,
    librarian_id: String,
    password_hash: String,
    #[serde(default)]
    login_history: Vec<DateTime<Local>>,
}

impl Librarian {
    /// Creates an account with the given plain-text password.
    pub fn new(
        name: impl Into<String>,
        librarian_id: impl Into<String>,
        password: &str,
    ) -> Self {
        Self {
            name: name.into(),
            librarian_id: librarian_id.into(),
            password_hash: hash_password(password),
            login_history: Vec::new(),
        }
    }

    /// The account seeded when no librarian exists yet.
    #[must_use]
    pub fn default_admin() -> Self {
        Self::new(
            DEFAULT_LIBRARIAN_NAME,
            DEFAULT_LIBRARIAN_ID,
            DEFAULT_LIBRARIAN_PASSWORD,
        )
    }

    /// The unique librarian ID.
    #[must_use]
    pub fn librarian_id(&self) -> &str {
        &self.librarian_id
    }

    /// Successful logins, oldest first.
    #[must_use]
    pub fn login_history(&self) -> &[DateTime<Local>] {
        &self.login_history
    }

    /// Number of successful logins.
    #[must_use]
    pub fn login_count(&self) -> usize {
        self.login_history.len()
    }

    /// Time of the most recent successful login.
    #[must_use]
    pub fn last_login(&self) -> Option<DateTime<Local>> {
        self.login_history.last().copied()
    }

    fn password_matches(&self, password: &str) -> bool {
        self.password_hash == hash_password(password)
    }

    /// Checks `password`, recording a login on success.
    pub fn authenticate(&mut self, password: &str) -> bool {
        if !self.password_matches(password) {
            return false;
        }
        self.login_history.push(Local::now());
        true
    }

    /// Replaces the password if `old_password` is correct.
    pub fn change_password(&mut self, old_password: &str, new_password: &str) -> bool {
        if !self.password_matches(old_password) {
            return false;
        }
        self.password_hash = hash_password(new_password);
        true
    }

    /// Multi-line description for display.
    #[must_use]
    pub fn info(&self) -> String {
        let last_login = self.last_login().map_or_else(
            || "Never".to_string(),
            |t| t.format("%Y-%m-%d %H:%M").to_string(),
        );
        format!(
            "Name: {}\nLibrarian ID: {}\nLogin Count: {}\nLast Login: {last_login}",
            self.name,
            self.librarian_id,
            self.login_count()
        )
    }
}

impl fmt::Display for Librarian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Librarian {} (ID: {})", self.name, self.librarian_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_hex_sha256() {
        let hash = hash_password("admin123");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(hash, hash_password("admin124"));
    }

    #[test]
    fn authenticate_records_login() {
        let mut lib = Librarian::default_admin();
        assert_eq!(lib.login_count(), 0);
        assert!(lib.last_login().is_none());

        assert!(!lib.authenticate("wrong"));
        assert_eq!(lib.login_count(), 0);

        assert!(lib.authenticate(DEFAULT_LIBRARIAN_PASSWORD));
        assert!(lib.authenticate(DEFAULT_LIBRARIAN_PASSWORD));
        assert_eq!(lib.login_count(), 2);
        assert!(lib.last_login().is_some());
    }

    #[test]
    fn change_password_requires_old() {
        let mut lib = Librarian::new("Ann", "LIB002", "secret");
        assert!(!lib.change_password("nope", "new"));
        assert!(lib.authenticate("secret"));

        assert!(lib.change_password("secret", "new"));
        assert!(!lib.authenticate("secret"));
        assert!(lib.authenticate("new"));
    }

    #[test]
    fn serialised_form_has_no_plain_password() {
        let lib = Librarian::default_admin();
        let json = serde_json::to_string(&lib).unwrap();
        assert!(!json.contains(DEFAULT_LIBRARIAN_PASSWORD));
        assert!(json.contains("password_hash"));
    }

    #[test]
    fn info_before_first_login() {
        let lib = Librarian::default_admin();
        assert!(lib.info().ends_with("Last Login: Never"));
        assert_eq!(lib.to_string(), "Librarian Administrator (ID: LIB001)");
    }
}
