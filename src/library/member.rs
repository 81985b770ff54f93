//! Registered patrons.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A registered library member and the ISBNs they currently hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member's display name.
    pub name: String,
    member_id: String,
    #[serde(default)]
    borrowed_books: Vec<String>,
    #[serde(default = "Local::now")]
    registration_date: DateTime<Local>,
}

impl Member {
    /// Creates a member registered now with nothing on loan.
    pub fn new(name: impl Into<String>, member_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            member_id: member_id.into(),
            borrowed_books: Vec::new(),
            registration_date: Local::now(),
        }
    }

    /// The unique member ID.
    #[must_use]
    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    /// ISBNs on loan, oldest first.
    #[must_use]
    pub fn borrowed_books(&self) -> &[String] {
        &self.borrowed_books
    }

    /// Number of books on loan.
    #[must_use]
    pub fn borrowed_count(&self) -> usize {
        self.borrowed_books.len()
    }

    /// Whether `isbn` is on loan to this member.
    #[must_use]
    pub fn has_borrowed(&self, isbn: &str) -> bool {
        self.borrowed_books.iter().any(|b| b == isbn)
    }

    /// When the member registered.
    #[must_use]
    pub const fn registration_date(&self) -> DateTime<Local> {
        self.registration_date
    }

    /// Records `isbn` as on loan. Returns `false` if it already was.
    pub fn add_borrowed(&mut self, isbn: &str) -> bool {
        if self.has_borrowed(isbn) {
            return false;
        }
        self.borrowed_books.push(isbn.to_string());
        true
    }

    /// Drops `isbn` from the loan list. Returns `false` if it was not there.
    pub fn remove_borrowed(&mut self, isbn: &str) -> bool {
        match self.borrowed_books.iter().position(|b| b == isbn) {
            Some(index) => {
                self.borrowed_books.remove(index);
                true
            }
            None => false,
        }
    }

    /// Multi-line description for display.
    #[must_use]
    pub fn info(&self) -> String {
        format!(
            "Name: {}\nMember ID: {}\nRegistered: {}\nBooks Borrowed: {}",
            self.name,
            self.member_id,
            self.registration_date.format("%Y-%m-%d"),
            self.borrowed_books.len()
        )
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.member_id)
    }
}
