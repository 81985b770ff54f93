//! Catalogue items.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A single catalogued book.
///
/// Availability is private: it only changes through [`Book::borrow`] and
/// [`Book::return_book`], which keep the holder and loan date in step with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: String,
    isbn: String,
    available: bool,
    #[serde(default)]
    borrowed_by: Option<String>,
    #[serde(default)]
    borrow_date: Option<DateTime<Local>>,
}

impl Book {
    /// Creates an available book.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            available: true,
            borrowed_by: None,
            borrow_date: None,
        }
    }

    /// The ISBN identifying this book.
    #[must_use]
    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    /// Whether the book can be borrowed.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available
    }

    /// Member ID of the current holder.
    #[must_use]
    pub fn borrowed_by(&self) -> Option<&str> {
        self.borrowed_by.as_deref()
    }

    /// When the current loan started.
    #[must_use]
    pub const fn borrow_date(&self) -> Option<DateTime<Local>> {
        self.borrow_date
    }

    /// Marks the book as lent to `member_id`.
    ///
    /// Returns `false` and changes nothing if the book is already on loan.
    pub fn borrow(&mut self, member_id: &str, at: DateTime<Local>) -> bool {
        if !self.available {
            return false;
        }
        self.available = false;
        self.borrowed_by = Some(member_id.to_string());
        self.borrow_date = Some(at);
        true
    }

    /// Marks the book as back on the shelf.
    pub fn return_book(&mut self) {
        self.available = true;
        self.borrowed_by = None;
        self.borrow_date = None;
    }

    /// Multi-line description for display.
    #[must_use]
    pub fn info(&self) -> String {
        let status = match self.borrowed_by() {
            Some(member) if !self.available => format!("Borrowed by {member}"),
            _ if !self.available => "Borrowed".to_string(),
            _ => "Available".to_string(),
        };
        format!(
            "Title: {}\nAuthor: {}\nISBN: {}\nStatus: {status}",
            self.title, self.author, self.isbn
        )
    }

    /// Case-insensitive substring match against title, author or ISBN.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
            || self.isbn.to_lowercase().contains(needle)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} (ISBN: {})", self.title, self.author, self.isbn)
    }
}
