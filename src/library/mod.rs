//! Catalogue, membership and lending.
//!
//! [`Library`] owns every [`Book`], [`Member`] and [`Librarian`] and is the only
//! place where a loan is created or closed, so the two sides of a loan (the
//! book's availability and the member's borrowed list) always move together.
//!
//! # Lending state
//!
//! ```text
//!              borrow_book
//!   Available ─────────────▶ Borrowed
//!       ▲                       │
//!       └───────────────────────┘
//!              return_book
//! ```
//!
//! A book is `Borrowed` if and only if exactly one member lists its ISBN.
//! [`Library::check_consistency`] reports data (usually loaded from disk) that
//! breaks this rule.

pub mod book;
pub mod error;
pub mod librarian;
pub mod member;

pub use book::Book;
pub use error::{LibraryError, LibraryResult};
pub use librarian::Librarian;
pub use member::Member;

use std::collections::HashMap;
use std::fmt;

use chrono::Local;
use indexmap::IndexMap;

/// Name used when none is configured.
pub const DEFAULT_LIBRARY_NAME: &str = "City Library";

/// Counts reported by [`Library::statistics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Books in the catalogue.
    pub total_books: usize,
    /// Books on the shelf.
    pub available_books: usize,
    /// Books on loan.
    pub borrowed_books: usize,
    /// Registered members.
    pub total_members: usize,
}

/// A breach of the lending invariant found by [`Library::check_consistency`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// Book is marked borrowed but no member holds it.
    BorrowedWithoutHolder {
        /// The book's ISBN.
        isbn: String,
    },
    /// A member holds a book that is marked available.
    HeldButAvailable {
        /// The book's ISBN.
        isbn: String,
        /// The member listing it.
        member_id: String,
    },
    /// More than one member holds the same book.
    MultipleHolders {
        /// The book's ISBN.
        isbn: String,
        /// Every member listing it.
        member_ids: Vec<String>,
    },
    /// A member holds an ISBN that is not catalogued.
    UnknownBook {
        /// The missing ISBN.
        isbn: String,
        /// The member listing it.
        member_id: String,
    },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BorrowedWithoutHolder { isbn } => {
                write!(f, "book {isbn} is marked borrowed but no member holds it")
            }
            Self::HeldButAvailable { isbn, member_id } => {
                write!(f, "member {member_id} holds book {isbn}, which is marked available")
            }
            Self::MultipleHolders { isbn, member_ids } => {
                write!(f, "book {isbn} is held by several members: {}", member_ids.join(", "))
            }
            Self::UnknownBook { isbn, member_id } => {
                write!(f, "member {member_id} holds unknown book {isbn}")
            }
        }
    }
}

/// The library: every book, member and librarian, keyed by ID.
///
/// Collections keep insertion order so listings are stable across runs.
#[derive(Debug, Clone)]
pub struct Library {
    name: String,
    books: IndexMap<String, Book>,
    members: IndexMap<String, Member>,
    librarians: IndexMap<String, Librarian>,
    max_books_per_member: Option<usize>,
}

impl Default for Library {
    fn default() -> Self {
        Self::new(DEFAULT_LIBRARY_NAME)
    }
}

impl Library {
    /// Creates an empty library with no borrowing limit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            books: IndexMap::new(),
            members: IndexMap::new(),
            librarians: IndexMap::new(),
            max_books_per_member: None,
        }
    }

    /// Builds a library from previously stored collections.
    ///
    /// Later duplicates of an ID replace earlier ones.
    pub fn from_parts(
        name: impl Into<String>,
        books: Vec<Book>,
        members: Vec<Member>,
        librarians: Vec<Librarian>,
    ) -> Self {
        let mut library = Self::new(name);
        library.books = books
            .into_iter()
            .map(|b| (b.isbn().to_string(), b))
            .collect();
        library.members = members
            .into_iter()
            .map(|m| (m.member_id().to_string(), m))
            .collect();
        library.librarians = librarians
            .into_iter()
            .map(|l| (l.librarian_id().to_string(), l))
            .collect();
        library
    }

    /// Sets the per-member loan limit. `None` means unlimited.
    #[must_use]
    pub fn with_borrow_limit(mut self, limit: Option<usize>) -> Self {
        self.max_books_per_member = limit;
        self
    }

    /// The library's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The per-member loan limit, if one is set.
    #[must_use]
    pub const fn borrow_limit(&self) -> Option<usize> {
        self.max_books_per_member
    }

    // ------------------------------------------------------------------
    // Books
    // ------------------------------------------------------------------

    /// Adds a book to the catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::DuplicateIsbn`] if the ISBN is already present.
    pub fn add_book(&mut self, book: Book) -> LibraryResult<()> {
        if self.books.contains_key(book.isbn()) {
            return Err(LibraryError::DuplicateIsbn {
                isbn: book.isbn().to_string(),
            });
        }
        tracing::debug!(isbn = %book.isbn(), title = %book.title, "Added book");
        self.books.insert(book.isbn().to_string(), book);
        Ok(())
    }

    /// Removes a book that is not on loan.
    ///
    /// # Errors
    ///
    /// Returns an error if the book is unknown or currently borrowed.
    pub fn remove_book(&mut self, isbn: &str) -> LibraryResult<Book> {
        let book = self.books.get(isbn).ok_or_else(|| LibraryError::BookNotFound {
            isbn: isbn.to_string(),
        })?;
        if !book.is_available() {
            return Err(LibraryError::BookNotAvailable {
                isbn: isbn.to_string(),
            });
        }
        let removed = self.books.shift_remove(isbn).ok_or_else(|| LibraryError::BookNotFound {
            isbn: isbn.to_string(),
        })?;
        tracing::debug!(isbn, "Removed book");
        Ok(removed)
    }

    /// Looks up a book by ISBN.
    #[must_use]
    pub fn find_book(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// Books whose title contains `title`, ignoring case.
    #[must_use]
    pub fn find_books_by_title(&self, title: &str) -> Vec<&Book> {
        let needle = title.to_lowercase();
        self.books
            .values()
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Books whose author contains `author`, ignoring case.
    #[must_use]
    pub fn find_books_by_author(&self, author: &str) -> Vec<&Book> {
        let needle = author.to_lowercase();
        self.books
            .values()
            .filter(|b| b.author.to_lowercase().contains(&needle))
            .collect()
    }

    /// Books whose title, author or ISBN contains `query`, ignoring case.
    #[must_use]
    pub fn search_books(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books.values().filter(|b| b.matches(&needle)).collect()
    }

    /// All books in catalogue order.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// Books on the shelf, in catalogue order.
    pub fn available_books(&self) -> impl Iterator<Item = &Book> {
        self.books.values().filter(|b| b.is_available())
    }

    /// Books on loan, in catalogue order.
    pub fn borrowed_books(&self) -> impl Iterator<Item = &Book> {
        self.books.values().filter(|b| !b.is_available())
    }

    // ------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------

    /// Registers a new member.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::DuplicateMember`] if the ID is taken.
    pub fn register_member(&mut self, member: Member) -> LibraryResult<()> {
        if self.members.contains_key(member.member_id()) {
            return Err(LibraryError::DuplicateMember {
                member_id: member.member_id().to_string(),
            });
        }
        tracing::debug!(member_id = %member.member_id(), "Registered member");
        self.members.insert(member.member_id().to_string(), member);
        Ok(())
    }

    /// Removes a member with nothing on loan.
    ///
    /// # Errors
    ///
    /// Returns an error if the member is unknown or still holds books.
    pub fn remove_member(&mut self, member_id: &str) -> LibraryResult<Member> {
        let member = self
            .members
            .get(member_id)
            .ok_or_else(|| LibraryError::MemberNotFound {
                member_id: member_id.to_string(),
            })?;
        if member.borrowed_count() > 0 {
            return Err(LibraryError::OutstandingLoans {
                member_id: member_id.to_string(),
                count: member.borrowed_count(),
            });
        }
        let removed =
            self.members
                .shift_remove(member_id)
                .ok_or_else(|| LibraryError::MemberNotFound {
                    member_id: member_id.to_string(),
                })?;
        tracing::debug!(member_id, "Removed member");
        Ok(removed)
    }

    /// Looks up a member by ID.
    #[must_use]
    pub fn find_member(&self, member_id: &str) -> Option<&Member> {
        self.members.get(member_id)
    }

    /// All members in registration order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    // ------------------------------------------------------------------
    // Librarians
    // ------------------------------------------------------------------

    /// Adds a librarian account.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::DuplicateLibrarian`] if the ID is taken.
    pub fn add_librarian(&mut self, librarian: Librarian) -> LibraryResult<()> {
        if self.librarians.contains_key(librarian.librarian_id()) {
            return Err(LibraryError::DuplicateLibrarian {
                librarian_id: librarian.librarian_id().to_string(),
            });
        }
        self.librarians
            .insert(librarian.librarian_id().to_string(), librarian);
        Ok(())
    }

    /// Looks up a librarian by ID.
    #[must_use]
    pub fn find_librarian(&self, librarian_id: &str) -> Option<&Librarian> {
        self.librarians.get(librarian_id)
    }

    /// Looks up a librarian by ID for modification.
    pub fn find_librarian_mut(&mut self, librarian_id: &str) -> Option<&mut Librarian> {
        self.librarians.get_mut(librarian_id)
    }

    /// All librarian accounts in creation order.
    pub fn librarians(&self) -> impl Iterator<Item = &Librarian> {
        self.librarians.values()
    }

    /// Adds the default administrator if there are no librarians at all.
    ///
    /// Returns `true` if the account was created.
    pub fn seed_default_librarian(&mut self) -> bool {
        if !self.librarians.is_empty() {
            return false;
        }
        let admin = Librarian::default_admin();
        tracing::info!(
            librarian_id = %admin.librarian_id(),
            "No librarian accounts found, created default account"
        );
        self.librarians
            .insert(admin.librarian_id().to_string(), admin);
        true
    }

    /// Logs a librarian in.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown ID or a wrong password.
    pub fn authenticate(&mut self, librarian_id: &str, password: &str) -> LibraryResult<&Librarian> {
        let librarian =
            self.librarians
                .get_mut(librarian_id)
                .ok_or_else(|| LibraryError::LibrarianNotFound {
                    librarian_id: librarian_id.to_string(),
                })?;
        if !librarian.authenticate(password) {
            tracing::warn!(librarian_id, "Failed login attempt");
            return Err(LibraryError::InvalidCredentials);
        }
        tracing::info!(librarian_id, "Librarian logged in");
        Ok(&*librarian)
    }

    // ------------------------------------------------------------------
    // Lending
    // ------------------------------------------------------------------

    /// Lends a book to a member.
    ///
    /// A book counts as unavailable if its flag is cleared or any member
    /// already lists its ISBN. All checks run before anything is modified,
    /// so a rejected loan leaves the library untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the member or book is unknown, the book is on loan,
    /// or the member has reached the borrowing limit.
    pub fn borrow_book(&mut self, member_id: &str, isbn: &str) -> LibraryResult<&Book> {
        let already_held = self.members.values().any(|m| m.has_borrowed(isbn));
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| LibraryError::MemberNotFound {
                member_id: member_id.to_string(),
            })?;
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::BookNotFound {
                isbn: isbn.to_string(),
            })?;
        // A holder on record blocks the loan even if the flag says available.
        if !book.is_available() || already_held {
            return Err(LibraryError::BookNotAvailable {
                isbn: isbn.to_string(),
            });
        }
        if let Some(limit) = self.max_books_per_member {
            if member.borrowed_count() >= limit {
                return Err(LibraryError::BorrowLimitReached {
                    member_id: member_id.to_string(),
                    limit,
                });
            }
        }

        book.borrow(member_id, Local::now());
        member.add_borrowed(isbn);
        tracing::info!(member_id, isbn, "Book borrowed");
        Ok(&*book)
    }

    /// Takes a book back from the member holding it.
    ///
    /// # Errors
    ///
    /// Returns an error if the member or book is unknown, or the member does
    /// not hold the book.
    pub fn return_book(&mut self, member_id: &str, isbn: &str) -> LibraryResult<&Book> {
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| LibraryError::MemberNotFound {
                member_id: member_id.to_string(),
            })?;
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::BookNotFound {
                isbn: isbn.to_string(),
            })?;
        if !member.has_borrowed(isbn) {
            return Err(LibraryError::NotBorrowedByMember {
                member_id: member_id.to_string(),
                isbn: isbn.to_string(),
            });
        }

        book.return_book();
        member.remove_borrowed(isbn);
        tracing::info!(member_id, isbn, "Book returned");
        Ok(&*book)
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    /// Current counts, recomputed on every call.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        let available_books = self.available_books().count();
        Statistics {
            total_books: self.books.len(),
            available_books,
            borrowed_books: self.books.len() - available_books,
            total_members: self.members.len(),
        }
    }

    /// Lists every breach of the lending invariant.
    ///
    /// An empty result means each borrowed book is held by exactly one member
    /// and each available book by none.
    #[must_use]
    pub fn check_consistency(&self) -> Vec<Inconsistency> {
        let mut holders: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut issues = Vec::new();

        for member in self.members.values() {
            for isbn in member.borrowed_books() {
                if self.books.contains_key(isbn.as_str()) {
                    holders
                        .entry(isbn.as_str())
                        .or_default()
                        .push(member.member_id());
                } else {
                    issues.push(Inconsistency::UnknownBook {
                        isbn: isbn.clone(),
                        member_id: member.member_id().to_string(),
                    });
                }
            }
        }

        for book in self.books.values() {
            let held_by = holders.get(book.isbn()).map_or(&[][..], Vec::as_slice);
            match (book.is_available(), held_by) {
                (false, []) => issues.push(Inconsistency::BorrowedWithoutHolder {
                    isbn: book.isbn().to_string(),
                }),
                (true, [_, ..]) => {
                    for member_id in held_by {
                        issues.push(Inconsistency::HeldButAvailable {
                            isbn: book.isbn().to_string(),
                            member_id: (*member_id).to_string(),
                        });
                    }
                }
                (false, [_, _, ..]) => issues.push(Inconsistency::MultipleHolders {
                    isbn: book.isbn().to_string(),
                    member_ids: held_by.iter().map(ToString::to_string).collect(),
                }),
                _ => {}
            }
        }

        issues
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.statistics();
        write!(
            f,
            "{}\nBooks: {} (Available: {}, Borrowed: {})\nMembers: {}",
            self.name,
            stats.total_books,
            stats.available_books,
            stats.borrowed_books,
            stats.total_members
        )
    }
}
