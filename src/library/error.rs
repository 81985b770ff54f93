//! Error types for library operations.

use thiserror::Error;

/// Result type for library operations.
pub type LibraryResult<T> = Result<T, LibraryError>;

/// Reasons a library operation can be rejected.
///
/// Every rejected operation leaves the library unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// A book with the same ISBN is already catalogued.
    #[error("A book with ISBN {isbn} already exists")]
    DuplicateIsbn {
        /// The conflicting ISBN.
        isbn: String,
    },

    /// A member with the same ID is already registered.
    #[error("A member with ID {member_id} already exists")]
    DuplicateMember {
        /// The conflicting member ID.
        member_id: String,
    },

    /// A librarian with the same ID already exists.
    #[error("A librarian with ID {librarian_id} already exists")]
    DuplicateLibrarian {
        /// The conflicting librarian ID.
        librarian_id: String,
    },

    /// No book with the given ISBN.
    #[error("Book not found")]
    BookNotFound {
        /// The ISBN that was looked up.
        isbn: String,
    },

    /// No member with the given ID.
    #[error("Member not found")]
    MemberNotFound {
        /// The member ID that was looked up.
        member_id: String,
    },

    /// No librarian with the given ID.
    #[error("Librarian not found")]
    LibrarianNotFound {
        /// The librarian ID that was looked up.
        librarian_id: String,
    },

    /// The book is currently on loan.
    #[error("Book is not available")]
    BookNotAvailable {
        /// ISBN of the borrowed book.
        isbn: String,
    },

    /// The member does not hold the book being returned.
    #[error("Member has not borrowed this book")]
    NotBorrowedByMember {
        /// The member attempting the return.
        member_id: String,
        /// ISBN of the book.
        isbn: String,
    },

    /// The member still has books on loan.
    #[error("Member still has {count} borrowed book(s)")]
    OutstandingLoans {
        /// The member being removed.
        member_id: String,
        /// Number of books still on loan.
        count: usize,
    },

    /// The member has reached the configured loan limit.
    #[error("Member has reached the borrowing limit of {limit} book(s)")]
    BorrowLimitReached {
        /// The member attempting to borrow.
        member_id: String,
        /// The configured limit.
        limit: usize,
    },

    /// Wrong password for a librarian account.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_messages_are_short() {
        let err = LibraryError::MemberNotFound {
            member_id: "M404".to_string(),
        };
        assert_eq!(err.to_string(), "Member not found");

        let err = LibraryError::BookNotFound {
            isbn: "000".to_string(),
        };
        assert_eq!(err.to_string(), "Book not found");
    }

    #[test]
    fn borrow_limit_display() {
        let err = LibraryError::BorrowLimitReached {
            member_id: "M001".to_string(),
            limit: 3,
        };
        assert_eq!(
            err.to_string(),
            "Member has reached the borrowing limit of 3 book(s)"
        );
    }
}
