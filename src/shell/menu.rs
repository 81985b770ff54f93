//! Main menu entries.

use std::fmt;

/// One entry of the numbered main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Catalogue a new book.
    AddBook,
    /// Remove a book that is on the shelf.
    RemoveBook,
    /// Search by title, author or ISBN.
    SearchBooks,
    /// List the whole catalogue.
    ListBooks,
    /// List books on the shelf.
    ListAvailable,
    /// List books on loan.
    ListBorrowed,
    /// Register a new member.
    RegisterMember,
    /// Remove a member with no loans.
    RemoveMember,
    /// List all members.
    ListMembers,
    /// Show one member and their loans.
    MemberDetails,
    /// Lend a book to a member.
    BorrowBook,
    /// Take a book back.
    ReturnBook,
    /// Show catalogue and membership counts.
    Statistics,
    /// Write the catalogue report as CSV.
    ExportCsv,
    /// Create a librarian account.
    AddLibrarian,
    /// Change the logged-in librarian's password.
    ChangePassword,
    /// Save all data now.
    Save,
    /// Save and end the session.
    Exit,
}

impl MenuChoice {
    /// Entries in display order. `Exit` is shown last as option 0.
    pub const ALL: [Self; 18] = [
        Self::AddBook,
        Self::RemoveBook,
        Self::SearchBooks,
        Self::ListBooks,
        Self::ListAvailable,
        Self::ListBorrowed,
        Self::RegisterMember,
        Self::RemoveMember,
        Self::ListMembers,
        Self::MemberDetails,
        Self::BorrowBook,
        Self::ReturnBook,
        Self::Statistics,
        Self::ExportCsv,
        Self::AddLibrarian,
        Self::ChangePassword,
        Self::Save,
        Self::Exit,
    ];

    /// The number typed to select this entry.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Exit => 0,
            Self::AddBook => 1,
            Self::RemoveBook => 2,
            Self::SearchBooks => 3,
            Self::ListBooks => 4,
            Self::ListAvailable => 5,
            Self::ListBorrowed => 6,
            Self::RegisterMember => 7,
            Self::RemoveMember => 8,
            Self::ListMembers => 9,
            Self::MemberDetails => 10,
            Self::BorrowBook => 11,
            Self::ReturnBook => 12,
            Self::Statistics => 13,
            Self::ExportCsv => 14,
            Self::AddLibrarian => 15,
            Self::ChangePassword => 16,
            Self::Save => 17,
        }
    }

    /// Text shown next to the number.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AddBook => "Add book",
            Self::RemoveBook => "Remove book",
            Self::SearchBooks => "Search books",
            Self::ListBooks => "List all books",
            Self::ListAvailable => "List available books",
            Self::ListBorrowed => "List borrowed books",
            Self::RegisterMember => "Register member",
            Self::RemoveMember => "Remove member",
            Self::ListMembers => "List members",
            Self::MemberDetails => "Member details",
            Self::BorrowBook => "Borrow book",
            Self::ReturnBook => "Return book",
            Self::Statistics => "Library statistics",
            Self::ExportCsv => "Export catalogue to CSV",
            Self::AddLibrarian => "Add librarian",
            Self::ChangePassword => "Change password",
            Self::Save => "Save data",
            Self::Exit => "Save and exit",
        }
    }

    /// Parses the user's menu selection.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let number: u8 = input.trim().parse().ok()?;
        Self::ALL.into_iter().find(|c| c.number() == number)
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>2}. {}", self.number(), self.label())
    }
}
