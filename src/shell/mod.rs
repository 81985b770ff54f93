//! Interactive menu shell.
//!
//! The shell reads one line at a time from any [`BufRead`] and writes prompts
//! and results to any [`Write`], so sessions can be scripted in tests the same
//! way a terminal drives them.
//!
//! A session is:
//!
//! 1. **Login**: up to [`MAX_LOGIN_ATTEMPTS`] tries with a librarian ID and password
//! 2. **Menu**: numbered commands dispatched to [`Library`] until the user exits
//! 3. **Exit**: a final save through the [`DataManager`]
//!
//! Rejected commands (unknown IDs, empty input, books on loan) print a message
//! and return to the menu. End of input behaves like choosing exit.

pub mod menu;

pub use menu::MenuChoice;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::library::{Book, Librarian, Library, Member};
use crate::store::DataManager;

/// Failed logins allowed before the session ends.
pub const MAX_LOGIN_ATTEMPTS: usize = 3;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user exited; `saved` tells whether the final save succeeded.
    Exited {
        /// Whether the final save succeeded.
        saved: bool,
    },
    /// Login failed too many times, or input ended before login.
    NotLoggedIn,
}

/// A line-oriented librarian session over a library.
pub struct Shell<'a, R, W> {
    library: &'a mut Library,
    store: &'a DataManager,
    input: R,
    output: W,
    librarian_id: Option<String>,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    /// Creates a session. Nothing is read until [`Shell::run`].
    pub fn new(library: &'a mut Library, store: &'a DataManager, input: R, output: W) -> Self {
        Self {
            library,
            store,
            input,
            output,
            librarian_id: None,
        }
    }

    /// Runs login and the menu loop to completion.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self) -> io::Result<SessionEnd> {
        writeln!(self.output, "=== {} ===", self.library.name())?;

        if !self.login()? {
            return Ok(SessionEnd::NotLoggedIn);
        }

        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("Enter choice: ")? else {
                writeln!(self.output)?;
                break;
            };
            match MenuChoice::parse(&line) {
                Some(MenuChoice::Exit) => break,
                Some(choice) => self.dispatch(choice)?,
                None => writeln!(self.output, "Invalid choice: {line}")?,
            }
        }

        let saved = self.save()?;
        writeln!(self.output, "Goodbye.")?;
        Ok(SessionEnd::Exited { saved })
    }

    fn login(&mut self) -> io::Result<bool> {
        for attempt in 1..=MAX_LOGIN_ATTEMPTS {
            let Some(id) = self.prompt("Librarian ID: ")? else {
                return Ok(false);
            };
            let Some(password) = self.prompt("Password: ")? else {
                return Ok(false);
            };

            match self.library.authenticate(&id, &password) {
                Ok(librarian) => {
                    let greeting = format!("Welcome, {}!", librarian.name);
                    writeln!(self.output, "{greeting}")?;
                    self.librarian_id = Some(id);
                    return Ok(true);
                }
                Err(_) => {
                    let remaining = MAX_LOGIN_ATTEMPTS - attempt;
                    writeln!(
                        self.output,
                        "Invalid librarian ID or password ({remaining} attempt(s) left)."
                    )?;
                }
            }
        }
        writeln!(self.output, "Too many failed login attempts.")?;
        Ok(false)
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "--- Main Menu ---")?;
        for choice in MenuChoice::ALL {
            writeln!(self.output, "{choice}")?;
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> io::Result<()> {
        match choice {
            MenuChoice::AddBook => self.add_book(),
            MenuChoice::RemoveBook => self.remove_book(),
            MenuChoice::SearchBooks => self.search_books(),
            MenuChoice::ListBooks => {
                let books: Vec<&Book> = self.library.books().collect();
                print_books(&mut self.output, "All books", &books)
            }
            MenuChoice::ListAvailable => {
                let books: Vec<&Book> = self.library.available_books().collect();
                print_books(&mut self.output, "Available books", &books)
            }
            MenuChoice::ListBorrowed => {
                let books: Vec<&Book> = self.library.borrowed_books().collect();
                print_books(&mut self.output, "Borrowed books", &books)
            }
            MenuChoice::RegisterMember => self.register_member(),
            MenuChoice::RemoveMember => self.remove_member(),
            MenuChoice::ListMembers => self.list_members(),
            MenuChoice::MemberDetails => self.member_details(),
            MenuChoice::BorrowBook => self.borrow_book(),
            MenuChoice::ReturnBook => self.return_book(),
            MenuChoice::Statistics => writeln!(self.output, "{}", self.library),
            MenuChoice::ExportCsv => self.export_csv(),
            MenuChoice::AddLibrarian => self.add_librarian(),
            MenuChoice::ChangePassword => self.change_password(),
            MenuChoice::Save => self.save().map(|_| ()),
            MenuChoice::Exit => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Books
    // ------------------------------------------------------------------

    fn add_book(&mut self) -> io::Result<()> {
        let Some(title) = self.field("Title")? else {
            return Ok(());
        };
        let Some(author) = self.field("Author")? else {
            return Ok(());
        };
        let Some(isbn) = self.field("ISBN")? else {
            return Ok(());
        };

        let book = Book::new(title, author, isbn);
        let summary = book.to_string();
        match self.library.add_book(book) {
            Ok(()) => writeln!(self.output, "Added: {summary}"),
            Err(e) => report(&mut self.output, &e),
        }
    }

    fn remove_book(&mut self) -> io::Result<()> {
        let Some(isbn) = self.field("ISBN")? else {
            return Ok(());
        };
        match self.library.remove_book(&isbn) {
            Ok(book) => writeln!(self.output, "Removed: {book}"),
            Err(e) => report(&mut self.output, &e),
        }
    }

    fn search_books(&mut self) -> io::Result<()> {
        let Some(query) = self.field("Search (title, author or ISBN)")? else {
            return Ok(());
        };
        let books = self.library.search_books(&query);
        print_books(&mut self.output, &format!("Results for '{query}'"), &books)
    }

    // ------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------

    fn register_member(&mut self) -> io::Result<()> {
        let Some(name) = self.field("Name")? else {
            return Ok(());
        };
        let Some(member_id) = self.field("Member ID")? else {
            return Ok(());
        };

        let member = Member::new(name, member_id);
        let summary = member.to_string();
        match self.library.register_member(member) {
            Ok(()) => writeln!(self.output, "Registered: {summary}"),
            Err(e) => report(&mut self.output, &e),
        }
    }

    fn remove_member(&mut self) -> io::Result<()> {
        let Some(member_id) = self.field("Member ID")? else {
            return Ok(());
        };
        match self.library.remove_member(&member_id) {
            Ok(member) => writeln!(self.output, "Removed: {member}"),
            Err(e) => report(&mut self.output, &e),
        }
    }

    fn list_members(&mut self) -> io::Result<()> {
        let members: Vec<&Member> = self.library.members().collect();
        writeln!(self.output, "Members ({}):", members.len())?;
        if members.is_empty() {
            writeln!(self.output, "  (none)")?;
        }
        for member in members {
            writeln!(
                self.output,
                "  {member} - {} book(s) borrowed",
                member.borrowed_count()
            )?;
        }
        Ok(())
    }

    fn member_details(&mut self) -> io::Result<()> {
        let Some(member_id) = self.field("Member ID")? else {
            return Ok(());
        };
        let Some(member) = self.library.find_member(&member_id) else {
            return writeln!(self.output, "Error: Member not found");
        };

        writeln!(self.output, "{}", member.info())?;
        for isbn in member.borrowed_books() {
            match self.library.find_book(isbn) {
                Some(book) => writeln!(self.output, "  - {book}")?,
                None => writeln!(self.output, "  - {isbn} (not in catalogue)")?,
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lending
    // ------------------------------------------------------------------

    fn borrow_book(&mut self) -> io::Result<()> {
        let Some(member_id) = self.field("Member ID")? else {
            return Ok(());
        };
        let Some(isbn) = self.field("ISBN")? else {
            return Ok(());
        };
        match self.library.borrow_book(&member_id, &isbn) {
            Ok(book) => {
                let message = format!("Book '{}' borrowed successfully", book.title);
                writeln!(self.output, "{message}")
            }
            Err(e) => report(&mut self.output, &e),
        }
    }

    fn return_book(&mut self) -> io::Result<()> {
        let Some(member_id) = self.field("Member ID")? else {
            return Ok(());
        };
        let Some(isbn) = self.field("ISBN")? else {
            return Ok(());
        };
        match self.library.return_book(&member_id, &isbn) {
            Ok(book) => {
                let message = format!("Book '{}' returned successfully", book.title);
                writeln!(self.output, "{message}")
            }
            Err(e) => report(&mut self.output, &e),
        }
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    fn export_csv(&mut self) -> io::Result<()> {
        let Some(path) = self.field("Output file")? else {
            return Ok(());
        };
        match self.store.export_csv(self.library, &PathBuf::from(&path)) {
            Ok(rows) => writeln!(self.output, "Exported {rows} book(s) to {path}"),
            Err(e) => {
                tracing::error!(error = %e, "CSV export failed");
                writeln!(self.output, "Error: {e}")
            }
        }
    }

    fn add_librarian(&mut self) -> io::Result<()> {
        let Some(name) = self.field("Name")? else {
            return Ok(());
        };
        let Some(librarian_id) = self.field("Librarian ID")? else {
            return Ok(());
        };
        let Some(password) = self.field("Password")? else {
            return Ok(());
        };

        let librarian = Librarian::new(name, librarian_id, &password);
        let summary = librarian.to_string();
        match self.library.add_librarian(librarian) {
            Ok(()) => writeln!(self.output, "Added: {summary}"),
            Err(e) => report(&mut self.output, &e),
        }
    }

    fn change_password(&mut self) -> io::Result<()> {
        let Some(old) = self.field("Current password")? else {
            return Ok(());
        };
        let Some(new) = self.field("New password")? else {
            return Ok(());
        };

        let changed = self
            .librarian_id
            .as_deref()
            .and_then(|id| self.library.find_librarian_mut(id))
            .is_some_and(|librarian| librarian.change_password(&old, &new));
        if changed {
            writeln!(self.output, "Password changed.")
        } else {
            writeln!(self.output, "Error: Current password is incorrect")
        }
    }

    fn save(&mut self) -> io::Result<bool> {
        match self.store.save(self.library) {
            Ok(()) => {
                writeln!(self.output, "Data saved.")?;
                Ok(true)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save library data");
                writeln!(self.output, "Error: {e}")?;
                Ok(false)
            }
        }
    }

    // ------------------------------------------------------------------
    // Input helpers
    // ------------------------------------------------------------------

    /// Writes `label` and reads one trimmed line. `None` means end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Reads a required field, rejecting empty input with a message.
    fn field(&mut self, label: &str) -> io::Result<Option<String>> {
        match self.prompt(&format!("{label}: "))? {
            Some(value) if value.is_empty() => {
                writeln!(self.output, "{label} cannot be empty.")?;
                Ok(None)
            }
            other => Ok(other),
        }
    }
}

fn report(output: &mut impl Write, error: &dyn std::error::Error) -> io::Result<()> {
    writeln!(output, "Error: {error}")
}

fn print_books(output: &mut impl Write, heading: &str, books: &[&Book]) -> io::Result<()> {
    writeln!(output, "{heading} ({}):", books.len())?;
    if books.is_empty() {
        writeln!(output, "  (none)")?;
    }
    for book in books {
        let status = match book.borrowed_by() {
            Some(member) => format!("borrowed by {member}"),
            None if book.is_available() => "available".to_string(),
            None => "borrowed".to_string(),
        };
        writeln!(output, "  {book} [{status}]")?;
    }
    Ok(())
}
