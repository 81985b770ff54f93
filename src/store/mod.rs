//! JSON persistence for the library.
//!
//! Each collection lives in its own file inside the data directory:
//!
//! | File              | Contents                    |
//! |-------------------|-----------------------------|
//! | `books.json`      | array of [`Book`] records   |
//! | `members.json`    | array of [`Member`] records |
//! | `librarians.json` | array of [`Librarian`] records |
//!
//! Loading is forgiving: a missing, unreadable or malformed file yields an
//! empty collection and a log entry, never an error. Saving overwrites each
//! file in place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::library::{Book, Librarian, Library, Member};

/// File name for the book collection.
pub const BOOKS_FILE: &str = "books.json";

/// File name for the member collection.
pub const MEMBERS_FILE: &str = "members.json";

/// File name for the librarian collection.
pub const LIBRARIANS_FILE: &str = "librarians.json";

/// Outcome of reading one collection file.
#[derive(Debug)]
enum LoadOutcome<T> {
    Loaded(Vec<T>),
    Missing,
    Invalid,
}

impl<T> LoadOutcome<T> {
    fn into_records(self) -> Vec<T> {
        match self {
            Self::Loaded(records) => records,
            Self::Missing | Self::Invalid => Vec::new(),
        }
    }
}

/// Reads and writes library collections under a data directory.
#[derive(Debug, Clone)]
pub struct DataManager {
    data_dir: PathBuf,
}

impl DataManager {
    /// Creates a manager for `data_dir`. Nothing is touched until load or save.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory holding the data files.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of `books.json`.
    #[must_use]
    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(BOOKS_FILE)
    }

    /// Full path of `members.json`.
    #[must_use]
    pub fn members_path(&self) -> PathBuf {
        self.data_dir.join(MEMBERS_FILE)
    }

    /// Full path of `librarians.json`.
    #[must_use]
    pub fn librarians_path(&self) -> PathBuf {
        self.data_dir.join(LIBRARIANS_FILE)
    }

    /// Loads every collection into a library called `name`.
    ///
    /// Never fails; see the module docs for how bad files are handled.
    #[must_use]
    pub fn load(&self, name: &str) -> Library {
        let books: Vec<Book> = read_collection(&self.books_path()).into_records();
        let members: Vec<Member> = read_collection(&self.members_path()).into_records();
        let librarians: Vec<Librarian> = read_collection(&self.librarians_path()).into_records();

        tracing::info!(
            data_dir = %self.data_dir.display(),
            books = books.len(),
            members = members.len(),
            librarians = librarians.len(),
            "Loaded library data"
        );

        Library::from_parts(name, books, members, librarians)
    }

    /// Writes every collection, replacing previous contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a file cannot
    /// be serialised or written. Files written before the failure keep their
    /// new contents.
    pub fn save(&self, library: &Library) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| StoreError::CreateDir {
            path: self.data_dir.clone(),
            source,
        })?;

        let books: Vec<&Book> = library.books().collect();
        let members: Vec<&Member> = library.members().collect();
        let librarians: Vec<&Librarian> = library.librarians().collect();

        write_collection(&self.books_path(), &books)?;
        write_collection(&self.members_path(), &members)?;
        write_collection(&self.librarians_path(), &librarians)?;

        tracing::info!(
            data_dir = %self.data_dir.display(),
            books = books.len(),
            members = members.len(),
            librarians = librarians.len(),
            "Saved library data"
        );
        Ok(())
    }

    /// Writes a catalogue report as CSV.
    ///
    /// Columns: `isbn,title,author,status,borrowed_by,borrow_date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn export_csv(&self, library: &Library, path: &Path) -> Result<usize, StoreError> {
        let export_err = |source| StoreError::Export {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::Writer::from_path(path).map_err(export_err)?;
        writer
            .write_record(["isbn", "title", "author", "status", "borrowed_by", "borrow_date"])
            .map_err(export_err)?;

        let mut rows = 0;
        for book in library.books() {
            let status = if book.is_available() { "available" } else { "borrowed" };
            let borrow_date = book
                .borrow_date()
                .map(|d| d.to_rfc3339())
                .unwrap_or_default();
            writer
                .write_record([
                    book.isbn(),
                    book.title.as_str(),
                    book.author.as_str(),
                    status,
                    book.borrowed_by().unwrap_or_default(),
                    borrow_date.as_str(),
                ])
                .map_err(export_err)?;
            rows += 1;
        }
        writer
            .flush()
            .map_err(|e| export_err(csv::Error::from(e)))?;

        tracing::info!(path = %path.display(), rows, "Exported catalogue report");
        Ok(rows)
    }
}

fn read_collection<T: DeserializeOwned>(path: &Path) -> LoadOutcome<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Data file not found, starting empty");
            return LoadOutcome::Missing;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read data file, starting empty");
            return LoadOutcome::Invalid;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(records) => LoadOutcome::Loaded(records),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Malformed data file, starting empty");
            LoadOutcome::Invalid
        }
    }
}

fn write_collection<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(records).map_err(|source| StoreError::Serialise {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), count = records.len(), "Wrote data file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_data_dir() {
        let store = DataManager::new("/var/lib/library");
        assert_eq!(store.books_path(), Path::new("/var/lib/library/books.json"));
        assert_eq!(store.members_path(), Path::new("/var/lib/library/members.json"));
        assert_eq!(
            store.librarians_path(),
            Path::new("/var/lib/library/librarians.json")
        );
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let outcome: LoadOutcome<Book> = read_collection(&dir.path().join(BOOKS_FILE));
        assert!(matches!(outcome, LoadOutcome::Missing));
    }

    #[test]
    fn malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MEMBERS_FILE);
        fs::write(&path, "{ not json").unwrap();
        let outcome: LoadOutcome<Member> = read_collection(&path);
        assert!(matches!(outcome, LoadOutcome::Invalid));
        assert!(outcome.into_records().is_empty());
    }

    #[test]
    fn wrong_shape_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BOOKS_FILE);
        fs::write(&path, r#"{"title": "not an array"}"#).unwrap();
        let outcome: LoadOutcome<Book> = read_collection(&path);
        assert!(matches!(outcome, LoadOutcome::Invalid));
    }
}
