//! Save/load tests for the JSON data files.
//!
//! These tests write a library to a temporary data directory and read it back,
//! and check that damaged files degrade to empty collections.

use std::fs;

use library_manager::library::{Book, Librarian, Library, Member};
use library_manager::store::{DataManager, BOOKS_FILE, LIBRARIANS_FILE, MEMBERS_FILE};
use tempfile::TempDir;

/// Creates a temporary directory inside `.tmp/` for test isolation.
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
///
/// Converts to an absolute path to avoid issues with parallel test execution.
fn test_temp_dir() -> TempDir {
    let tmp_root = std::path::Path::new(".tmp");
    std::fs::create_dir_all(tmp_root).expect("Failed to create .tmp directory");
    let tmp_root = tmp_root
        .canonicalize()
        .expect("Failed to canonicalize .tmp path");
    tempfile::tempdir_in(&tmp_root).expect("Failed to create temp dir")
}

fn populated_library() -> Library {
    let mut library = Library::new("Roundtrip Library");
    library
        .add_book(Book::new("1984", "George Orwell", "978-0451524935"))
        .unwrap();
    library
        .add_book(Book::new("Dune", "Frank Herbert", "978-0441013593"))
        .unwrap();
    library
        .register_member(Member::new("John Doe", "M001"))
        .unwrap();
    library
        .register_member(Member::new("Jane Roe", "M002"))
        .unwrap();
    library.seed_default_librarian();
    library
        .add_librarian(Librarian::new("Ann Archivist", "LIB002", "s3cret"))
        .unwrap();

    library.borrow_book("M002", "978-0441013593").unwrap();
    library.authenticate("LIB002", "s3cret").unwrap();
    library
}

#[test]
fn save_then_load_reproduces_library() {
    let temp_dir = test_temp_dir();
    let store = DataManager::new(temp_dir.path());
    let original = populated_library();

    store.save(&original).unwrap();
    let loaded = store.load("Roundtrip Library");

    assert_eq!(
        loaded.books().collect::<Vec<_>>(),
        original.books().collect::<Vec<_>>()
    );
    assert_eq!(
        loaded.members().collect::<Vec<_>>(),
        original.members().collect::<Vec<_>>()
    );
    assert_eq!(
        loaded.librarians().collect::<Vec<_>>(),
        original.librarians().collect::<Vec<_>>()
    );
    assert_eq!(loaded.statistics(), original.statistics());
    assert!(loaded.check_consistency().is_empty());

    let dune = loaded.find_book("978-0441013593").unwrap();
    assert_eq!(dune.borrowed_by(), Some("M002"));
    assert!(dune.borrow_date().is_some());
    assert_eq!(loaded.find_librarian("LIB002").unwrap().login_count(), 1);
}

#[test]
fn loaded_library_keeps_working() {
    let temp_dir = test_temp_dir();
    let store = DataManager::new(temp_dir.path());
    store.save(&populated_library()).unwrap();

    let mut library = store.load("Roundtrip Library");
    library.return_book("M002", "978-0441013593").unwrap();
    library.authenticate("LIB001", "admin123").unwrap();
    store.save(&library).unwrap();

    let reloaded = store.load("Roundtrip Library");
    assert_eq!(reloaded.borrowed_books().count(), 0);
    assert_eq!(reloaded.find_librarian("LIB001").unwrap().login_count(), 1);
}

#[test]
fn files_are_flat_json_arrays() {
    let temp_dir = test_temp_dir();
    let store = DataManager::new(temp_dir.path());
    store.save(&populated_library()).unwrap();

    let books: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join(BOOKS_FILE)).unwrap())
            .unwrap();
    let first = &books.as_array().unwrap()[0];
    assert_eq!(first["title"], "1984");
    assert_eq!(first["isbn"], "978-0451524935");
    assert_eq!(first["available"], true);

    let members: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp_dir.path().join(MEMBERS_FILE)).unwrap())
            .unwrap();
    assert_eq!(members[1]["member_id"], "M002");
    assert_eq!(members[1]["borrowed_books"][0], "978-0441013593");

    let librarians = fs::read_to_string(temp_dir.path().join(LIBRARIANS_FILE)).unwrap();
    assert!(librarians.contains("\"librarian_id\": \"LIB001\""));
    assert!(!librarians.contains("admin123"));
}

#[test]
fn missing_directory_loads_empty_and_is_created_on_save() {
    let temp_dir = test_temp_dir();
    let data_dir = temp_dir.path().join("nested").join("data");
    let store = DataManager::new(&data_dir);

    let mut library = store.load("Fresh");
    assert_eq!(library.books().count(), 0);
    assert_eq!(library.librarians().count(), 0);
    assert!(library.seed_default_librarian());

    store.save(&library).unwrap();
    assert!(data_dir.join(BOOKS_FILE).exists());
    assert_eq!(store.load("Fresh").librarians().count(), 1);
}

#[test]
fn malformed_file_only_empties_its_collection() {
    let temp_dir = test_temp_dir();
    let store = DataManager::new(temp_dir.path());
    store.save(&populated_library()).unwrap();

    fs::write(temp_dir.path().join(MEMBERS_FILE), "[{\"name\": \"trunc").unwrap();

    let library = store.load("Roundtrip Library");
    assert_eq!(library.members().count(), 0);
    assert_eq!(library.books().count(), 2);
    assert_eq!(library.librarians().count(), 2);
    // The borrowed book now has no holder.
    assert_eq!(library.check_consistency().len(), 1);
}

#[test]
fn save_into_file_path_fails() {
    let temp_dir = test_temp_dir();
    let blocker = temp_dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();

    let store = DataManager::new(&blocker);
    assert!(store.save(&populated_library()).is_err());
}

#[test]
fn csv_report_lists_every_book() {
    let temp_dir = test_temp_dir();
    let store = DataManager::new(temp_dir.path());
    let report = temp_dir.path().join("catalogue.csv");

    let rows = store.export_csv(&populated_library(), &report).unwrap();
    assert_eq!(rows, 2);

    let mut reader = csv::Reader::from_path(&report).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["isbn", "title", "author", "status", "borrowed_by", "borrow_date"]
    );

    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(&records[0][3], "available");
    assert_eq!(&records[0][4], "");
    assert_eq!(&records[1][1], "Dune");
    assert_eq!(&records[1][3], "borrowed");
    assert_eq!(&records[1][4], "M002");
    assert!(!records[1][5].is_empty());
}
