//! End-to-end menu sessions.
//!
//! Each test feeds a scripted session to the shell, exactly as a librarian
//! would type it, then inspects the output and the files left on disk.

use std::io::Cursor;

use library_manager::library::Library;
use library_manager::shell::{SessionEnd, Shell};
use library_manager::store::DataManager;
use tempfile::TempDir;

fn test_temp_dir() -> TempDir {
    let tmp_root = std::path::Path::new(".tmp");
    std::fs::create_dir_all(tmp_root).expect("Failed to create .tmp directory");
    let tmp_root = tmp_root
        .canonicalize()
        .expect("Failed to canonicalize .tmp path");
    tempfile::tempdir_in(&tmp_root).expect("Failed to create temp dir")
}

/// Loads the library from `store`, seeds the admin and runs `lines` through a shell.
fn run_session(store: &DataManager, lines: &[&str]) -> (SessionEnd, String) {
    let mut library = store.load("Session Library");
    library.seed_default_librarian();

    let mut script = lines.join("\n");
    script.push('\n');

    let mut output = Vec::new();
    let end = Shell::new(&mut library, store, Cursor::new(script), &mut output)
        .run()
        .expect("session I/O");
    (end, String::from_utf8(output).expect("utf-8 output"))
}

#[test]
fn full_lending_session_persists() {
    let temp_dir = test_temp_dir();
    let store = DataManager::new(temp_dir.path());

    let (end, out) = run_session(
        &store,
        &[
            "LIB001",
            "admin123",
            // add book
            "1",
            "1984",
            "George Orwell",
            "978-0451524935",
            // register member
            "7",
            "John Doe",
            "M001",
            // borrow
            "11",
            "M001",
            "978-0451524935",
            // statistics
            "13",
            // exit
            "0",
        ],
    );

    assert_eq!(end, SessionEnd::Exited { saved: true });
    assert!(out.contains("=== Session Library ==="));
    assert!(out.contains("Added: 1984 by George Orwell (ISBN: 978-0451524935)"));
    assert!(out.contains("Registered: John Doe (ID: M001)"));
    assert!(out.contains("Book '1984' borrowed successfully"));
    assert!(out.contains("Books: 1 (Available: 0, Borrowed: 1)"));

    let library: Library = store.load("Session Library");
    let book = library.find_book("978-0451524935").unwrap();
    assert!(!book.is_available());
    assert_eq!(book.borrowed_by(), Some("M001"));
    assert_eq!(library.find_librarian("LIB001").unwrap().login_count(), 1);
}

#[test]
fn rejected_commands_keep_the_loop_running() {
    let temp_dir = test_temp_dir();
    let store = DataManager::new(temp_dir.path());

    let (end, out) = run_session(
        &store,
        &[
            "LIB001",
            "admin123",
            // borrow with unknown member
            "11",
            "M999",
            "978-0451524935",
            // return with unknown book
            "7",
            "John Doe",
            "M001",
            "12",
            "M001",
            "000",
            // remove unknown member
            "8",
            "M404",
            // blank search
            "3",
            "",
            "0",
        ],
    );

    assert_eq!(end, SessionEnd::Exited { saved: true });
    assert!(out.contains("Error: Member not found"));
    assert!(out.contains("Error: Book not found"));
    assert!(out.contains("Search (title, author or ISBN) cannot be empty."));
    assert!(out.contains("Goodbye."));
}

#[test]
fn search_and_listings() {
    let temp_dir = test_temp_dir();
    let store = DataManager::new(temp_dir.path());

    let (_, out) = run_session(
        &store,
        &[
            "LIB001",
            "admin123",
            "1",
            "Animal Farm",
            "George Orwell",
            "978-0451526342",
            "1",
            "Emma",
            "Jane Austen",
            "978-0141439587",
            "3",
            "orwell",
            "6",
            "0",
        ],
    );

    assert!(out.contains("Results for 'orwell' (1):"));
    assert!(out.contains("  Animal Farm by George Orwell (ISBN: 978-0451526342) [available]"));
    assert!(out.contains("Borrowed books (0):"));
}

#[test]
fn export_from_menu_writes_csv() {
    let temp_dir = test_temp_dir();
    let store = DataManager::new(temp_dir.path());
    let report = temp_dir.path().join("report.csv");
    let report_arg = report.to_string_lossy().into_owned();

    let (_, out) = run_session(
        &store,
        &[
            "LIB001",
            "admin123",
            "1",
            "Dune",
            "Frank Herbert",
            "978-0441013593",
            "14",
            &report_arg,
            "0",
        ],
    );

    assert!(out.contains("Exported 1 book(s)"));
    let csv = std::fs::read_to_string(&report).unwrap();
    assert!(csv.starts_with("isbn,title,author,status,borrowed_by,borrow_date"));
    assert!(csv.contains("978-0441013593,Dune,Frank Herbert,available,,"));
}

#[test]
fn new_librarian_can_log_in_next_session() {
    let temp_dir = test_temp_dir();
    let store = DataManager::new(temp_dir.path());

    run_session(
        &store,
        &["LIB001", "admin123", "15", "Ann Archivist", "LIB002", "pw", "0"],
    );
    let (end, out) = run_session(&store, &["LIB002", "pw", "0"]);

    assert_eq!(end, SessionEnd::Exited { saved: true });
    assert!(out.contains("Welcome, Ann Archivist!"));
}
