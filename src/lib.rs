//! library-manager: catalogue, membership and lending for a small library
//!
//! A single-user command-line tool that tracks books, members and librarians
//! and keeps them in flat JSON files.
//!
//! # Architecture
//!
//! ```text
//! shell (menu) ──▶ library (rules) ──▶ Book / Member / Librarian
//!                      ▲
//!                      │ load / save
//!                      ▼
//!                store (JSON files)
//! ```
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Configuration and persistence error types
//! - [`library`] - Entities and the borrow/return workflow
//! - [`shell`] - Interactive numbered menu
//! - [`store`] - JSON persistence and CSV export

pub mod config;
pub mod error;
pub mod library;
pub mod shell;
pub mod store;
