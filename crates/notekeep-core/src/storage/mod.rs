//! Storage layer
//!
//! ## Architecture
//!
//! - **SQLite**: single `note_table`, one connection per process
//! - **DAO**: [`NoteDao`] trait with a hand-written SQL implementation
//!
//! Schema versions are not migrated. A mismatch recreates the table.

pub mod dao;
pub mod database;
pub mod error;
pub mod schema;

pub use dao::{NoteDao, SqliteNoteDao};
pub use database::{NoteDatabase, OpenOutcome};
pub use error::{StorageError, StorageResult};
pub use schema::SCHEMA_VERSION;
