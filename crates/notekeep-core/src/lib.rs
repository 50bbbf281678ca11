//! notekeep core library
//!
//! Priority-ordered notes stored in a single SQLite table, with an
//! asynchronous repository and a live, push-updated list of all notes.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let db = Arc::new(NoteDatabase::open(&config)?);
//! let repository = NoteRepository::new(Arc::new(SqliteNoteDao::new(db)))?;
//! let view_model = NoteViewModel::new(repository);
//!
//! let mut notes = view_model.all_notes();
//! view_model.insert(NewNote::new("Title", "Body", 5)).await?;
//! let latest = notes.changed().await;
//! ```
//!
//! # Modules
//!
//! - `models`: the `Note` entity
//! - `storage`: SQLite database handle, schema and data access
//! - `repository`: background execution and the live note list
//! - `view_model`: screen-facing forwarding layer
//! - `diff`: minimal row operations between two list snapshots
//! - `form`: add/edit form validation and screen payloads
//! - `config`: application configuration

pub mod config;
pub mod diff;
pub mod form;
pub mod models;
pub mod repository;
pub mod storage;
pub mod view_model;

pub use config::Config;
pub use diff::ListOp;
pub use form::{
    AddNotePayload, EditNotePayload, FormError, FormMode, FormPayload, NoteForm, PayloadError,
    NO_NOTE_ID,
};
pub use models::{NewNote, Note, MAX_PRIORITY, MIN_PRIORITY};
pub use repository::{NoteRepository, NoteSnapshot, NoteSubscription};
pub use storage::{NoteDao, NoteDatabase, OpenOutcome, SqliteNoteDao, StorageError};
pub use view_model::NoteViewModel;
