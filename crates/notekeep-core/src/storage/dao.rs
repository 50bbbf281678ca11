//! Data access for `note_table`
//!
//! [`NoteDao`] is the blocking interface the repository drives from worker
//! threads. [`SqliteNoteDao`] implements it with hand-written SQL.

use std::sync::Arc;

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use crate::models::{NewNote, Note};
use crate::storage::database::NoteDatabase;
use crate::storage::error::StorageResult;

/// Note data access operations
///
/// No validation happens here; callers check input before it reaches the
/// store.
pub trait NoteDao: Send + Sync {
    /// Insert a note and return it with its assigned id
    fn insert(&self, note: &NewNote) -> StorageResult<Note>;

    /// Replace title, description and priority of the row with `note.id`
    ///
    /// Returns `false` when no row matched.
    fn update(&self, note: &Note) -> StorageResult<bool>;

    /// Remove the row with `note.id`, returning `false` when none matched
    fn delete(&self, note: &Note) -> StorageResult<bool>;

    /// Remove every row, returning how many were removed
    fn delete_all(&self) -> StorageResult<usize>;

    /// All notes, highest priority first
    fn get_all(&self) -> StorageResult<Vec<Note>>;

    /// A single note by id
    fn get(&self, id: i64) -> StorageResult<Option<Note>>;

    /// Number of stored notes
    fn count(&self) -> StorageResult<i64>;
}

/// SQLite implementation of [`NoteDao`]
#[derive(Clone)]
pub struct SqliteNoteDao {
    db: Arc<NoteDatabase>,
}

impl SqliteNoteDao {
    pub fn new(db: Arc<NoteDatabase>) -> Self {
        Self { db }
    }

    /// The database this DAO reads and writes
    pub fn database(&self) -> &Arc<NoteDatabase> {
        &self.db
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        priority: row.get(3)?,
    })
}

impl NoteDao for SqliteNoteDao {
    fn insert(&self, note: &NewNote) -> StorageResult<Note> {
        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO note_table (title, description, priority) VALUES (?1, ?2, ?3)",
            params![note.title, note.description, note.priority],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, "Inserted note");
        Ok(note.clone().into_note(id))
    }

    fn update(&self, note: &Note) -> StorageResult<bool> {
        let changed = self.db.connection().execute(
            "UPDATE note_table SET title = ?1, description = ?2, priority = ?3 WHERE id = ?4",
            params![note.title, note.description, note.priority, note.id],
        )?;
        debug!(id = note.id, changed, "Updated note");
        Ok(changed > 0)
    }

    fn delete(&self, note: &Note) -> StorageResult<bool> {
        let changed = self
            .db
            .connection()
            .execute("DELETE FROM note_table WHERE id = ?1", params![note.id])?;
        debug!(id = note.id, changed, "Deleted note");
        Ok(changed > 0)
    }

    fn delete_all(&self) -> StorageResult<usize> {
        let removed = self.db.connection().execute("DELETE FROM note_table", [])?;
        debug!(removed, "Deleted all notes");
        Ok(removed)
    }

    fn get_all(&self) -> StorageResult<Vec<Note>> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare_cached(
            "SELECT id, title, description, priority FROM note_table ORDER BY priority DESC",
        )?;
        let notes = stmt
            .query_map([], note_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    fn get(&self, id: i64) -> StorageResult<Option<Note>> {
        let note = self
            .db
            .connection()
            .query_row(
                "SELECT id, title, description, priority FROM note_table WHERE id = ?1",
                params![id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    fn count(&self) -> StorageResult<i64> {
        let count = self
            .db
            .connection()
            .query_row("SELECT COUNT(*) FROM note_table", [], |row| row.get(0))?;
        Ok(count)
    }
}
