//! The note database handle
//!
//! A [`NoteDatabase`] owns the single SQLite connection for the process. It
//! is built once by the application's entry point and shared by `Arc`; the
//! connection mutex is what serializes concurrent store access.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};
use tracing::{info, warn};

use crate::config::Config;
use crate::models::sample_notes;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::schema::{ensure_schema, get_schema_version, SchemaState};

/// How the database came to be on [`NoteDatabase::open`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// Existing store with the current schema
    Reopened,
    /// New store
    Created { seeded: bool },
    /// Old schema version found and destroyed
    Migrated { from: i32, seeded: bool },
}

/// Handle to the SQLite note store
pub struct NoteDatabase {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
    outcome: OpenOutcome,
}

impl NoteDatabase {
    /// Open or create the database in the configured data directory
    pub fn open(config: &Config) -> StorageResult<Self> {
        Self::open_at(&config.sqlite_path(), config.seed_sample_notes)
    }

    /// Open or create the database at a specific path
    pub fn open_at(path: &Path, seed_sample_notes: bool) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::from_io(e, parent.to_path_buf()))?;
            }
        }

        let conn = Connection::open(path).map_err(|source| StorageError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut db = Self::from_connection(conn, seed_sample_notes)?;
        db.path = Some(path.to_path_buf());
        info!(path = %path.display(), outcome = ?db.outcome, "Opened note database");
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory(seed_sample_notes: bool) -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, seed_sample_notes)
    }

    fn from_connection(conn: Connection, seed_sample_notes: bool) -> StorageResult<Self> {
        let (state, seeded) = prepare(&conn, seed_sample_notes)?;

        let outcome = match state {
            SchemaState::Current => OpenOutcome::Reopened,
            SchemaState::Created => OpenOutcome::Created { seeded },
            SchemaState::Recreated { from } => {
                warn!(
                    from,
                    "Schema version mismatch; existing notes were discarded"
                );
                OpenOutcome::Migrated { from, seeded }
            }
        };

        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
            outcome,
        })
    }

    /// Lock the connection for a unit of work
    ///
    /// Recovers a poisoned lock; each statement is its own transaction.
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// What happened when this handle was opened
    pub fn open_outcome(&self) -> OpenOutcome {
        self.outcome
    }

    /// Schema version currently stored in the file
    pub fn schema_version(&self) -> StorageResult<i32> {
        Ok(get_schema_version(&self.connection())?)
    }
}

/// Bring the schema up to date and seed a fresh table as one transaction
///
/// Any failure rolls back, leaving the file as it was before the open.
fn prepare(conn: &Connection, seed_sample_notes: bool) -> StorageResult<(SchemaState, bool)> {
    let tx = conn.unchecked_transaction()?;

    let state = ensure_schema(&tx)?;
    let seeded = state.is_fresh() && seed_sample_notes;
    if seeded {
        seed(&tx)?;
    }

    tx.commit()?;
    Ok((state, seeded))
}

/// Insert the sample rows into a freshly created table
fn seed(conn: &Connection) -> StorageResult<()> {
    let mut stmt =
        conn.prepare("INSERT INTO note_table (title, description, priority) VALUES (?1, ?2, ?3)")?;
    for note in sample_notes() {
        stmt.execute(params![note.title, note.description, note.priority])?;
    }
    info!("Seeded sample notes");
    Ok(())
}
