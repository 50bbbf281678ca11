//! SQLite schema for the note store
//!
//! One table, `note_table`. The schema version lives in `PRAGMA user_version`;
//! there is no migration path, any mismatch drops and recreates the table.

use rusqlite::{Connection, Result};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// What [`ensure_schema`] had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    /// Schema was already at [`SCHEMA_VERSION`]
    Current,
    /// No schema existed; it was created
    Created,
    /// A different version existed; it was dropped and recreated
    Recreated { from: i32 },
}

impl SchemaState {
    /// True when the table was (re)created empty
    pub fn is_fresh(self) -> bool {
        !matches!(self, SchemaState::Current)
    }
}

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS note_table (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            priority INTEGER NOT NULL
        );

        -- Display order is priority descending
        CREATE INDEX IF NOT EXISTS idx_note_table_priority ON note_table(priority);
        "#,
    )?;

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

    Ok(())
}

/// Drop every object the schema owns
pub fn drop_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DROP INDEX IF EXISTS idx_note_table_priority;
        DROP TABLE IF EXISTS note_table;
        "#,
    )
}

/// Get the schema version stored in the database (0 when never set)
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}

/// Check if the note table exists
fn table_exists(conn: &Connection) -> Result<bool> {
    conn.prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name='note_table'")?
        .exists([])
}

/// Bring the schema to [`SCHEMA_VERSION`], destroying data on any mismatch
pub fn ensure_schema(conn: &Connection) -> Result<SchemaState> {
    let version = get_schema_version(conn)?;

    if version == SCHEMA_VERSION && table_exists(conn)? {
        return Ok(SchemaState::Current);
    }

    if version == 0 && !table_exists(conn)? {
        init_schema(conn)?;
        return Ok(SchemaState::Created);
    }

    drop_schema(conn)?;
    init_schema(conn)?;
    Ok(SchemaState::Recreated { from: version })
}
