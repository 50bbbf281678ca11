//! Data models for notekeep
//!
//! A single entity: the [`Note`], stored one row per note in `note_table`.

use serde::{Deserialize, Serialize};

/// Lowest priority the input widgets allow
pub const MIN_PRIORITY: i32 = 1;
/// Highest priority the input widgets allow
pub const MAX_PRIORITY: i32 = 10;

/// A persisted note
///
/// `id` is assigned by the store on insert and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    /// Row identifier
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note body
    pub description: String,
    /// Display priority, higher sorts first
    pub priority: i32,
}

impl Note {
    /// Create a note with a known ID (for loading from storage)
    pub fn with_id(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            priority,
        }
    }

    /// True when title, description and priority all match
    ///
    /// The id is deliberately not compared; this is the row-content check used
    /// when diffing list snapshots.
    pub fn same_content(&self, other: &Note) -> bool {
        self.title == other.title
            && self.description == other.description
            && self.priority == other.priority
    }

    /// Replace every field except the id
    pub fn replace_fields(&mut self, fields: NewNote) {
        self.title = fields.title;
        self.description = fields.description;
        self.priority = fields.priority;
    }
}

/// A note that has not been inserted yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub description: String,
    pub priority: i32,
}

impl NewNote {
    pub fn new(title: impl Into<String>, description: impl Into<String>, priority: i32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
        }
    }

    /// Attach the id the store assigned
    pub fn into_note(self, id: i64) -> Note {
        Note {
            id,
            title: self.title,
            description: self.description,
            priority: self.priority,
        }
    }
}

/// The three rows seeded into a freshly created store
pub fn sample_notes() -> Vec<NewNote> {
    (1..=3)
        .map(|n| NewNote::new(format!("Title {}", n), format!("Description {}", n), n))
        .collect()
}
