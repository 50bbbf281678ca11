//! Add/Edit form values and the payloads screens hand back
//!
//! The form is the only place priority limits and required fields are
//! checked. A form that fails validation produces no payload, so nothing
//! reaches the store.

use thiserror::Error;

use crate::models::{NewNote, Note, MAX_PRIORITY, MIN_PRIORITY};

/// Id carried by an edit payload when the note id is unknown
pub const NO_NOTE_ID: i64 = -1;

/// Why a form could not be saved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please insert a title and description")]
    MissingFields,

    #[error("Priority must be between 1 and 10, got {0}")]
    PriorityOutOfRange(i32),
}

/// Why an edit payload cannot be applied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Note can't be updated")]
    MissingId,
}

/// Values returned by the Add screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddNotePayload {
    pub title: String,
    pub description: String,
    pub priority: i32,
}

impl AddNotePayload {
    pub fn into_new_note(self) -> NewNote {
        NewNote::new(self.title, self.description, self.priority)
    }
}

/// Values returned by the Edit screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditNotePayload {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i32,
}

impl EditNotePayload {
    /// The edited note, or [`PayloadError::MissingId`] for [`NO_NOTE_ID`]
    pub fn into_note(self) -> Result<Note, PayloadError> {
        if self.id == NO_NOTE_ID {
            return Err(PayloadError::MissingId);
        }
        Ok(Note::with_id(
            self.id,
            self.title,
            self.description,
            self.priority,
        ))
    }
}

/// What a saved form returns to the list screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPayload {
    Add(AddNotePayload),
    Edit(EditNotePayload),
}

/// Whether the form creates a note or edits one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit { id: i64 },
}

/// Field values of the Add/Edit screen
///
/// An edited note keeps its stored priority, even one outside the picker's
/// range, until the priority is changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteForm {
    pub mode: FormMode,
    pub title: String,
    pub description: String,
    priority: i32,
    stored_priority: Option<i32>,
}

impl NoteForm {
    /// Empty form for a new note
    pub fn add() -> Self {
        Self {
            mode: FormMode::Add,
            title: String::new(),
            description: String::new(),
            priority: MIN_PRIORITY,
            stored_priority: None,
        }
    }

    /// Form pre-filled with an existing note
    pub fn edit(note: &Note) -> Self {
        Self {
            mode: FormMode::Edit { id: note.id },
            title: note.title.clone(),
            description: note.description.clone(),
            priority: note.priority,
            stored_priority: Some(note.priority),
        }
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Set the priority, rejecting values the picker cannot show other than
    /// the edited note's stored one
    pub fn set_priority(&mut self, priority: i32) -> Result<(), FormError> {
        self.accept_priority(priority)?;
        self.priority = priority;
        Ok(())
    }

    /// Step up; an out-of-range value lands back inside the picker's range
    pub fn increment_priority(&mut self) {
        self.priority = self
            .priority
            .saturating_add(1)
            .clamp(MIN_PRIORITY, MAX_PRIORITY);
    }

    pub fn decrement_priority(&mut self) {
        self.priority = self
            .priority
            .saturating_sub(1)
            .clamp(MIN_PRIORITY, MAX_PRIORITY);
    }

    fn accept_priority(&self, priority: i32) -> Result<(), FormError> {
        if self.stored_priority == Some(priority) {
            return Ok(());
        }
        check_priority(priority)
    }

    pub fn title_label(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Add Note",
            FormMode::Edit { .. } => "Edit Note",
        }
    }

    /// Validate and produce the payload for the list screen
    ///
    /// Title and description must contain something other than whitespace.
    /// The values are returned as typed, untrimmed.
    pub fn submit(&self) -> Result<FormPayload, FormError> {
        validate_fields(&self.title, &self.description)?;
        self.accept_priority(self.priority)?;

        let payload = match self.mode {
            FormMode::Add => FormPayload::Add(AddNotePayload {
                title: self.title.clone(),
                description: self.description.clone(),
                priority: self.priority,
            }),
            FormMode::Edit { id } => FormPayload::Edit(EditNotePayload {
                id,
                title: self.title.clone(),
                description: self.description.clone(),
                priority: self.priority,
            }),
        };
        Ok(payload)
    }
}

/// Reject blank titles or descriptions
pub fn validate_fields(title: &str, description: &str) -> Result<(), FormError> {
    if title.trim().is_empty() || description.trim().is_empty() {
        return Err(FormError::MissingFields);
    }
    Ok(())
}

/// Reject priorities outside the picker's range
pub fn check_priority(priority: i32) -> Result<(), FormError> {
    if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        return Err(FormError::PriorityOutOfRange(priority));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_form_defaults() {
        let form = NoteForm::add();
        assert_eq!(form.mode, FormMode::Add);
        assert_eq!(form.priority(), MIN_PRIORITY);
        assert_eq!(form.title_label(), "Add Note");
    }

    #[test]
    fn test_blank_fields_block_save() {
        let mut form = NoteForm::add();
        assert_eq!(form.submit(), Err(FormError::MissingFields));

        form.title = "Title".to_string();
        form.description = "   \t".to_string();
        assert_eq!(form.submit(), Err(FormError::MissingFields));

        form.title = "  ".to_string();
        form.description = "Body".to_string();
        assert_eq!(form.submit(), Err(FormError::MissingFields));

        assert_eq!(
            FormError::MissingFields.to_string(),
            "Please insert a title and description"
        );
    }

    #[test]
    fn test_add_submit() {
        let mut form = NoteForm::add();
        form.title = "Title".to_string();
        form.description = "Body".to_string();
        form.set_priority(7).unwrap();

        let payload = form.submit().unwrap();
        assert_eq!(
            payload,
            FormPayload::Add(AddNotePayload {
                title: "Title".to_string(),
                description: "Body".to_string(),
                priority: 7,
            })
        );
    }

    #[test]
    fn test_edit_submit_carries_id() {
        let note = Note::with_id(12, "Old", "Old body", 3);
        let mut form = NoteForm::edit(&note);
        assert_eq!(form.title_label(), "Edit Note");
        form.description = "New body".to_string();

        match form.submit().unwrap() {
            FormPayload::Edit(payload) => {
                let edited = payload.into_note().unwrap();
                assert_eq!(edited, Note::with_id(12, "Old", "New body", 3));
            }
            other => panic!("expected edit payload, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_id_aborts_update() {
        let payload = EditNotePayload {
            id: NO_NOTE_ID,
            title: "T".to_string(),
            description: "D".to_string(),
            priority: 1,
        };
        assert_eq!(payload.into_note(), Err(PayloadError::MissingId));
        assert_eq!(PayloadError::MissingId.to_string(), "Note can't be updated");
    }

    #[test]
    fn test_priority_picker_is_clamped() {
        let mut form = NoteForm::add();
        form.decrement_priority();
        assert_eq!(form.priority(), MIN_PRIORITY);

        for _ in 0..20 {
            form.increment_priority();
        }
        assert_eq!(form.priority(), MAX_PRIORITY);

        assert_eq!(form.set_priority(11), Err(FormError::PriorityOutOfRange(11)));
        assert_eq!(form.set_priority(0), Err(FormError::PriorityOutOfRange(0)));
        assert_eq!(form.priority(), MAX_PRIORITY);
    }

    #[test]
    fn test_edit_keeps_out_of_range_stored_priority() {
        let note = Note::with_id(1, "T", "D", 42);
        let mut form = NoteForm::edit(&note);
        assert_eq!(form.priority(), 42);

        form.title = "Renamed".to_string();
        assert_eq!(form.set_priority(42), Ok(()));
        match form.submit().unwrap() {
            FormPayload::Edit(payload) => assert_eq!(payload.priority, 42),
            other => panic!("expected edit payload, got {:?}", other),
        }

        // Other out-of-range values are still rejected
        assert_eq!(form.set_priority(43), Err(FormError::PriorityOutOfRange(43)));
        assert_eq!(form.priority(), 42);
    }

    #[test]
    fn test_touching_out_of_range_priority_clamps() {
        let note = Note::with_id(1, "T", "D", 42);

        let mut form = NoteForm::edit(&note);
        form.decrement_priority();
        assert_eq!(form.priority(), MAX_PRIORITY);

        let mut form = NoteForm::edit(&note);
        form.increment_priority();
        assert_eq!(form.priority(), MAX_PRIORITY);

        let mut form = NoteForm::edit(&Note::with_id(2, "T", "D", -5));
        form.increment_priority();
        assert_eq!(form.priority(), MIN_PRIORITY);

        let mut form = NoteForm::edit(&Note::with_id(3, "T", "D", i32::MAX));
        form.increment_priority();
        assert_eq!(form.priority(), MAX_PRIORITY);
    }

    #[test]
    fn test_add_form_range_checks_every_priority() {
        let mut form = NoteForm::add();
        form.title = "T".to_string();
        form.description = "D".to_string();
        assert_eq!(form.set_priority(42), Err(FormError::PriorityOutOfRange(42)));
        assert!(form.submit().is_ok());
    }

    #[test]
    fn test_add_payload_into_new_note() {
        let payload = AddNotePayload {
            title: "T".to_string(),
            description: "D".to_string(),
            priority: 4,
        };
        assert_eq!(payload.into_new_note(), NewNote::new("T", "D", 4));
    }
}
