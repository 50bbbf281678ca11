//! Application state and logic

use std::time::{Duration, Instant};

use notekeep_core::storage::StorageResult;
use notekeep_core::{FormPayload, NewNote, Note, NoteForm};

use super::adapter::{AdapterEvent, NoteListAdapter};

/// How long a status message stays visible
const STATUS_DURATION: Duration = Duration::from_secs(3);

/// Which screen is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Live list of all notes
    List,
    /// Add/Edit form
    Form(FormState),
}

/// Field with focus on the form screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Priority,
}

impl FormField {
    /// Move to the next field (wrapping)
    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Priority,
            FormField::Priority => FormField::Title,
        }
    }

    /// Move to the previous field (wrapping)
    pub fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Priority,
            FormField::Description => FormField::Title,
            FormField::Priority => FormField::Description,
        }
    }
}

/// Form screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub form: NoteForm,
    pub field: FormField,
    /// Cursor position, in characters, within the focused text field
    pub cursor: usize,
}

impl FormState {
    fn new(form: NoteForm) -> Self {
        let cursor = form.title.chars().count();
        Self {
            form,
            field: FormField::Title,
            cursor,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Title => Some(&mut self.form.title),
            FormField::Description => Some(&mut self.form.description),
            FormField::Priority => None,
        }
    }

    fn text_len(&self) -> usize {
        match self.field {
            FormField::Title => self.form.title.chars().count(),
            FormField::Description => self.form.description.chars().count(),
            FormField::Priority => 0,
        }
    }

    fn focus(&mut self, field: FormField) {
        self.field = field;
        self.cursor = self.text_len();
    }

    pub fn next_field(&mut self) {
        self.focus(self.field.next());
    }

    pub fn prev_field(&mut self) {
        self.focus(self.field.prev());
    }

    /// Insert character at cursor position
    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor;
        if let Some(text) = self.text_mut() {
            let at = byte_index(text, cursor);
            text.insert(at, c);
            self.cursor += 1;
        }
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let cursor = self.cursor;
        if let Some(text) = self.text_mut() {
            let at = byte_index(text, cursor - 1);
            text.remove(at);
            self.cursor -= 1;
        }
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right
    pub fn cursor_right(&mut self) {
        if self.cursor < self.text_len() {
            self.cursor += 1;
        }
    }
}

/// Byte offset of the `chars`-th character
fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(i, _)| i)
}

/// A store operation requested by a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Insert(NewNote),
    Update(Note),
    Delete(Note),
    DeleteAll,
}

/// Completion of an [`Action`]
#[derive(Debug)]
pub enum ActionOutcome {
    Inserted(StorageResult<Note>),
    Updated(StorageResult<bool>),
    Deleted(StorageResult<bool>),
    DeletedAll(StorageResult<usize>),
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current screen
    pub screen: Screen,
    /// Rows of the list screen
    pub adapter: NoteListAdapter,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Waiting for y/n after "delete all"
    pub confirm_delete_all: bool,
    /// Actions dispatched and not yet completed
    pub in_flight: usize,
    /// Pending 'g' keypress for gg sequence (with timestamp)
    pub pending_g: Option<Instant>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            screen: Screen::List,
            adapter: NoteListAdapter::new(),
            status_message: None,
            status_message_time: None,
            show_help: false,
            confirm_delete_all: false,
            in_flight: 0,
            pending_g: None,
        }
    }

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    ///
    /// A pending delete-all prompt stays until it is answered.
    pub fn check_status_timeout(&mut self) {
        if self.confirm_delete_all {
            return;
        }
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_DURATION {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn is_list_screen(&self) -> bool {
        matches!(self.screen, Screen::List)
    }

    pub fn form_state(&self) -> Option<&FormState> {
        match &self.screen {
            Screen::Form(state) => Some(state),
            Screen::List => None,
        }
    }

    pub fn form_state_mut(&mut self) -> Option<&mut FormState> {
        match &mut self.screen {
            Screen::Form(state) => Some(state),
            Screen::List => None,
        }
    }

    /// Show the Add screen
    pub fn open_add_form(&mut self) {
        self.screen = Screen::Form(FormState::new(NoteForm::add()));
    }

    /// Show the Edit screen for a note
    pub fn open_edit_form(&mut self, note: &Note) {
        self.screen = Screen::Form(FormState::new(NoteForm::edit(note)));
    }

    /// React to a row event from the list
    pub fn handle_adapter_event(&mut self, event: AdapterEvent) -> Option<Action> {
        match event {
            AdapterEvent::Open(note) => {
                self.open_edit_form(&note);
                None
            }
            AdapterEvent::Delete(note) => Some(Action::Delete(note)),
        }
    }

    /// Ask before deleting every note
    pub fn request_delete_all(&mut self) {
        self.confirm_delete_all = true;
        self.set_status("Delete all notes? (y/n)");
    }

    /// Answer the delete-all prompt
    pub fn answer_delete_all(&mut self, confirmed: bool) -> Option<Action> {
        self.confirm_delete_all = false;
        if confirmed {
            Some(Action::DeleteAll)
        } else {
            self.set_status("Cancelled");
            None
        }
    }

    /// Leave the form without saving
    pub fn cancel_form(&mut self) {
        self.screen = Screen::List;
        self.set_status("Note not saved");
    }

    /// Validate the form and turn its payload into an action
    ///
    /// Invalid input keeps the form open with a message. An edit payload
    /// without an id closes the form and is reported, with nothing stored.
    pub fn save_form(&mut self) -> Option<Action> {
        let state = self.form_state()?;

        let payload = match state.form.submit() {
            Ok(payload) => payload,
            Err(e) => {
                self.set_status(e.to_string());
                return None;
            }
        };

        self.screen = Screen::List;
        match payload {
            FormPayload::Add(payload) => Some(Action::Insert(payload.into_new_note())),
            FormPayload::Edit(payload) => match payload.into_note() {
                Ok(note) => Some(Action::Update(note)),
                Err(e) => {
                    self.set_status(e.to_string());
                    None
                }
            },
        }
    }

    /// Record that an action was handed to the background
    pub fn action_started(&mut self) {
        self.in_flight += 1;
    }

    /// Report a completed action
    pub fn handle_outcome(&mut self, outcome: ActionOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);

        let message = match outcome {
            ActionOutcome::Inserted(Ok(_)) => "Note saved".to_string(),
            ActionOutcome::Inserted(Err(e)) => format!("Note not saved: {}", e),
            ActionOutcome::Updated(Ok(true)) => "Note updated".to_string(),
            ActionOutcome::Updated(Ok(false)) => "Note can't be updated".to_string(),
            ActionOutcome::Updated(Err(e)) => format!("Note can't be updated: {}", e),
            ActionOutcome::Deleted(Ok(true)) => "Note deleted".to_string(),
            ActionOutcome::Deleted(Ok(false)) => "Note was already deleted".to_string(),
            ActionOutcome::Deleted(Err(e)) => format!("Failed to delete note: {}", e),
            ActionOutcome::DeletedAll(Ok(_)) => "All notes deleted".to_string(),
            ActionOutcome::DeletedAll(Err(e)) => format!("Failed to delete notes: {}", e),
        };
        self.set_status(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notekeep_core::{StorageError, NO_NOTE_ID};

    fn filled_add_form(app: &mut App) {
        app.open_add_form();
        let state = app.form_state_mut().unwrap();
        for c in "Title".chars() {
            state.insert_char(c);
        }
        state.next_field();
        for c in "Body".chars() {
            state.insert_char(c);
        }
    }

    #[test]
    fn test_form_field_cycle() {
        assert_eq!(FormField::Title.next(), FormField::Description);
        assert_eq!(FormField::Priority.next(), FormField::Title);
        assert_eq!(FormField::Title.prev(), FormField::Priority);
    }

    #[test]
    fn test_new_app_starts_on_list() {
        let app = App::new();
        assert!(app.is_list_screen());
        assert!(app.adapter.is_empty());
        assert_eq!(app.in_flight, 0);
    }

    #[test]
    fn test_save_add_form() {
        let mut app = App::new();
        filled_add_form(&mut app);
        app.form_state_mut().unwrap().form.increment_priority();

        let action = app.save_form();
        assert_eq!(action, Some(Action::Insert(NewNote::new("Title", "Body", 2))));
        assert!(app.is_list_screen());
    }

    #[test]
    fn test_blank_form_stays_open() {
        let mut app = App::new();
        app.open_add_form();

        assert_eq!(app.save_form(), None);
        assert!(!app.is_list_screen());
        assert_eq!(
            app.status_message.as_deref(),
            Some("Please insert a title and description")
        );
    }

    #[test]
    fn test_cancel_form_reports_not_saved() {
        let mut app = App::new();
        filled_add_form(&mut app);
        app.cancel_form();
        assert!(app.is_list_screen());
        assert_eq!(app.status_message.as_deref(), Some("Note not saved"));
    }

    #[test]
    fn test_open_event_edits_note() {
        let mut app = App::new();
        let note = Note::with_id(3, "Old", "Body", 5);

        assert_eq!(app.handle_adapter_event(AdapterEvent::Open(note.clone())), None);
        let state = app.form_state_mut().unwrap();
        state.form.title = "New".to_string();

        assert_eq!(
            app.save_form(),
            Some(Action::Update(Note::with_id(3, "New", "Body", 5)))
        );
    }

    #[test]
    fn test_edit_without_id_is_rejected() {
        let mut app = App::new();
        app.open_edit_form(&Note::with_id(NO_NOTE_ID, "T", "D", 1));

        assert_eq!(app.save_form(), None);
        assert!(app.is_list_screen());
        assert_eq!(app.status_message.as_deref(), Some("Note can't be updated"));
    }

    #[test]
    fn test_delete_event_becomes_action() {
        let mut app = App::new();
        let note = Note::with_id(1, "T", "D", 1);
        assert_eq!(
            app.handle_adapter_event(AdapterEvent::Delete(note.clone())),
            Some(Action::Delete(note))
        );
        assert!(app.is_list_screen());
    }

    #[test]
    fn test_delete_all_needs_confirmation() {
        let mut app = App::new();
        app.request_delete_all();
        assert!(app.confirm_delete_all);
        assert_eq!(app.answer_delete_all(false), None);
        assert!(!app.confirm_delete_all);

        app.request_delete_all();
        assert_eq!(app.answer_delete_all(true), Some(Action::DeleteAll));
    }

    #[test]
    fn test_outcome_messages() {
        let mut app = App::new();
        app.action_started();
        app.action_started();

        app.handle_outcome(ActionOutcome::Inserted(Ok(Note::with_id(1, "T", "D", 1))));
        assert_eq!(app.status_message.as_deref(), Some("Note saved"));
        assert_eq!(app.in_flight, 1);

        app.handle_outcome(ActionOutcome::Updated(Ok(false)));
        assert_eq!(app.status_message.as_deref(), Some("Note can't be updated"));
        assert_eq!(app.in_flight, 0);

        app.handle_outcome(ActionOutcome::Deleted(Ok(true)));
        assert_eq!(app.status_message.as_deref(), Some("Note deleted"));

        app.handle_outcome(ActionOutcome::DeletedAll(Ok(3)));
        assert_eq!(app.status_message.as_deref(), Some("All notes deleted"));

        app.handle_outcome(ActionOutcome::Inserted(Err(StorageError::TaskFailed(
            "insert: boom".to_string(),
        ))));
        assert_eq!(
            app.status_message.as_deref(),
            Some("Note not saved: Storage task failed: insert: boom")
        );
        assert_eq!(app.in_flight, 0);
    }

    #[test]
    fn test_text_editing_handles_multibyte() {
        let mut app = App::new();
        app.open_add_form();
        let state = app.form_state_mut().unwrap();

        for c in "héllo".chars() {
            state.insert_char(c);
        }
        state.cursor_left();
        state.cursor_left();
        state.delete_char();
        assert_eq!(state.form.title, "hélo");
        assert_eq!(state.cursor, 2);

        state.insert_char('ü');
        assert_eq!(state.form.title, "héülo");

        for _ in 0..10 {
            state.cursor_right();
        }
        assert_eq!(state.cursor, 5);
    }

    #[test]
    fn test_priority_field_ignores_text() {
        let mut app = App::new();
        app.open_add_form();
        let state = app.form_state_mut().unwrap();
        state.prev_field();
        assert_eq!(state.field, FormField::Priority);

        state.insert_char('x');
        state.delete_char();
        assert_eq!(state.form.title, "");
        assert_eq!(state.form.description, "");
    }

    #[test]
    fn test_status_timeout() {
        let mut app = App::new();
        app.set_status("Hello");
        app.check_status_timeout();
        assert_eq!(app.status_message.as_deref(), Some("Hello"));

        app.status_message_time = Some(Instant::now() - Duration::from_secs(4));
        app.check_status_timeout();
        assert_eq!(app.status_message, None);
    }

    #[test]
    fn test_delete_all_prompt_outlives_status_timeout() {
        let mut app = App::new();
        app.request_delete_all();

        app.status_message_time = Some(Instant::now() - Duration::from_secs(10));
        app.check_status_timeout();
        assert!(app.confirm_delete_all);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Delete all notes? (y/n)")
        );

        assert_eq!(app.answer_delete_all(false), None);
        assert_eq!(app.status_message.as_deref(), Some("Cancelled"));
        app.status_message_time = Some(Instant::now() - Duration::from_secs(4));
        app.check_status_timeout();
        assert_eq!(app.status_message, None);
    }
}
