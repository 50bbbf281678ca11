//! List adapter for the notes pane
//!
//! Holds the rows currently on screen. New snapshots are applied as a
//! minimal diff so the selection stays on the same note and only touched
//! rows get highlighted.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use notekeep_core::diff::{self, ListOp};
use notekeep_core::Note;

/// How long inserted/changed/moved rows stay highlighted
const HIGHLIGHT_DURATION: Duration = Duration::from_millis(800);

/// Row interactions forwarded to the list screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterEvent {
    /// Row activated (Enter)
    Open(Note),
    /// Row swiped away (d)
    Delete(Note),
}

#[derive(Default)]
pub struct NoteListAdapter {
    rows: Vec<Note>,
    selected: usize,
    highlighted: HashSet<i64>,
    highlighted_at: Option<Instant>,
}

impl NoteListAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a new snapshot, returning the operations that were applied
    pub fn submit_list(&mut self, notes: &[Note]) -> Vec<ListOp> {
        let selected_id = self.selected_note().map(|n| n.id);

        let ops = diff::diff(&self.rows, notes);
        if ops.is_empty() {
            return ops;
        }
        diff::apply(&mut self.rows, &ops);

        self.highlighted.clear();
        for op in &ops {
            match op {
                ListOp::Insert { note, .. } | ListOp::Change { note, .. } => {
                    self.highlighted.insert(note.id);
                }
                ListOp::Move { to, .. } => {
                    if let Some(note) = self.rows.get(*to) {
                        self.highlighted.insert(note.id);
                    }
                }
                ListOp::Remove { .. } => {}
            }
        }
        self.highlighted_at = Some(Instant::now());

        // Keep the cursor on the same note when it survived
        self.selected = selected_id
            .and_then(|id| self.rows.iter().position(|n| n.id == id))
            .unwrap_or_else(|| self.selected.min(self.rows.len().saturating_sub(1)));

        ops
    }

    /// Drop expired row highlights
    pub fn check_highlight_timeout(&mut self) {
        if let Some(at) = self.highlighted_at {
            if at.elapsed() > HIGHLIGHT_DURATION {
                self.highlighted.clear();
                self.highlighted_at = None;
            }
        }
    }

    pub fn is_highlighted(&self, note: &Note) -> bool {
        self.highlighted.contains(&note.id)
    }

    pub fn rows(&self) -> &[Note] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Note at a row position
    pub fn note_at(&self, position: usize) -> Option<&Note> {
        self.rows.get(position)
    }

    pub fn selected(&self) -> Option<usize> {
        if self.rows.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.selected().and_then(|i| self.note_at(i))
    }

    pub fn select_next(&mut self) {
        if self.selected < self.rows.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    /// Activate the selected row
    pub fn click(&self) -> Option<AdapterEvent> {
        self.selected_note().cloned().map(AdapterEvent::Open)
    }

    /// Swipe the selected row away
    pub fn swipe(&self) -> Option<AdapterEvent> {
        self.selected_note().cloned().map(AdapterEvent::Delete)
    }
}
