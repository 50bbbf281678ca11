//! Screen-facing note operations
//!
//! [`NoteViewModel`] is owned by the application rather than by any screen,
//! so the live list and in-flight operations survive screens coming and
//! going. Every call forwards to the [`NoteRepository`].

use crate::models::{NewNote, Note};
use crate::repository::{NoteRepository, NoteSnapshot, NoteSubscription};
use crate::storage::StorageResult;

#[derive(Clone)]
pub struct NoteViewModel {
    repository: NoteRepository,
}

impl NoteViewModel {
    pub fn new(repository: NoteRepository) -> Self {
        Self { repository }
    }

    pub async fn insert(&self, note: NewNote) -> StorageResult<Note> {
        self.repository.insert(note).await
    }

    pub async fn update(&self, note: Note) -> StorageResult<bool> {
        self.repository.update(note).await
    }

    pub async fn delete(&self, note: Note) -> StorageResult<bool> {
        self.repository.delete(note).await
    }

    pub async fn delete_all_notes(&self) -> StorageResult<usize> {
        self.repository.delete_all().await
    }

    pub async fn get(&self, id: i64) -> StorageResult<Option<Note>> {
        self.repository.get(id).await
    }

    pub async fn count(&self) -> StorageResult<i64> {
        self.repository.count().await
    }

    /// Subscribe to the live list of all notes, highest priority first
    pub fn all_notes(&self) -> NoteSubscription {
        self.repository.subscribe()
    }

    /// The current list without subscribing
    pub fn snapshot(&self) -> NoteSnapshot {
        self.repository.snapshot()
    }

    pub fn observer_count(&self) -> usize {
        self.repository.observer_count()
    }
}
