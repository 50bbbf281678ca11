//! Note repository
//!
//! Runs every DAO call on a blocking worker and hands the outcome back to the
//! caller. After each mutation the full ordered list is re-read and published
//! to subscribers as a new snapshot.
//!
//! ```ignore
//! let repo = NoteRepository::new(Arc::new(SqliteNoteDao::new(db)))?;
//! let mut notes = repo.subscribe();
//!
//! repo.insert(NewNote::new("Title", "Body", 3)).await?;
//! let latest = notes.changed().await;
//! ```

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::models::{NewNote, Note};
use crate::storage::{NoteDao, StorageError, StorageResult};

/// An immutable list of notes, highest priority first
pub type NoteSnapshot = Arc<[Note]>;

/// Publishes list snapshots; refreshes are serialized so a stale read can
/// never overwrite a newer one.
struct Publisher {
    tx: watch::Sender<NoteSnapshot>,
    refresh_lock: Mutex<()>,
}

impl Publisher {
    fn refresh(&self, dao: &dyn NoteDao) -> StorageResult<()> {
        let _guard = self.refresh_lock.lock().unwrap_or_else(|e| e.into_inner());
        let notes = dao.get_all()?;
        debug!(count = notes.len(), "Publishing note snapshot");
        self.tx.send_replace(notes.into());
        Ok(())
    }
}

/// Asynchronous access to the note store plus the live note list
#[derive(Clone)]
pub struct NoteRepository {
    dao: Arc<dyn NoteDao>,
    publisher: Arc<Publisher>,
}

impl NoteRepository {
    /// Create a repository, loading the initial snapshot from the DAO
    pub fn new(dao: Arc<dyn NoteDao>) -> StorageResult<Self> {
        let initial: NoteSnapshot = dao.get_all()?.into();
        let (tx, _) = watch::channel(initial);

        Ok(Self {
            dao,
            publisher: Arc::new(Publisher {
                tx,
                refresh_lock: Mutex::new(()),
            }),
        })
    }

    /// Run `op` on a blocking worker, publishing a fresh snapshot afterwards
    /// when `publish` is set
    ///
    /// The result describes `op` alone. A refresh that fails after a
    /// committed change is logged and leaves the previous snapshot in place.
    async fn run<T, F>(&self, name: &'static str, publish: bool, op: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn NoteDao) -> StorageResult<T> + Send + 'static,
    {
        let dao = Arc::clone(&self.dao);
        let publisher = Arc::clone(&self.publisher);

        let outcome = tokio::task::spawn_blocking(move || {
            let value = op(dao.as_ref())?;
            if publish {
                if let Err(e) = publisher.refresh(dao.as_ref()) {
                    warn!(operation = name, error = %e, "Change committed but note list refresh failed");
                }
            }
            Ok(value)
        })
        .await
        .map_err(|e| StorageError::TaskFailed(format!("{}: {}", name, e)))?;

        if let Err(e) = &outcome {
            warn!(operation = name, error = %e, "Note storage operation failed");
        }
        outcome
    }

    /// Insert a note, returning it with its assigned id
    pub async fn insert(&self, note: NewNote) -> StorageResult<Note> {
        self.run("insert", true, move |dao| dao.insert(&note)).await
    }

    /// Replace a note's fields; `false` when no note has that id
    pub async fn update(&self, note: Note) -> StorageResult<bool> {
        self.run("update", true, move |dao| dao.update(&note)).await
    }

    /// Delete a note; `false` when no note has that id
    pub async fn delete(&self, note: Note) -> StorageResult<bool> {
        self.run("delete", true, move |dao| dao.delete(&note)).await
    }

    /// Delete every note, returning how many were removed
    pub async fn delete_all(&self) -> StorageResult<usize> {
        self.run("delete_all", true, |dao| dao.delete_all()).await
    }

    /// Look up one note
    pub async fn get(&self, id: i64) -> StorageResult<Option<Note>> {
        self.run("get", false, move |dao| dao.get(id)).await
    }

    /// Count stored notes
    pub async fn count(&self) -> StorageResult<i64> {
        self.run("count", false, |dao| dao.count()).await
    }

    /// The most recently published snapshot
    pub fn snapshot(&self) -> NoteSnapshot {
        self.publisher.tx.borrow().clone()
    }

    /// Attach an observer to the live note list
    pub fn subscribe(&self) -> NoteSubscription {
        NoteSubscription {
            rx: self.publisher.tx.subscribe(),
        }
    }

    /// Number of attached observers
    pub fn observer_count(&self) -> usize {
        self.publisher.tx.receiver_count()
    }
}

/// A live view of all notes
///
/// Only the latest snapshot is kept: an observer that is slow, or that
/// subscribes late, sees the current list and skips intermediate ones.
/// Dropping the subscription detaches it.
pub struct NoteSubscription {
    rx: watch::Receiver<NoteSnapshot>,
}

impl NoteSubscription {
    /// The latest snapshot, without waiting
    pub fn current(&self) -> NoteSnapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot
    ///
    /// Returns `None` once the repository and all in-flight operations are gone.
    pub async fn changed(&mut self) -> Option<NoteSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Whether a snapshot newer than the last one seen is waiting
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Detach from the list
    pub fn unsubscribe(self) {}
}
