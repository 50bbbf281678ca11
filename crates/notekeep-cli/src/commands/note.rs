//! Note command handlers
//!
//! Every command goes through the same view model the TUI uses, so writes
//! made here show up in any open list.

use anyhow::{anyhow, bail, Context, Result};
use tracing::debug;

use notekeep_core::{FormPayload, Note, NoteForm, NoteViewModel};

use crate::editor::{apply_template, confirm, edit_text, note_template};
use crate::output::Output;

/// Field values given on the command line
#[derive(Debug, Default, Clone)]
pub struct NoteFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<i32>,
}

impl NoteFields {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.priority.is_none()
    }

    fn apply(self, form: &mut NoteForm) -> Result<()> {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(priority) = self.priority {
            form.set_priority(priority)?;
        }
        Ok(())
    }
}

/// Create a new note
///
/// Opens the editor unless both title and description were given.
pub async fn add(view_model: &NoteViewModel, fields: NoteFields, output: &Output) -> Result<()> {
    let needs_editor = fields.title.is_none() || fields.description.is_none();

    let mut form = NoteForm::add();
    fields.apply(&mut form)?;
    if needs_editor {
        let edited = edit_text(&note_template(&form)).context("Failed to edit note")?;
        apply_template(&edited, &mut form)?;
    }

    let payload = match form.submit()? {
        FormPayload::Add(payload) => payload,
        FormPayload::Edit(_) => bail!("Note not saved"),
    };

    let note = view_model
        .insert(payload.into_new_note())
        .await
        .context("Note not saved")?;
    debug!(id = note.id, "Added note from command line");

    if output.is_quiet() {
        println!("{}", note.id);
    } else {
        output.success(&format!("Note saved (id {})", note.id));
    }
    Ok(())
}

/// List all notes, highest priority first
pub fn list(view_model: &NoteViewModel, output: &Output) -> Result<()> {
    output.print_notes(&view_model.snapshot());
    Ok(())
}

/// Show a single note
pub async fn show(view_model: &NoteViewModel, id: i64, output: &Output) -> Result<()> {
    let note = find_note(view_model, id).await?;
    output.print_note(&note);
    Ok(())
}

/// Edit a note
///
/// Without field flags the note is opened in the editor.
pub async fn edit(
    view_model: &NoteViewModel,
    id: i64,
    fields: NoteFields,
    output: &Output,
) -> Result<()> {
    let note = find_note(view_model, id).await?;

    let mut form = NoteForm::edit(&note);
    if fields.is_empty() {
        let edited = edit_text(&note_template(&form)).context("Failed to edit note")?;
        apply_template(&edited, &mut form)?;
    } else {
        fields.apply(&mut form)?;
    }

    let payload = match form.submit()? {
        FormPayload::Edit(payload) => payload,
        FormPayload::Add(_) => bail!("Note can't be updated"),
    };
    let edited = payload.into_note()?;

    if edited == note {
        output.message("No changes.");
        return Ok(());
    }

    let updated = view_model
        .update(edited)
        .await
        .context("Note can't be updated")?;
    if !updated {
        bail!("Note can't be updated");
    }

    output.success("Note updated");
    Ok(())
}

/// Delete a note
pub async fn delete(view_model: &NoteViewModel, id: i64, output: &Output) -> Result<()> {
    let note = find_note(view_model, id).await?;

    if output.should_prompt() {
        println!("Delete note: {} - {}", note.id, note.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let deleted = view_model
        .delete(note)
        .await
        .context("Failed to delete note")?;
    if !deleted {
        bail!("Note {} no longer exists", id);
    }

    output.success("Note deleted");
    Ok(())
}

/// Delete every note
pub async fn clear(view_model: &NoteViewModel, yes: bool, output: &Output) -> Result<()> {
    if !yes {
        if !output.should_prompt() {
            bail!("Refusing to delete all notes without --yes");
        }
        let count = view_model.count().await?;
        println!("Delete all {} note(s)", count);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = view_model
        .delete_all_notes()
        .await
        .context("Failed to delete notes")?;

    output.success(&format!("All notes deleted ({})", removed));
    Ok(())
}

async fn find_note(view_model: &NoteViewModel, id: i64) -> Result<Note> {
    view_model
        .get(id)
        .await
        .context("Failed to load note")?
        .ok_or_else(|| anyhow!("Note not found: {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use notekeep_core::{NewNote, NoteDatabase, NoteRepository, SqliteNoteDao};
    use std::sync::Arc;

    fn view_model() -> NoteViewModel {
        let db = Arc::new(NoteDatabase::open_in_memory(false).unwrap());
        let repository = NoteRepository::new(Arc::new(SqliteNoteDao::new(db))).unwrap();
        NoteViewModel::new(repository)
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    fn fields(title: &str, description: &str, priority: Option<i32>) -> NoteFields {
        NoteFields {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            priority,
        }
    }

    #[tokio::test]
    async fn test_add_with_flags() {
        let vm = view_model();
        add(&vm, fields("Title", "Body", Some(4)), &quiet())
            .await
            .unwrap();

        let notes = vm.snapshot();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Title");
        assert_eq!(notes[0].priority, 4);
    }

    #[tokio::test]
    async fn test_add_defaults_to_lowest_priority() {
        let vm = view_model();
        add(&vm, fields("Title", "Body", None), &quiet()).await.unwrap();
        assert_eq!(vm.snapshot()[0].priority, 1);
    }

    #[tokio::test]
    async fn test_add_rejects_blank_fields() {
        let vm = view_model();
        let err = add(&vm, fields("  ", "Body", None), &quiet())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please insert a title and description");
        assert_eq!(vm.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_rejects_out_of_range_priority() {
        let vm = view_model();
        assert!(add(&vm, fields("T", "D", Some(11)), &quiet()).await.is_err());
        assert_eq!(vm.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_edit_single_field() {
        let vm = view_model();
        let note = vm.insert(NewNote::new("Old", "Body", 2)).await.unwrap();

        let change = NoteFields {
            priority: Some(8),
            ..Default::default()
        };
        edit(&vm, note.id, change, &quiet()).await.unwrap();

        let stored = vm.get(note.id).await.unwrap().unwrap();
        assert_eq!(stored, Note::with_id(note.id, "Old", "Body", 8));
    }

    #[tokio::test]
    async fn test_edit_title_keeps_out_of_range_priority() {
        let vm = view_model();
        let note = vm.insert(NewNote::new("Old", "Body", 42)).await.unwrap();

        let change = NoteFields {
            title: Some("New".to_string()),
            ..Default::default()
        };
        edit(&vm, note.id, change, &quiet()).await.unwrap();

        let stored = vm.get(note.id).await.unwrap().unwrap();
        assert_eq!(stored, Note::with_id(note.id, "New", "Body", 42));
    }

    #[tokio::test]
    async fn test_edit_unknown_note() {
        let vm = view_model();
        let err = edit(&vm, 99, fields("T", "D", None), &quiet())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Note not found: 99");
    }

    #[tokio::test]
    async fn test_delete_without_prompt() {
        let vm = view_model();
        let note = vm.insert(NewNote::new("T", "D", 1)).await.unwrap();

        delete(&vm, note.id, &quiet()).await.unwrap();
        assert!(vm.get(note.id).await.unwrap().is_none());
        assert!(delete(&vm, note.id, &quiet()).await.is_err());
    }

    #[tokio::test]
    async fn test_clear_requires_yes_when_not_interactive() {
        let vm = view_model();
        vm.insert(NewNote::new("T", "D", 1)).await.unwrap();

        assert!(clear(&vm, false, &quiet()).await.is_err());
        assert_eq!(vm.count().await.unwrap(), 1);

        clear(&vm, true, &quiet()).await.unwrap();
        assert_eq!(vm.count().await.unwrap(), 0);
    }
}
