//! Interactive editing support
//!
//! Opens $EDITOR for writing or editing a note, and prompts for
//! confirmation before destructive commands.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

use notekeep_core::NoteForm;

/// Open content in the user's preferred editor
///
/// Uses $EDITOR, $VISUAL, or falls back to common editors.
pub fn edit_text(initial_content: &str) -> Result<String> {
    let editor = find_editor()?;

    let temp_path = env::temp_dir().join(format!("notekeep_edit_{}.txt", std::process::id()));

    fs::write(&temp_path, initial_content)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;

    if !status.success() {
        let _ = fs::remove_file(&temp_path);
        bail!(
            "Editor '{}' exited with non-zero status. Check that your editor is configured correctly.",
            editor
        );
    }

    let content = fs::read_to_string(&temp_path)
        .with_context(|| format!("Failed to read edited file: {:?}", temp_path))?;

    let _ = fs::remove_file(&temp_path);

    Ok(content)
}

/// Find the user's preferred editor
fn find_editor() -> Result<String> {
    if let Ok(editor) = env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    if let Ok(visual) = env::var("VISUAL") {
        if !visual.is_empty() {
            return Ok(visual);
        }
    }

    let common_editors = ["nano", "vim", "vi", "emacs", "notepad"];

    for editor in common_editors {
        if command_exists(editor) {
            return Ok(editor.to_string());
        }
    }

    bail!(
        "No editor found. Set $EDITOR environment variable.\n\
         Example: export EDITOR=nano"
    )
}

/// Check if a command exists in PATH
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

/// Editor template for a note form
pub fn note_template(form: &NoteForm) -> String {
    format!(
        "# {}\n\
         # Lines starting with # above 'description:' are ignored\n\
         # Everything below 'description:' is the description, kept as written\n\n\
         title: {}\n\
         priority: {}\n\
         description:\n{}\n",
        form.title_label(),
        form.title,
        form.priority(),
        form.description
    )
}

/// Copy edited template values back into the form
///
/// Unknown lines are ignored. A priority that is not a number or is outside
/// the picker's range is an error. The description is everything after the
/// `description:` line, minus the final newline the template adds.
pub fn apply_template(content: &str, form: &mut NoteForm) -> Result<()> {
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        offset += line.len();

        let field = line.trim_end_matches(['\r', '\n']).trim_start();
        if field.starts_with('#') {
            continue;
        }

        if let Some(value) = field.strip_prefix("title:") {
            form.title = field_value(value).to_string();
        } else if let Some(value) = field.strip_prefix("priority:") {
            let priority: i32 = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid priority: '{}'", value.trim()))?;
            form.set_priority(priority)?;
        } else if let Some(value) = field.strip_prefix("description:") {
            let rest = &content[offset..];
            let body = match field_value(value) {
                "" => rest.to_string(),
                first => format!("{}\n{}", first, rest),
            };
            form.description = body.strip_suffix('\n').unwrap_or(&body).to_string();
            break;
        }
    }

    Ok(())
}

/// Text after a `key:` prefix, without the separating space
fn field_value(value: &str) -> &str {
    value.strip_prefix(' ').unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notekeep_core::{FormError, FormPayload, Note};

    #[test]
    fn test_find_editor_with_env() {
        // This test depends on environment, so just verify it doesn't panic
        let _ = find_editor();
    }

    #[test]
    fn test_command_exists() {
        #[cfg(unix)]
        assert!(command_exists("ls"));

        assert!(!command_exists("definitely_not_a_real_command_12345"));
    }

    #[test]
    fn test_template_round_trip_keeps_values() {
        let note = Note::with_id(4, "Title", "Line one\nLine two", 6);
        let mut form = NoteForm::edit(&note);
        let template = note_template(&form);
        assert!(template.starts_with("# Edit Note"));

        apply_template(&template, &mut form).unwrap();
        assert_eq!(form.title, "Title");
        assert_eq!(form.description, "Line one\nLine two");
        assert_eq!(form.priority(), 6);
    }

    #[test]
    fn test_apply_template_edits() {
        let mut form = NoteForm::add();
        let content = "# Add Note\n\
                       unknown: line\n\
                       title: Shopping\n\
                       priority: 9\n\
                       description: Milk\n\
                       Eggs\n\
                       # not a comment here\n\
                       Bread\n";

        apply_template(content, &mut form).unwrap();
        assert_eq!(form.title, "Shopping");
        assert_eq!(form.priority(), 9);
        assert_eq!(form.description, "Milk\nEggs\n# not a comment here\nBread");
    }

    #[test]
    fn test_unchanged_template_keeps_note_exactly() {
        let note = Note::with_id(9, "  Indented", "# Agenda\n- item\n\n", 3);
        let mut form = NoteForm::edit(&note);

        apply_template(&note_template(&form), &mut form).unwrap();
        assert_eq!(form.title, "  Indented");
        assert_eq!(form.description, "# Agenda\n- item\n\n");
        assert_eq!(form.priority(), 3);

        match form.submit().unwrap() {
            FormPayload::Edit(payload) => assert_eq!(payload.into_note().unwrap(), note),
            other => panic!("expected edit payload, got {:?}", other),
        }
    }

    #[test]
    fn test_template_keeps_stored_out_of_range_priority() {
        let note = Note::with_id(2, "T", "D", 42);
        let mut form = NoteForm::edit(&note);

        apply_template(&note_template(&form), &mut form).unwrap();
        assert_eq!(form.priority(), 42);
    }

    #[test]
    fn test_apply_template_rejects_bad_priority() {
        let mut form = NoteForm::add();
        assert!(apply_template("priority: high\n", &mut form).is_err());

        let err = apply_template("priority: 42\n", &mut form).unwrap_err();
        assert_eq!(
            err.downcast_ref::<FormError>(),
            Some(&FormError::PriorityOutOfRange(42))
        );
    }

    #[test]
    fn test_cleared_template_fails_validation() {
        let mut form = NoteForm::edit(&Note::with_id(1, "T", "D", 1));
        apply_template("title:\npriority: 1\ndescription:\n", &mut form).unwrap();
        assert_eq!(form.submit(), Err(FormError::MissingFields));
    }
}
