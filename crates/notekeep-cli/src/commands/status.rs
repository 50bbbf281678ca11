//! Status command handler

use anyhow::Result;

use notekeep_core::{Config, NoteDatabase, NoteViewModel, OpenOutcome};

use crate::output::{Output, OutputFormat};

/// Show status information
pub async fn show(
    config: &Config,
    db: &NoteDatabase,
    view_model: &NoteViewModel,
    output: &Output,
) -> Result<()> {
    let count = view_model.count().await?;
    let schema_version = db.schema_version()?;
    let db_path = db
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ":memory:".to_string());
    let db_size = db
        .path()
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "database": db_path,
                    "database_size": db_size,
                    "schema_version": schema_version,
                    "opened": describe_outcome(db.open_outcome()),
                    "notes": count
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", count);
        }
        OutputFormat::Human => {
            println!("notekeep Status");
            println!("===============");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Database: {}", db_path);
            println!("  Size:     {}", format_size(db_size));
            println!("  Schema:   v{}", schema_version);
            println!("  Opened:   {}", describe_outcome(db.open_outcome()));
            println!();
            println!("Contents:");
            println!("  Notes: {}", count);
        }
    }

    Ok(())
}

fn describe_outcome(outcome: OpenOutcome) -> String {
    match outcome {
        OpenOutcome::Reopened => "existing store".to_string(),
        OpenOutcome::Created { seeded: false } => "created".to_string(),
        OpenOutcome::Created { seeded: true } => "created with sample notes".to_string(),
        OpenOutcome::Migrated { from, seeded } => {
            let mut text = format!("recreated from schema v{}", from);
            if seeded {
                text.push_str(" with sample notes");
            }
            text
        }
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
