//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use notekeep_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "seed_sample_notes": config.seed_sample_notes,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:          {}", config.data_dir.display());
            println!("  seed_sample_notes: {}", config.seed_sample_notes);
            println!(
                "  log_file:          {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply_setting(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "seed_sample_notes" => {
            config.seed_sample_notes = value
                .parse()
                .context("Invalid value for seed_sample_notes. Use 'true' or 'false'.")?;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, seed_sample_notes, log_file",
                key
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_setting() {
        let mut config = Config::default();

        apply_setting(&mut config, "seed_sample_notes", "true").unwrap();
        assert!(config.seed_sample_notes);

        apply_setting(&mut config, "log_file", "/tmp/notekeep.log").unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/notekeep.log")));
        apply_setting(&mut config, "log_file", "none").unwrap();
        assert_eq!(config.log_file, None);

        apply_setting(&mut config, "data_dir", "/tmp/notes").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/notes"));
    }

    #[test]
    fn test_apply_setting_rejects_bad_input() {
        let mut config = Config::default();
        assert!(apply_setting(&mut config, "seed_sample_notes", "maybe").is_err());
        assert!(apply_setting(&mut config, "theme", "dark").is_err());
    }

    #[test]
    fn test_set_writes_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let data_dir = dir.path().join("data");
        std::fs::write(&path, format!("data_dir = {:?}\n", data_dir.display().to_string())).unwrap();
        let output = Output::new(OutputFormat::Quiet);

        set(
            "seed_sample_notes".to_string(),
            "true".to_string(),
            Some(&path),
            &output,
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let saved: Config = toml::from_str(&content).unwrap();
        assert!(saved.seed_sample_notes);
        assert_eq!(saved.data_dir, data_dir);
    }
}
