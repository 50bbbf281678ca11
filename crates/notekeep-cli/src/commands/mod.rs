//! Subcommand handlers

pub mod config;
pub mod note;
pub mod status;
