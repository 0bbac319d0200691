//! Error types for the kllgen CLI

use std::path::PathBuf;

use kllgen_errors::ErrorCategory;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Cannot read template {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Output directory {} is not a directory", .0.display())]
    OutputDirectory(PathBuf),
}

impl CliError {
    /// Every CLI-level failure is a filesystem failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CliError::TemplateRead { .. }
            | CliError::OutputWrite { .. }
            | CliError::OutputDirectory(_) => ErrorCategory::Io,
        }
    }
}
