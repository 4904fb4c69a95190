//! CLI error types and exit codes

use permitio_framework::Diagnostics;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: Error diagnostics from the provider
/// - 2: Usage or I/O error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Diagnostics(Diagnostics),

    #[error("Unknown {kind} type: {name}")]
    UnknownType { kind: &'static str, name: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Diagnostics(_) => 1,
            CliError::UnknownType { .. }
            | CliError::Read { .. }
            | CliError::Write { .. }
            | CliError::Json { .. }
            | CliError::Output(_) => 2,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self.headline());
        } else {
            eprintln!("Error: {}", self.headline());
        }

        if let CliError::Diagnostics(diags) = self {
            for d in diags.iter() {
                if let Some(path) = &d.attribute {
                    eprintln!("\n  with {path}");
                }
                if !d.detail.is_empty() {
                    eprintln!("\n  {}", d.detail);
                }
            }
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {suggestion}");
            } else {
                eprintln!("\nSuggestion: {suggestion}");
            }
        }
    }

    fn headline(&self) -> String {
        match self {
            CliError::Diagnostics(diags) => diags
                .errors()
                .map(|d| d.summary.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::UnknownType { .. } => {
                Some("Run 'terraform-provider-permitio schema' to list the supported types.")
            }
            _ => None,
        }
    }
}

impl From<Diagnostics> for CliError {
    fn from(diags: Diagnostics) -> Self {
        CliError::Diagnostics(diags)
    }
}
