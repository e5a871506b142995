//! Script generation error types

use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid project description:\n{}", format_validation(.0))]
    InvalidInput(Vec<ValidationError>),

    #[error("Unknown shell dialect '{0}' (expected 'bash' or 'sh')")]
    UnknownDialect(String),

    #[error("I/O error at {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl BuildError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }

    /// Validation errors carried by this error, if any
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::InvalidInput(errors) => errors,
            _ => &[],
        }
    }
}

/// A single problem found in the project description
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("project name is empty")]
    EmptyProjectName,

    #[error("hot reload target name is empty")]
    EmptyReloadTarget,

    #[error("no configurations are registered")]
    NoConfigurations,

    #[error("configuration '{0}' is registered more than once")]
    DuplicateConfiguration(String),

    #[error("a {platform}/{compiler} target has an empty target name")]
    EmptyTargetName { platform: String, compiler: String },

    #[error("target '{target}' has an empty output binary name")]
    EmptyOutputBinary { target: String },

    #[error("target '{target}' uses unregistered configuration '{config}'")]
    UnregisteredConfiguration { target: String, config: String },

    #[error(
        "static libraries '{first}' and '{second}' share output directory '{directory}' in configuration '{config}'"
    )]
    SharedStaticLibraryDirectory {
        config: String,
        directory: String,
        first: String,
        second: String,
    },
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_lists_every_error() {
        let err = BuildError::InvalidInput(vec![
            ValidationError::EmptyProjectName,
            ValidationError::NoConfigurations,
        ]);
        let message = err.to_string();
        assert!(message.contains("  - project name is empty"));
        assert!(message.contains("  - no configurations are registered"));
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = BuildError::io(
            "/missing/build.sh",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        );
        assert!(err.to_string().contains("/missing/build.sh"));
        assert!(err.validation_errors().is_empty());
    }
}
