//! Pilot Light distribution packaging
//!
//! Copies public headers and moves compiled binaries out of the build output
//! directory into a staging tree, then compresses the tree into a
//! platform-named zip archive next to the build output.

pub mod archive;
pub mod manifest;
pub mod packager;
pub mod platform;

pub use archive::zip_directory;
pub use manifest::{HeaderGroup, PackageManifest};
pub use packager::{PackageReport, Packager};
pub use platform::{DebugArtifact, HostPlatform};

use std::path::PathBuf;

/// Packaging errors
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("Pilot Light not built: {} does not exist", .0.display())]
    NotBuilt(PathBuf),

    #[error("Missing artifact: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("Unsupported host platform '{0}'")]
    UnsupportedPlatform(String),

    #[error("Invalid glob pattern '{pattern}': {error}")]
    InvalidPattern {
        pattern: String,
        error: glob::PatternError,
    },

    #[error("Failed to parse manifest {}: {error}", path.display())]
    ManifestParse {
        path: PathBuf,
        error: toml::de::Error,
    },

    #[error("Failed to write archive {}: {error}", path.display())]
    Archive {
        path: PathBuf,
        error: zip::result::ZipError,
    },

    #[error("I/O error at {}: {error}", path.display())]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl PackageError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }

    /// Create an archive error with path context
    pub fn archive(path: impl Into<PathBuf>, error: zip::result::ZipError) -> Self {
        Self::Archive {
            path: path.into(),
            error,
        }
    }
}

pub type PackageResult<T> = Result<T, PackageError>;
