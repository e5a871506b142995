//! Pilot Light build configuration
//!
//! Provides the project description consumed by the build script generator:
//! - Target settings per (platform, compiler, configuration, target)
//! - Project files (`pl_build.toml` or JSON)
//! - Global user configuration (~/.pl_build/config.toml)
//! - Environment overrides and configuration precedence
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Global config (~/.pl_build/config.toml)
//! 2. Project file (./pl_build.toml)
//! 3. Environment variables (PL_BUILD_*)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use pl_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("{}", config.script_data.project_name);
//! ```

pub mod global;
pub mod loader;
pub mod project;
pub mod settings;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("No pl_build.toml found in {0} or any parent directory")]
    ProjectNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid JSON syntax in {file}: {error}")]
    JsonParseError {
        file: PathBuf,
        error: serde_json::Error,
    },

    #[error("Unsupported project file format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use global::{GeneratorDefaults, GlobalConfig, PackageDefaults};
pub use loader::{Config, ConfigLoader, EnvOverrides};
pub use project::{ProjectFile, ProjectFormat, PROJECT_FILE_NAME};
pub use settings::{ScriptData, TargetSettings, TargetType};
