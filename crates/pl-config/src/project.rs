//! Project files (pl_build.toml / *.json)
//!
//! A project file is a serialized [`ScriptData`]. TOML is the default format;
//! files ending in `.json` are read as JSON.

use crate::settings::ScriptData;
use crate::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Conventional project file name
pub const PROJECT_FILE_NAME: &str = "pl_build.toml";

/// Serialization format of a project file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    Toml,
    Json,
}

impl ProjectFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// A loaded project file
#[derive(Debug, Clone)]
pub struct ProjectFile {
    /// Where the file was read from
    pub path: PathBuf,
    /// Parsed project description
    pub data: ScriptData,
}

impl ProjectFile {
    /// Load a project file, choosing the parser by extension
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let format = ProjectFormat::from_path(path)?;

        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let data = Self::parse(&content, format, path)?;
        log::debug!(
            "loaded project '{}' from {} ({} settings records)",
            data.project_name,
            path.display(),
            data.current_settings.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Parse project file content
    pub fn parse(content: &str, format: ProjectFormat, path: &Path) -> ConfigResult<ScriptData> {
        match format {
            ProjectFormat::Toml => {
                toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
                    file: path.to_path_buf(),
                    error: e,
                })
            }
            ProjectFormat::Json => {
                serde_json::from_str(content).map_err(|e| ConfigError::JsonParseError {
                    file: path.to_path_buf(),
                    error: e,
                })
            }
        }
    }

    /// Directory containing the project file
    pub fn root(&self) -> Option<&Path> {
        self.path.parent()
    }
}
