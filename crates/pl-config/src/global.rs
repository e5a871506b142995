//! Global Configuration (~/.pl_build/config.toml)
//!
//! Handles user-level defaults for script generation and packaging.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global user configuration from ~/.pl_build/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Script generation defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<GeneratorDefaults>,

    /// Packaging defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageDefaults>,
}

/// Script generation defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneratorDefaults {
    /// Shell dialect ("bash" or "sh")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,

    /// Output script path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Indentation width inside conditionals (default: 4)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<usize>,
}

/// Packaging defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct PackageDefaults {
    /// Build output directory (default: "../out")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    /// Include debug symbols
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the global configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(generator) = &self.generator {
            if let Some(shell) = &generator.shell {
                validate_shell("generator.shell", shell)?;
            }
            if let Some(indent) = generator.indent {
                if indent == 0 || indent > 16 {
                    return Err(ConfigError::InvalidValue {
                        field: "generator.indent".to_string(),
                        reason: format!("must be between 1 and 16, got {}", indent),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get the global config file path (~/.pl_build/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".pl_build").join("config.toml"))
    }

    /// Configured shell dialect
    pub fn shell(&self) -> Option<&str> {
        self.generator.as_ref().and_then(|g| g.shell.as_deref())
    }

    /// Configured output script path
    pub fn output(&self) -> Option<&Path> {
        self.generator.as_ref().and_then(|g| g.output.as_deref())
    }

    /// Configured indentation width
    pub fn indent(&self) -> Option<usize> {
        self.generator.as_ref().and_then(|g| g.indent)
    }

    /// Configured packaging output directory
    pub fn out_dir(&self) -> Option<&Path> {
        self.package.as_ref().and_then(|p| p.out_dir.as_deref())
    }

    /// Whether packaging includes debug symbols
    pub fn debug_package(&self) -> bool {
        self.package.as_ref().and_then(|p| p.debug).unwrap_or(false)
    }
}

/// Validate a shell dialect name
pub(crate) fn validate_shell(field: &str, value: &str) -> ConfigResult<()> {
    if !matches!(value, "bash" | "sh") {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be 'bash' or 'sh', got '{}'", value),
        });
    }
    Ok(())
}
