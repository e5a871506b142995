//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::global::{validate_shell, GlobalConfig};
use crate::project::{ProjectFile, PROJECT_FILE_NAME};
use crate::settings::ScriptData;
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Default shell dialect
pub const DEFAULT_SHELL: &str = "bash";

/// Default generated script name
pub const DEFAULT_OUTPUT: &str = "build.sh";

/// Default indentation width inside conditionals
pub const DEFAULT_INDENT: usize = 4;

/// Default packaging output directory
pub const DEFAULT_OUT_DIR: &str = "../out";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.pl_build/config.toml) - lowest priority
/// 2. Project file (./pl_build.toml) - overrides global
/// 3. Environment variables (PL_BUILD_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Values taken from PL_BUILD_* environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    /// PL_BUILD_SHELL
    pub shell: Option<String>,
    /// PL_BUILD_OUTPUT
    pub output: Option<PathBuf>,
    /// PL_BUILD_OUT_DIR
    pub out_dir: Option<PathBuf>,
}

impl EnvOverrides {
    /// Read overrides from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        let shell = env::var("PL_BUILD_SHELL").ok();
        if let Some(shell) = &shell {
            validate_shell("PL_BUILD_SHELL", shell)?;
        }
        Ok(Self {
            shell,
            output: env::var("PL_BUILD_OUTPUT").ok().map(PathBuf::from),
            out_dir: env::var("PL_BUILD_OUT_DIR").ok().map(PathBuf::from),
        })
    }
}

/// Merged configuration result
#[derive(Debug, Clone)]
pub struct Config {
    /// Project description
    pub script_data: ScriptData,

    /// Global configuration
    pub global: GlobalConfig,

    /// Environment overrides
    pub env: EnvOverrides,

    /// Project root directory (where the project file was found)
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Use an explicit global config path instead of ~/.pl_build/config.toml
    pub fn with_global_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find pl_build.toml, then loads and merges
    /// global config if it exists.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let project_path = Self::find_project_file(start_dir)
            .ok_or_else(|| ConfigError::ProjectNotFound(start_dir.to_path_buf()))?;
        self.load_from_file(&project_path)
    }

    /// Load configuration from a specific project file
    pub fn load_from_file(&mut self, project_path: &Path) -> ConfigResult<Config> {
        let project = ProjectFile::load(project_path)?;
        let global = self.load_global_config()?;
        let env = EnvOverrides::from_env()?;

        Ok(Config {
            project_root: project.root().map(Path::to_path_buf),
            script_data: project.data,
            global,
            env,
        })
    }

    /// Find the project file by walking up the directory tree
    pub fn find_project_file(start_dir: &Path) -> Option<PathBuf> {
        start_dir
            .ancestors()
            .map(|dir| dir.join(PROJECT_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load global configuration, defaulting when the file is absent
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        if self.global_config_path.is_none() {
            match GlobalConfig::global_config_path() {
                Ok(path) => self.global_config_path = Some(path),
                Err(ConfigError::HomeNotFound) => return Ok(GlobalConfig::default()),
                Err(e) => return Err(e),
            }
        }

        match &self.global_config_path {
            Some(path) if path.exists() => GlobalConfig::load_from_file(path),
            _ => Ok(GlobalConfig::default()),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Build a configuration around in-memory script data
    pub fn from_script_data(script_data: ScriptData) -> Self {
        Self {
            script_data,
            global: GlobalConfig::default(),
            env: EnvOverrides::default(),
            project_root: None,
        }
    }

    /// Effective shell dialect name (env > global > default)
    pub fn shell(&self) -> &str {
        self.env
            .shell
            .as_deref()
            .or_else(|| self.global.shell())
            .unwrap_or(DEFAULT_SHELL)
    }

    /// Effective output script path, relative paths resolved against the project root
    pub fn output_path(&self) -> PathBuf {
        let output = self
            .env
            .output
            .as_deref()
            .or_else(|| self.global.output())
            .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT));
        self.resolve(output)
    }

    /// Effective indentation width
    pub fn indent(&self) -> usize {
        self.global.indent().unwrap_or(DEFAULT_INDENT)
    }

    /// Effective packaging output directory
    pub fn out_dir(&self) -> PathBuf {
        let out_dir = self
            .env
            .out_dir
            .as_deref()
            .or_else(|| self.global.out_dir())
            .unwrap_or_else(|| Path::new(DEFAULT_OUT_DIR));
        self.resolve(out_dir)
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.project_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}
