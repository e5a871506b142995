//! Target settings and script data
//!
//! One [`TargetSettings`] record exists per (platform, compiler, configuration,
//! target) tuple. [`ScriptData`] groups them with the project-level fields the
//! generator needs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of artifact a target produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// Linked executable program
    Executable,
    /// Shared library (hot-reloadable)
    DynamicLibrary,
    /// Archive of object files
    StaticLibrary,
}

impl TargetType {
    /// Get the name used in project files
    pub fn name(&self) -> &'static str {
        match self {
            Self::Executable => "executable",
            Self::DynamicLibrary => "dynamic_library",
            Self::StaticLibrary => "static_library",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_lock_file() -> String {
    "lock.tmp".to_string()
}

/// Compiler and linker settings for one target in one configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSettings {
    /// Platform these settings apply to (e.g. "Linux")
    #[serde(default)]
    pub platform_name: String,
    /// Compiler identifier (e.g. "gcc")
    #[serde(default)]
    pub name: String,
    /// Configuration name (e.g. "debug")
    #[serde(default)]
    pub config_name: String,
    /// Target name, used for banners and status output
    pub target_name: String,
    /// Target type
    pub target_type: TargetType,
    /// Directory the artifact is written to
    #[serde(default)]
    pub output_directory: String,
    /// Artifact file name without extension
    #[serde(default)]
    pub output_binary: String,
    /// Artifact extension; defaulted per target type when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_binary_extension: Option<String>,
    /// Lock file created inside the output directory while building
    #[serde(default = "default_lock_file")]
    pub lock_file: String,
    #[serde(default)]
    pub source_files: Vec<String>,
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub include_directories: Vec<String>,
    #[serde(default)]
    pub link_directories: Vec<String>,
    #[serde(default)]
    pub compiler_flags: Vec<String>,
    #[serde(default)]
    pub linker_flags: Vec<String>,
    #[serde(default)]
    pub static_link_libraries: Vec<String>,
    #[serde(default)]
    pub dynamic_link_libraries: Vec<String>,
    /// Whether the target is rebuilt while the reload target is running
    #[serde(default)]
    pub reloadable: bool,
    /// Raw shell text run before compiling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_build_step: Option<String>,
    /// Raw shell text run after compiling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_build_step: Option<String>,
}

impl TargetSettings {
    /// Create settings for a target with every other field empty
    pub fn new(target_name: impl Into<String>, target_type: TargetType) -> Self {
        let target_name = target_name.into();
        Self {
            platform_name: String::new(),
            name: String::new(),
            config_name: String::new(),
            output_binary: target_name.clone(),
            target_name,
            target_type,
            output_directory: String::new(),
            output_binary_extension: None,
            lock_file: default_lock_file(),
            source_files: Vec::new(),
            definitions: Vec::new(),
            include_directories: Vec::new(),
            link_directories: Vec::new(),
            compiler_flags: Vec::new(),
            linker_flags: Vec::new(),
            static_link_libraries: Vec::new(),
            dynamic_link_libraries: Vec::new(),
            reloadable: false,
            pre_build_step: None,
            post_build_step: None,
        }
    }

    /// Set platform and compiler
    pub fn for_toolchain(mut self, platform: impl Into<String>, compiler: impl Into<String>) -> Self {
        self.platform_name = platform.into();
        self.name = compiler.into();
        self
    }

    /// Set the configuration name
    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config_name = config.into();
        self
    }

    /// Set output directory and binary name
    pub fn with_output(mut self, directory: impl Into<String>, binary: impl Into<String>) -> Self {
        self.output_directory = directory.into();
        self.output_binary = binary.into();
        self
    }

    /// Set an explicit output extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.output_binary_extension = Some(extension.into());
        self
    }

    /// Set the lock file name
    pub fn with_lock_file(mut self, lock_file: impl Into<String>) -> Self {
        self.lock_file = lock_file.into();
        self
    }

    /// Set source files
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_files = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Set preprocessor definitions
    pub fn with_definitions<I, S>(mut self, definitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definitions = definitions.into_iter().map(Into::into).collect();
        self
    }

    /// Set include directories
    pub fn with_include_directories<I, S>(mut self, directories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_directories = directories.into_iter().map(Into::into).collect();
        self
    }

    /// Set link directories
    pub fn with_link_directories<I, S>(mut self, directories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.link_directories = directories.into_iter().map(Into::into).collect();
        self
    }

    /// Set compiler flags
    pub fn with_compiler_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compiler_flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Set linker flags
    pub fn with_linker_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.linker_flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Set static link libraries (names without `lib` prefix or extension)
    pub fn with_static_libraries<I, S>(mut self, libraries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.static_link_libraries = libraries.into_iter().map(Into::into).collect();
        self
    }

    /// Set dynamic link libraries
    pub fn with_dynamic_libraries<I, S>(mut self, libraries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dynamic_link_libraries = libraries.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the target as reloadable
    pub fn with_reloadable(mut self, reloadable: bool) -> Self {
        self.reloadable = reloadable;
        self
    }

    /// Set the pre-build step
    pub fn with_pre_build_step(mut self, step: impl Into<String>) -> Self {
        self.pre_build_step = Some(step.into());
        self
    }

    /// Set the post-build step
    pub fn with_post_build_step(mut self, step: impl Into<String>) -> Self {
        self.post_build_step = Some(step.into());
        self
    }

    /// Fill in the output extension if none was given.
    ///
    /// Returns `true` when the extension was set by this call.
    pub fn resolve_extension(&mut self, default: &str) -> bool {
        if self.output_binary_extension.is_some() {
            return false;
        }
        self.output_binary_extension = Some(default.to_string());
        true
    }

    /// Output extension, empty when unresolved
    pub fn extension(&self) -> &str {
        self.output_binary_extension.as_deref().unwrap_or("")
    }

    /// Output file name including extension
    pub fn output_filename(&self) -> String {
        format!("{}{}", self.output_binary, self.extension())
    }

    /// Whether these settings belong to the given platform/compiler pair
    pub fn matches_toolchain(&self, platform: &str, compiler: &str) -> bool {
        self.platform_name == platform && self.name == compiler
    }
}

/// Project-level description consumed by the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptData {
    /// Version of the tool that produced this description
    #[serde(default = "default_version")]
    pub version: String,
    /// Project name
    pub project_name: String,
    /// Configuration names; the first one is the default
    #[serde(default)]
    pub registered_configurations: Vec<String>,
    /// Target whose running process signals a hot reload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_target_name: Option<String>,
    /// Settings for every platform, compiler, configuration and target
    #[serde(default, alias = "settings")]
    pub current_settings: Vec<TargetSettings>,
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl ScriptData {
    /// Create an empty project description
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: default_version(),
            project_name: project_name.into(),
            registered_configurations: Vec::new(),
            reload_target_name: None,
            current_settings: Vec::new(),
        }
    }

    /// Set the version string
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Register a configuration
    pub fn with_configuration(mut self, name: impl Into<String>) -> Self {
        self.registered_configurations.push(name.into());
        self
    }

    /// Set the hot reload target
    pub fn with_reload_target(mut self, name: impl Into<String>) -> Self {
        self.reload_target_name = Some(name.into());
        self
    }

    /// Add target settings
    pub fn with_settings(mut self, settings: TargetSettings) -> Self {
        self.current_settings.push(settings);
        self
    }

    /// First registered configuration
    pub fn default_configuration(&self) -> Option<&str> {
        self.registered_configurations.first().map(String::as_str)
    }

    /// Whether a configuration name is registered
    pub fn is_registered(&self, config: &str) -> bool {
        self.registered_configurations.iter().any(|c| c == config)
    }

    /// Settings belonging to a platform/compiler pair, in declaration order
    pub fn settings_for<'a>(
        &'a self,
        platform: &'a str,
        compiler: &'a str,
    ) -> impl Iterator<Item = &'a TargetSettings> + 'a {
        self.current_settings
            .iter()
            .filter(move |s| s.matches_toolchain(platform, compiler))
    }
}
