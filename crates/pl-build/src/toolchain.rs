//! Platform/compiler pair a script is generated for

use pl_config::{TargetSettings, TargetType};

/// Compiler toolchain the generated script invokes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Platform name matched against `TargetSettings::platform_name`
    pub platform_name: String,
    /// Compiler id matched against `TargetSettings::name`
    pub compiler_name: String,
    /// Compiler driver command
    pub compiler_command: String,
    /// Static archive command, followed by archive path and objects
    pub archiver_command: String,
    /// Default extension for executables
    pub executable_extension: String,
    /// Default extension for dynamic libraries
    pub dynamic_library_extension: String,
    /// Default extension for static libraries
    pub static_library_extension: String,
}

impl Toolchain {
    /// GCC on Linux
    pub fn linux_gcc() -> Self {
        Self {
            platform_name: "Linux".to_string(),
            compiler_name: "gcc".to_string(),
            compiler_command: "gcc".to_string(),
            archiver_command: "ar rcs".to_string(),
            executable_extension: String::new(),
            dynamic_library_extension: ".so".to_string(),
            static_library_extension: ".a".to_string(),
        }
    }

    /// Extension used when settings do not specify one
    pub fn default_extension(&self, target_type: TargetType) -> &str {
        match target_type {
            TargetType::Executable => &self.executable_extension,
            TargetType::DynamicLibrary => &self.dynamic_library_extension,
            TargetType::StaticLibrary => &self.static_library_extension,
        }
    }

    /// Whether settings are meant for this toolchain
    pub fn matches(&self, settings: &TargetSettings) -> bool {
        settings.matches_toolchain(&self.platform_name, &self.compiler_name)
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::linux_gcc()
    }
}
