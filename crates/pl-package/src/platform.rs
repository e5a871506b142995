//! Host platform conventions for binary names and debug symbols

use crate::{PackageError, PackageResult};
use std::fmt;

/// Platform the package is being assembled on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    MacOs { arm64: bool },
    Linux,
}

/// Debug information belonging to a binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugArtifact {
    /// Files matching a glob in the output directory, moved into `bin/`
    Files(String),
    /// A bundle directory in the output directory, copied into `bin/`
    Bundle(String),
}

impl HostPlatform {
    /// Detect the platform this process runs on
    pub fn detect() -> PackageResult<Self> {
        Self::from_os(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map `std::env::consts` style names to a platform
    pub fn from_os(os: &str, arch: &str) -> PackageResult<Self> {
        match os {
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::MacOs {
                arm64: arch == "aarch64" || arch == "arm64",
            }),
            "linux" => Ok(Self::Linux),
            other => Err(PackageError::UnsupportedPlatform(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs { .. } => "macos",
            Self::Linux => "linux",
        }
    }

    /// Extension of dynamic libraries, including the dot
    pub fn dynamic_library_extension(&self) -> &'static str {
        match self {
            Self::Windows => ".dll",
            Self::MacOs { .. } => ".dylib",
            Self::Linux => ".so",
        }
    }

    /// Extension of executables, including the dot when present
    pub fn executable_extension(&self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            Self::MacOs { .. } | Self::Linux => "",
        }
    }

    /// Archive file name without `.zip`
    pub fn archive_stem(&self, name: &str) -> String {
        match self {
            Self::Windows => format!("{}_win32", name),
            Self::MacOs { arm64: true } => format!("{}_macos_arm64", name),
            Self::MacOs { arm64: false } => format!("{}_macos", name),
            Self::Linux => format!("{}_linux_amd64", name),
        }
    }

    /// Debug symbols produced for a dynamic library
    pub fn library_debug_artifacts(&self, library: &str) -> Vec<DebugArtifact> {
        match self {
            Self::Windows => vec![DebugArtifact::Files(format!("{}_*.pdb", library))],
            Self::MacOs { .. } => vec![DebugArtifact::Bundle(format!("{}.dylib.dSYM", library))],
            Self::Linux => Vec::new(),
        }
    }

    /// Debug symbols produced for an executable
    pub fn executable_debug_artifacts(&self, executable: &str) -> Vec<DebugArtifact> {
        match self {
            Self::MacOs { .. } => vec![DebugArtifact::Bundle(format!("{}.dSYM", executable))],
            Self::Windows | Self::Linux => Vec::new(),
        }
    }

    /// Compiler-wide debug database, relative to the project root
    pub fn compiler_debug_database(&self) -> Option<&'static str> {
        match self {
            Self::Windows => Some("src/vc140.pdb"),
            Self::MacOs { .. } | Self::Linux => None,
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs { arm64: true } => f.write_str("macos (arm64)"),
            _ => f.write_str(self.name()),
        }
    }
}
