//! Pilot Light build script generation
//!
//! Turns a [`ScriptData`] project description into a shell script that
//! compiles and links every target of every registered configuration:
//! - Script emitter with indentation and banner helpers
//! - Shell statement IR, rendered by one backend per dialect (bash, POSIX sh)
//! - Toolchain description (platform, compiler, default extensions)
//! - Input validation with structured errors
//! - Hot reload detection, lock files and per-target status reporting
//!
//! # Example
//!
//! ```no_run
//! use pl_build::{generate_build, BashBackend};
//! use pl_config::{ScriptData, TargetSettings, TargetType};
//!
//! let mut data = ScriptData::new("demo")
//!     .with_configuration("debug")
//!     .with_settings(
//!         TargetSettings::new("app", TargetType::Executable)
//!             .for_toolchain("Linux", "gcc")
//!             .with_config("debug")
//!             .with_output("out", "app")
//!             .with_sources(["main.c"]),
//!     );
//!
//! generate_build(&mut data, "build.sh", &BashBackend::new()).unwrap();
//! ```

pub mod backend;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod ir;
pub mod toolchain;
pub mod validate;

// Re-export main types
pub use backend::{BashBackend, PosixShBackend, ShellBackend, ShellDialect};
pub use emitter::ScriptEmitter;
pub use error::{BuildError, BuildResult, ValidationError};
pub use generator::{generate_build, GeneratedScript, ScriptGenerator};
pub use ir::{Script, Statement, Test, Word};
pub use toolchain::Toolchain;
pub use validate::validate;

pub use pl_config::{ScriptData, TargetSettings, TargetType};
