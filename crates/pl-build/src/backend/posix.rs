//! POSIX sh backend

use super::{ShellBackend, ShellDialect, DEFAULT_INDENT};

/// Renders scripts for `/bin/sh` without bash extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixShBackend {
    indent: usize,
}

impl PosixShBackend {
    pub fn new() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }

    /// Set the indentation step for conditional bodies
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for PosixShBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellBackend for PosixShBackend {
    fn dialect(&self) -> ShellDialect {
        ShellDialect::Sh
    }

    fn shebang(&self) -> &'static str {
        "#!/bin/sh"
    }

    fn color(&self, name: &str, code: &str) -> String {
        format!("{}=$(printf '\\033[{}m')", name, code)
    }

    fn enter_script_directory(&self) -> Vec<String> {
        vec![
            "SOURCE=$0".to_string(),
            "while [ -h \"$SOURCE\" ]; do".to_string(),
            "  DIR=$( cd -P \"$( dirname \"$SOURCE\" )\" >/dev/null 2>&1 && pwd )".to_string(),
            "  SOURCE=$(readlink \"$SOURCE\")".to_string(),
            "  case $SOURCE in /*) ;; *) SOURCE=$DIR/$SOURCE;; esac".to_string(),
            "done".to_string(),
            "DIR=$( cd -P \"$( dirname \"$SOURCE\" )\" >/dev/null 2>&1 && pwd )".to_string(),
            "PL_PREVIOUS_DIR=$(pwd)".to_string(),
            "cd \"$DIR\" || exit 1".to_string(),
        ]
    }

    fn leave_script_directory(&self) -> Vec<String> {
        vec!["cd \"$PL_PREVIOUS_DIR\" || exit 1".to_string()]
    }

    fn string_equals(&self, variable: &str, value: &str) -> String {
        format!("[ \"${}\" = \"{}\" ]", variable, value)
    }

    fn indent_step(&self) -> usize {
        self.indent
    }
}
