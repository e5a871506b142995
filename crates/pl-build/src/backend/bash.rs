//! GNU bash backend

use super::{ShellBackend, ShellDialect, DEFAULT_INDENT};

/// Renders scripts for `/bin/bash`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BashBackend {
    indent: usize,
}

impl BashBackend {
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

impl Default for BashBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellBackend for BashBackend {
    fn dialect(&self) -> ShellDialect {
        ShellDialect::Bash
    }

    fn shebang(&self) -> &'static str {
        "#!/bin/bash"
    }

    fn color(&self, name: &str, code: &str) -> String {
        format!("{}=$'\\e[{}m'", name, code)
    }

    fn enter_script_directory(&self) -> Vec<String> {
        vec![
            "SOURCE=${BASH_SOURCE[0]}".to_string(),
            "while [ -h \"$SOURCE\" ]; do # resolve $SOURCE until the file is no longer a symlink"
                .to_string(),
            "  DIR=$( cd -P \"$( dirname \"$SOURCE\" )\" >/dev/null 2>&1 && pwd )".to_string(),
            "  SOURCE=$(readlink \"$SOURCE\")".to_string(),
            "  [[ $SOURCE != /* ]] && SOURCE=$DIR/$SOURCE # relative symlinks resolve from the link's directory"
                .to_string(),
            "done".to_string(),
            "DIR=$( cd -P \"$( dirname \"$SOURCE\" )\" >/dev/null 2>&1 && pwd )".to_string(),
            "pushd $DIR >/dev/null".to_string(),
        ]
    }

    fn leave_script_directory(&self) -> Vec<String> {
        vec!["popd >/dev/null".to_string()]
    }

    fn string_equals(&self, variable: &str, value: &str) -> String {
        format!("[[ \"${}\" == \"{}\" ]]", variable, value)
    }

    fn indent_step(&self) -> usize {
        self.indent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_uses_ansi_c_quoting() {
        assert_eq!(BashBackend::new().color("RED", "0;31"), "RED=$'\\e[0;31m'");
    }

    #[test]
    fn test_string_equals() {
        assert_eq!(
            BashBackend::new().string_equals("PL_CONFIG", "debug"),
            "[[ \"$PL_CONFIG\" == \"debug\" ]]"
        );
    }

    #[test]
    fn test_directory_handling_uses_pushd() {
        let backend = BashBackend::new();
        assert!(backend
            .enter_script_directory()
            .iter()
            .any(|l| l.starts_with("pushd")));
        assert_eq!(backend.leave_script_directory(), vec!["popd >/dev/null"]);
    }

    #[test]
    fn test_custom_indent() {
        assert_eq!(BashBackend::new().with_indent(2).indent_step(), 2);
    }
}
