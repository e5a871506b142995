//! Shell backends
//!
//! A backend spells the dialect-specific statements of the IR (interpreter
//! line, colors, script directory handling, string comparison). Everything
//! else is rendered the same way for every dialect by [`render_script`].

mod bash;
mod posix;

pub use bash::BashBackend;
pub use posix::PosixShBackend;

use crate::emitter::ScriptEmitter;
use crate::error::BuildError;
use crate::ir::{Script, Statement, Test, Word};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default indentation step for conditional bodies
pub const DEFAULT_INDENT: usize = 4;

/// Supported shell dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellDialect {
    /// GNU bash
    #[default]
    Bash,
    /// POSIX sh
    Sh,
}

impl ShellDialect {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Sh => "sh",
        }
    }

    /// Create the backend for this dialect
    pub fn backend(&self) -> Box<dyn ShellBackend> {
        self.backend_with_indent(DEFAULT_INDENT)
    }

    /// Create the backend for this dialect with a custom indentation step
    pub fn backend_with_indent(&self, indent: usize) -> Box<dyn ShellBackend> {
        match self {
            Self::Bash => Box::new(BashBackend::new().with_indent(indent)),
            Self::Sh => Box::new(PosixShBackend::new().with_indent(indent)),
        }
    }
}

impl FromStr for ShellDialect {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bash" => Ok(Self::Bash),
            "sh" | "posix" => Ok(Self::Sh),
            other => Err(BuildError::UnknownDialect(other.to_string())),
        }
    }
}

impl fmt::Display for ShellDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dialect-specific spelling of shell statements
pub trait ShellBackend {
    /// Dialect implemented by this backend
    fn dialect(&self) -> ShellDialect;

    /// Interpreter line, including `#!`
    fn shebang(&self) -> &'static str;

    /// Assignment of a terminal escape sequence to a variable
    fn color(&self, name: &str, code: &str) -> String;

    /// Lines resolving the script directory and entering it
    fn enter_script_directory(&self) -> Vec<String>;

    /// Lines returning to the previous working directory
    fn leave_script_directory(&self) -> Vec<String>;

    /// String equality test on a variable
    fn string_equals(&self, variable: &str, value: &str) -> String;

    /// Indentation step for conditional bodies
    fn indent_step(&self) -> usize;

    /// Condition text of an `if` statement
    fn test(&self, test: &Test) -> String {
        match test {
            Test::StringEquals { variable, value } => self.string_equals(variable, value),
            Test::NumberNotEquals { variable, value } => {
                format!("[ ${} -ne {} ]", variable, value)
            }
            Test::LastCommandFailed => "[ $? -ne 0 ]".to_string(),
            Test::ProcessRunning { name } => format!("pidof -x \"{}\" -o $$ >/dev/null", name),
        }
    }

    /// `getopts` loop accepting `-c <value>`
    fn configuration_flag(&self, variable: &str) -> Vec<String> {
        vec![
            "while getopts \":c:\" option; do".to_string(),
            "   case $option in".to_string(),
            "   c) # set conf".to_string(),
            format!("         {}=$OPTARG;;", variable),
            "     \\?) # Invalid option".to_string(),
            "         echo \"Error: Invalid option\"".to_string(),
            "         exit;;".to_string(),
            "   esac".to_string(),
            "done".to_string(),
        ]
    }

    /// Render a whole script
    fn render(&self, script: &Script) -> String
    where
        Self: Sized,
    {
        render_script(self, script)
    }
}

/// Render a script with the given backend
pub fn render_script(backend: &dyn ShellBackend, script: &Script) -> String {
    emit_script(backend, script).into_string()
}

/// Render a script into an emitter, ready for [`ScriptEmitter::write_file`]
pub fn emit_script(backend: &dyn ShellBackend, script: &Script) -> ScriptEmitter {
    let mut out = ScriptEmitter::new();
    render_block(backend, script.statements(), 0, &mut out);
    out
}

fn render_block(
    backend: &dyn ShellBackend,
    statements: &[Statement],
    depth: usize,
    out: &mut ScriptEmitter,
) {
    for statement in statements {
        out.set_indent(depth * backend.indent_step());
        render_statement(backend, statement, depth, out);
    }
}

fn render_statement(
    backend: &dyn ShellBackend,
    statement: &Statement,
    depth: usize,
    out: &mut ScriptEmitter,
) {
    match statement {
        Statement::Shebang => out.add_line(backend.shebang()),
        Statement::Blank => out.add_spacing(1),
        Statement::Comment(text) => out.add_comment(text),
        Statement::Title(text) => out.add_title(text),
        Statement::SubTitle(text) => out.add_sub_title(text),
        Statement::Color { name, code } => out.add_line(&backend.color(name, code)),
        Statement::EnterScriptDirectory => add_lines(out, &backend.enter_script_directory()),
        Statement::LeaveScriptDirectory => add_lines(out, &backend.leave_script_directory()),
        Statement::ParseConfigurationFlag { variable } => {
            add_lines(out, &backend.configuration_flag(variable))
        }
        Statement::Assign { name, value } => match value {
            Word::Bare(text) => out.add_line(&format!("{}={}", name, text)),
            Word::Quoted(text) => out.add_line(&format!("{}=\"{}\"", name, text)),
        },
        Statement::Echo(Some(text)) => out.print_line(text),
        Statement::Echo(None) => out.print_space(),
        Statement::MakeDirectory(path) => out.create_directory(path),
        Statement::DeleteFile(path) => out.delete_file(path),
        Statement::WriteMarker { text, path } => {
            out.add_line(&format!("echo {} > \"{}\"", text, path))
        }
        Statement::Command(line) => out.add_line(line),
        Statement::Raw(text) => {
            out.add_raw(text);
            if !text.ends_with('\n') {
                out.add_spacing(1);
            }
        }
        Statement::If {
            test,
            then,
            otherwise,
        } => {
            out.add_line(&format!("if {}; then", backend.test(test)));
            render_block(backend, then, depth + 1, out);
            if let Some(otherwise) = otherwise {
                out.set_indent(depth * backend.indent_step());
                out.add_line("else");
                render_block(backend, otherwise, depth + 1, out);
            }
            out.set_indent(depth * backend.indent_step());
            out.add_line("fi");
        }
    }
}

fn add_lines(out: &mut ScriptEmitter, lines: &[String]) {
    for line in lines {
        out.add_line(line);
    }
}
