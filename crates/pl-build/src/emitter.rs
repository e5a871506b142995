//! Script emitter - indentation-aware text buffer for shell scripts

use crate::error::{BuildError, BuildResult};
use std::path::Path;

/// Width of the fill region of title and sub-title banners
pub const BANNER_WIDTH: usize = 80;

/// Accumulates shell script text.
///
/// Line-oriented helpers prefix the current indentation; [`add_raw`],
/// [`add_spacing`] and the banner helpers never indent.
///
/// [`add_raw`]: ScriptEmitter::add_raw
/// [`add_spacing`]: ScriptEmitter::add_spacing
#[derive(Debug, Clone, Default)]
pub struct ScriptEmitter {
    buffer: String,
    indent: usize,
}

impl ScriptEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation (in spaces) for subsequent lines
    pub fn set_indent(&mut self, indent: usize) {
        self.indent = indent;
    }

    /// Current indentation in spaces
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Append an indented line
    pub fn add_line(&mut self, line: &str) {
        self.push_indent();
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    /// Append text verbatim
    pub fn add_raw(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Append `count` newlines
    pub fn add_spacing(&mut self, count: usize) {
        for _ in 0..count {
            self.buffer.push('\n');
        }
    }

    /// Append a three-line `#` banner with the title centered
    pub fn add_title(&mut self, title: &str) {
        let (left, right) = banner_padding(title);
        let rule = format!("# {}\n", "#".repeat(BANNER_WIDTH));

        self.buffer.push_str(&rule);
        self.buffer.push_str("# #");
        self.buffer.push_str(&" ".repeat(left));
        self.buffer.push_str(title);
        self.buffer.push_str(&" ".repeat(right));
        self.buffer.push_str("#\n");
        self.buffer.push_str(&rule);
    }

    /// Append a single-line `~` banner with the title centered
    pub fn add_sub_title(&mut self, title: &str) {
        let (left, right) = banner_padding(title);

        self.buffer.push('#');
        self.buffer.push_str(&"~".repeat(left));
        self.buffer.push(' ');
        self.buffer.push_str(title);
        self.buffer.push(' ');
        self.buffer.push_str(&"~".repeat(right));
        self.buffer.push('\n');
    }

    /// Append an indented `# comment` line
    pub fn add_comment(&mut self, comment: &str) {
        self.push_indent();
        self.buffer.push_str("# ");
        self.buffer.push_str(comment);
        self.buffer.push('\n');
    }

    /// Append an `echo` of the given text
    pub fn print_line(&mut self, text: &str) {
        self.add_line(&format!("echo {}", text));
    }

    /// Append a bare `echo`
    pub fn print_space(&mut self) {
        self.add_line("echo");
    }

    /// Append `mkdir -p "directory"`
    pub fn create_directory(&mut self, directory: &str) {
        self.add_line(&format!("mkdir -p \"{}\"", directory));
    }

    /// Append `rm -f file`.
    ///
    /// The path is left unquoted so glob patterns expand.
    pub fn delete_file(&mut self, file: &str) {
        self.add_line(&format!("rm -f {}", file));
    }

    /// Accumulated text
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Consume the emitter, returning the accumulated text
    pub fn into_string(self) -> String {
        self.buffer
    }

    /// Write the buffer to `path`, replacing any existing content
    pub fn write_file(&self, path: impl AsRef<Path>) -> BuildResult<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.buffer).map_err(|e| BuildError::io(path, e))
    }

    fn push_indent(&mut self) {
        for _ in 0..self.indent {
            self.buffer.push(' ');
        }
    }
}

/// Left and right padding for a banner title.
///
/// Odd remainders put the extra column on the right.
fn banner_padding(title: &str) -> (usize, usize) {
    let total = (BANNER_WIDTH - 2).saturating_sub(title.chars().count());
    (total / 2, total - total / 2)
}
