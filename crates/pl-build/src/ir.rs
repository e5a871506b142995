//! Shell statement IR
//!
//! The generator decides *what* a build script does as a list of
//! [`Statement`]s; a [`ShellBackend`](crate::ShellBackend) decides how each
//! statement is spelled in a particular shell dialect.

/// Right-hand side of an assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Word {
    /// Emitted as-is: `NAME=value`
    Bare(String),
    /// Wrapped in double quotes: `NAME="value"`
    Quoted(String),
}

/// Condition of an `if` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Test {
    /// `$variable` equals a string
    StringEquals { variable: String, value: String },
    /// `$variable` is numerically different from a value
    NumberNotEquals { variable: String, value: i64 },
    /// The previous command exited with a non-zero status
    LastCommandFailed,
    /// Another process with this name is running (excluding the script itself)
    ProcessRunning { name: String },
}

/// A single shell statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Interpreter line
    Shebang,
    /// Empty line
    Blank,
    /// `# text`
    Comment(String),
    /// Three-line `#` banner
    Title(String),
    /// One-line `~` banner
    SubTitle(String),
    /// Terminal color variable, `code` is the SGR parameter list (e.g. `0;31`)
    Color { name: String, code: String },
    /// Resolve the script's own directory and make it the working directory
    EnterScriptDirectory,
    /// Return to the working directory saved by `EnterScriptDirectory`
    LeaveScriptDirectory,
    /// Parse `-c <value>` into `variable`, rejecting any other flag
    ParseConfigurationFlag { variable: String },
    /// Variable assignment
    Assign { name: String, value: Word },
    /// `echo` with optional text
    Echo(Option<String>),
    /// `mkdir -p`
    MakeDirectory(String),
    /// `rm -f` (unquoted, globs expand)
    DeleteFile(String),
    /// Write `text` into the file at `path`
    WriteMarker { text: String, path: String },
    /// External command line
    Command(String),
    /// User supplied shell text, emitted verbatim at column zero
    Raw(String),
    /// Conditional block
    If {
        test: Test,
        then: Vec<Statement>,
        otherwise: Option<Vec<Statement>>,
    },
}

impl Statement {
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(text.into())
    }

    pub fn assign(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Assign {
            name: name.into(),
            value: Word::Bare(value.into()),
        }
    }

    pub fn assign_quoted(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Assign {
            name: name.into(),
            value: Word::Quoted(value.into()),
        }
    }

    pub fn echo(text: impl Into<String>) -> Self {
        Self::Echo(Some(text.into()))
    }

    pub fn command(line: impl Into<String>) -> Self {
        Self::Command(line.into())
    }

    /// `if test; then ... fi`
    pub fn when(test: Test, then: Vec<Statement>) -> Self {
        Self::If {
            test,
            then,
            otherwise: None,
        }
    }

    /// `if test; then ... else ... fi`
    pub fn when_else(test: Test, then: Vec<Statement>, otherwise: Vec<Statement>) -> Self {
        Self::If {
            test,
            then,
            otherwise: Some(otherwise),
        }
    }
}

/// An ordered sequence of statements forming one script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    statements: Vec<Statement>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn extend(&mut self, statements: impl IntoIterator<Item = Statement>) {
        self.statements.extend(statements);
    }

    /// Top-level statements
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Visit every statement, descending into conditional branches
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a Statement)) {
        fn walk_all<'a>(statements: &'a [Statement], visit: &mut impl FnMut(&'a Statement)) {
            for statement in statements {
                visit(statement);
                if let Statement::If { then, otherwise, .. } = statement {
                    walk_all(then, visit);
                    if let Some(otherwise) = otherwise {
                        walk_all(otherwise, visit);
                    }
                }
            }
        }
        walk_all(&self.statements, &mut visit);
    }

    /// Number of statements (at any depth) matching a predicate
    pub fn count(&self, mut predicate: impl FnMut(&Statement) -> bool) -> usize {
        let mut count = 0;
        self.walk(|s| {
            if predicate(s) {
                count += 1;
            }
        });
        count
    }
}

impl FromIterator<Statement> for Script {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_descends_into_branches() {
        let script: Script = vec![
            Statement::comment("top"),
            Statement::when_else(
                Test::LastCommandFailed,
                vec![Statement::command("a")],
                vec![Statement::when(
                    Test::LastCommandFailed,
                    vec![Statement::command("b")],
                )],
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            script.count(|s| matches!(s, Statement::Command(_))),
            2
        );
        assert_eq!(script.count(|s| matches!(s, Statement::If { .. })), 2);
        assert_eq!(script.statements().len(), 2);
    }
}
