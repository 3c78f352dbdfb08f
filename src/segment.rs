use std::fmt;

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

/// How a segment's content is meant to be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Host-language code, emitted verbatim.
    Python,
    /// Command text after a `>` sigil, handed to the runtime.
    Shell,
}

impl Mode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Shell => "shell",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical line: leading indentation, mode, and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub indent: String,
    pub mode: Mode,
    pub content: String,
}

impl Segment {
    #[must_use]
    pub fn new(indent: &str, mode: Mode, content: &str) -> Self {
        Self {
            indent: indent.to_string(),
            mode,
            content: content.to_string(),
        }
    }

    #[must_use]
    pub fn python(indent: &str, content: &str) -> Self {
        Self::new(indent, Mode::Python, content)
    }

    #[must_use]
    pub fn shell(indent: &str, content: &str) -> Self {
        Self::new(indent, Mode::Shell, content)
    }

    /// True when the content is empty or only horizontal whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}
