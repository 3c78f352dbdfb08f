//! Rough line lexer for pysh sources.
//!
//! Splits a character stream into [`Segment`]s. It only tracks what is
//! needed to find logical line boundaries: string literals, comments and
//! backslash continuations. Everything else is copied through untouched.

use std::fmt;
use std::io::{self, Read};

use crate::segment::{Mode, Segment, Span};

/// Marks a line as shell mode when it is the first non-blank character.
pub const SHELL_SIGIL: char = '>';

const INDENT_STEP: &str = "    ";

const BLOCK_TERMINATORS: &[&str] = &["pass", "return", "break", "continue", "raise"];

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Line terminator inside a single-line string literal.
    EolInString { quote: char },
    /// End of stream inside a single-line string literal.
    EofInString { quote: char },
    /// End of stream inside a triple-quoted literal.
    EofInHeredoc { quote: char },
    /// The underlying reader failed or returned malformed UTF-8.
    UnexpectedEndOfStream {
        kind: io::ErrorKind,
        message: String,
    },
}

impl LexErrorKind {
    /// True for the three unterminated-literal variants.
    #[must_use]
    pub const fn is_unterminated_literal(&self) -> bool {
        matches!(
            self,
            Self::EolInString { .. } | Self::EofInString { .. } | Self::EofInHeredoc { .. }
        )
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EolInString { quote } => {
                write!(f, "EOL while scanning string literal opened with {quote}")
            }
            Self::EofInString { quote } => {
                write!(f, "EOF while scanning string literal opened with {quote}")
            }
            Self::EofInHeredoc { quote } => {
                write!(
                    f,
                    "EOF while scanning here document, \
                     expected closing {quote}{quote}{quote}"
                )
            }
            Self::UnexpectedEndOfStream { message, .. } => {
                write!(f, "failed to read source: {message}")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Receives the indentation the lexer expects for the next line.
///
/// Called after every non-blank python-mode segment. The lexer never
/// looks at what the observer does with the prediction.
pub trait IndentObserver {
    fn predict_indent(&mut self, indent: &str);
}

/// Observer that ignores every prediction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrediction;

impl IndentObserver for NoPrediction {
    fn predict_indent(&mut self, _indent: &str) {}
}

impl<F: FnMut(&str)> IndentObserver for F {
    fn predict_indent(&mut self, indent: &str) {
        self(indent);
    }
}

/// Lex an in-memory source string to completion.
///
/// # Errors
///
/// Returns `LexError` on the first unterminated literal.
pub fn lex(input: &str) -> Result<Vec<Segment>, LexError> {
    Lexer::new(input.as_bytes()).collect()
}

/// Streaming segment lexer over any byte reader.
///
/// The reader is pulled one byte at a time, so wrap files in a
/// `BufReader`.
pub struct Lexer<R, O = NoPrediction> {
    cursor: Cursor<R>,
    observer: O,
    /// Indents of the `:`-terminated lines that are still open.
    blocks: Vec<String>,
    failed: bool,
}

impl<R: Read> Lexer<R> {
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self::with_observer(reader, NoPrediction)
    }
}

impl<R: Read, O: IndentObserver> Lexer<R, O> {
    #[must_use]
    pub const fn with_observer(reader: R, observer: O) -> Self {
        Self {
            cursor: Cursor::new(reader),
            observer,
            blocks: Vec::new(),
            failed: false,
        }
    }

    /// Consume the lexer and hand back its observer.
    #[must_use]
    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Read the next logical line.
    ///
    /// Returns `Ok(None)` once the stream is exhausted, and keeps doing
    /// so on later calls while the reader stays at EOF.
    ///
    /// # Errors
    ///
    /// Returns `LexError` on unterminated literals or reader failures.
    pub fn next_segment(&mut self) -> Result<Option<Segment>, LexError> {
        self.cursor.prime()?;

        let mut indent = String::new();
        while let Some(c) = self.cursor.current().filter(|&c| is_space(c)) {
            indent.push(c);
            self.cursor.advance()?;
        }

        let mut mode = Mode::Python;
        if self.cursor.current() == Some(SHELL_SIGIL) {
            mode = Mode::Shell;
            self.cursor.advance()?;
            while self.cursor.current().is_some_and(is_space) {
                self.cursor.advance()?;
            }
        }

        let mut content = String::new();
        self.scan_body(&mut content)?;

        if content.is_empty() && self.cursor.at_eof() {
            return Ok(None);
        }

        let segment = Segment {
            indent,
            mode,
            content,
        };
        if mode == Mode::Python {
            self.predict(&segment);
        }
        Ok(Some(segment))
    }

    fn scan_body(&mut self, content: &mut String) -> Result<(), LexError> {
        loop {
            match self.cursor.current() {
                None => return Ok(()),
                Some(quote @ ('\'' | '"')) => self.scan_literal(quote, content)?,
                Some('#') => {
                    self.cursor.skip_comment()?;
                    return Ok(());
                }
                Some('\r' | '\n') => {
                    self.cursor.skip_line_end()?;
                    return Ok(());
                }
                Some('\\') => {
                    self.cursor.advance()?;
                    self.continuation(content)?;
                }
                Some(c) => {
                    content.push(c);
                    self.cursor.advance()?;
                }
            }
        }
    }

    /// Handles the character after a backslash outside any literal.
    fn continuation(&mut self, content: &mut String) -> Result<(), LexError> {
        match self.cursor.current() {
            Some('\r' | '\n') => self.cursor.skip_line_end(),
            _ => {
                content.push('\\');
                Ok(())
            }
        }
    }

    /// Handles the character after a backslash inside a literal.
    fn escape(&mut self, content: &mut String) -> Result<(), LexError> {
        match self.cursor.current() {
            Some('\r' | '\n') => self.cursor.skip_line_end(),
            Some(c) => {
                content.push('\\');
                content.push(c);
                self.cursor.advance()?;
                Ok(())
            }
            None => {
                content.push('\\');
                Ok(())
            }
        }
    }

    fn scan_literal(&mut self, quote: char, content: &mut String) -> Result<(), LexError> {
        let span = self.cursor.span();
        self.cursor.advance()?; // skip opening quote

        if self.cursor.current() != Some(quote) {
            content.push(quote);
            return self.scan_simple_literal(quote, span, content);
        }

        // The third character is only peeked: after `''` it belongs to
        // the body again.
        if self.cursor.advance()? != Some(quote) {
            content.push(quote);
            content.push(quote);
            return Ok(());
        }

        content.extend([quote; 3]);
        self.cursor.advance()?;
        self.scan_heredoc(quote, span, content)
    }

    fn scan_simple_literal(
        &mut self,
        quote: char,
        span: Span,
        content: &mut String,
    ) -> Result<(), LexError> {
        loop {
            let Some(c) = self.cursor.current() else {
                return Err(LexError {
                    kind: LexErrorKind::EofInString { quote },
                    span,
                });
            };
            self.cursor.advance()?;

            match c {
                '\r' | '\n' => {
                    return Err(LexError {
                        kind: LexErrorKind::EolInString { quote },
                        span,
                    });
                }
                '\\' => self.escape(content)?,
                _ => {
                    content.push(c);
                    if c == quote {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn scan_heredoc(
        &mut self,
        quote: char,
        span: Span,
        content: &mut String,
    ) -> Result<(), LexError> {
        let mut run = 0;
        loop {
            let Some(c) = self.cursor.current() else {
                return Err(LexError {
                    kind: LexErrorKind::EofInHeredoc { quote },
                    span,
                });
            };
            self.cursor.advance()?;

            if c == quote {
                content.push(c);
                run += 1;
                if run == 3 {
                    return Ok(());
                }
            } else if c == '\\' {
                // an escape pair leaves the run untouched
                self.escape(content)?;
            } else {
                content.push(c);
                run = 0;
            }
        }
    }

    fn predict(&mut self, segment: &Segment) {
        if segment.is_blank() {
            return;
        }

        let indent = segment.indent.as_str();
        while self
            .blocks
            .last()
            .is_some_and(|opener| opener.len() >= indent.len())
        {
            self.blocks.pop();
        }

        let content = segment.content.trim();
        let predicted = if content.ends_with(':') {
            self.blocks.push(indent.to_string());
            format!("{indent}{INDENT_STEP}")
        } else if is_block_terminator(content) {
            self.blocks
                .last()
                .map_or_else(|| outdent(indent).to_string(), Clone::clone)
        } else {
            indent.to_string()
        };

        log::trace!("predicted indent {predicted:?} after {content:?}");
        self.observer.predict_indent(&predicted);
    }
}

impl<R: Read, O: IndentObserver> Iterator for Lexer<R, O> {
    type Item = Result<Segment, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_segment() {
            Ok(segment) => segment.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c' | '\x0b')
}

fn is_block_terminator(content: &str) -> bool {
    let word_end = content
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(content.len());
    BLOCK_TERMINATORS.contains(&&content[..word_end])
}

fn outdent(indent: &str) -> &str {
    indent
        .strip_suffix(INDENT_STEP)
        .or_else(|| indent.strip_suffix('\t'))
        .unwrap_or("")
}

/// One-character lookahead over a byte reader.
struct Cursor<R> {
    reader: R,
    current: Option<char>,
    primed: bool,
    line: usize,
    column: usize,
}

impl<R: Read> Cursor<R> {
    const fn new(reader: R) -> Self {
        Self {
            reader,
            current: None,
            primed: false,
            line: 1,
            column: 1,
        }
    }

    const fn current(&self) -> Option<char> {
        self.current
    }

    const fn at_eof(&self) -> bool {
        self.primed && self.current.is_none()
    }

    const fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
        }
    }

    fn prime(&mut self) -> Result<(), LexError> {
        if self.primed {
            return Ok(());
        }
        self.primed = true;
        if self.advance()? == Some('\u{FEFF}') {
            self.current = None;
            self.advance()?;
        }
        Ok(())
    }

    /// Move to the next character and return it.
    fn advance(&mut self) -> Result<Option<char>, LexError> {
        let next = self.read_char()?;
        match self.current {
            Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some('\r') if next != Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some(_) => self.column += 1,
            None => {}
        }
        self.current = next;
        Ok(next)
    }

    /// Consume `\n`, `\r\n` or a lone `\r` if one is current.
    fn skip_line_end(&mut self) -> Result<(), LexError> {
        match self.current {
            Some('\n') => {
                self.advance()?;
            }
            Some('\r') => {
                if self.advance()? == Some('\n') {
                    self.advance()?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn skip_comment(&mut self) -> Result<(), LexError> {
        while self.current.is_some_and(|c| c != '\n' && c != '\r') {
            self.advance()?;
        }
        self.skip_line_end()
    }

    fn read_char(&mut self) -> Result<Option<char>, LexError> {
        let Some(first) = self.read_byte()? else {
            return Ok(None);
        };
        let width = match first {
            0x00..=0x7F => return Ok(Some(char::from(first))),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(self.invalid_utf8()),
        };

        let mut buf = [first, 0, 0, 0];
        for slot in &mut buf[1..width] {
            *slot = self.read_byte()?.ok_or_else(|| {
                self.read_error(
                    io::ErrorKind::UnexpectedEof,
                    "stream ended inside a UTF-8 sequence",
                )
            })?;
        }

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(|| self.invalid_utf8())
    }

    fn read_byte(&mut self) -> Result<Option<u8>, LexError> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(self.read_error(e.kind(), &e.to_string())),
            }
        }
    }

    fn invalid_utf8(&self) -> LexError {
        self.read_error(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8")
    }

    fn read_error(&self, kind: io::ErrorKind, message: &str) -> LexError {
        LexError {
            kind: LexErrorKind::UnexpectedEndOfStream {
                kind,
                message: message.to_string(),
            },
            span: self.span(),
        }
    }
}
