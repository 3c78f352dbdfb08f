//! Rewrites lexed segments into a plain Python program.
//!
//! Python segments pass through untouched. Shell segments become a call
//! into the command runtime with the command text as a string literal.

use std::fmt::Write as _;
use std::io::{self, Read, Write};

use crate::Error;
use crate::lexer::{IndentObserver, Lexer, NoPrediction};
use crate::segment::{Mode, Segment};

/// Banner written at the top of generated files.
pub const SIGNATURE: &str = "# -*- coding: utf-8 -*-\n\
                             # This file was auto-generated by pysh.\n\
                             # Don't edit this by hand.\n";

/// The code the generated program uses to run shell segments.
pub trait CommandRuntime {
    /// Text written once before the first segment.
    fn preamble(&self) -> String;

    /// Expression that runs `content` in the caller's scope.
    fn call_expression(&self, content: &str) -> String;
}

/// The `pysh.pysh.run(cmd, locals(), globals())` runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyshRuntime {
    module: String,
    function: String,
}

impl PyshRuntime {
    #[must_use]
    pub fn new(module: &str, function: &str) -> Self {
        Self {
            module: module.to_string(),
            function: function.to_string(),
        }
    }
}

impl Default for PyshRuntime {
    fn default() -> Self {
        Self::new("pysh.pysh", "run")
    }
}

impl CommandRuntime for PyshRuntime {
    fn preamble(&self) -> String {
        format!("import {}\n", self.module)
    }

    fn call_expression(&self, content: &str) -> String {
        format!(
            "{}.{}({}, locals(), globals())",
            self.module,
            self.function,
            python_literal(content)
        )
    }
}

/// Streams a pysh source into Python, one segment at a time.
pub struct Converter<R, W, C = PyshRuntime, O = NoPrediction> {
    lexer: Lexer<R, O>,
    writer: W,
    runtime: C,
}

impl<R: Read, W: Write> Converter<R, W> {
    #[must_use]
    pub fn new(reader: R, writer: W) -> Self {
        Self::from_lexer(Lexer::new(reader), writer, PyshRuntime::default())
    }
}

impl<R: Read, W: Write, C: CommandRuntime> Converter<R, W, C> {
    #[must_use]
    pub fn with_runtime(reader: R, writer: W, runtime: C) -> Self {
        Self::from_lexer(Lexer::new(reader), writer, runtime)
    }
}

impl<R: Read, W: Write, C: CommandRuntime, O: IndentObserver> Converter<R, W, C, O> {
    #[must_use]
    pub const fn from_lexer(lexer: Lexer<R, O>, writer: W, runtime: C) -> Self {
        Self {
            lexer,
            writer,
            runtime,
        }
    }

    /// Write the preamble and every segment, then flush.
    ///
    /// Returns the number of segments written. Whatever reached the
    /// writer before an error is not meant to be used.
    ///
    /// # Errors
    ///
    /// Returns `Error::Lex` on malformed input and `Error::Io` when the
    /// writer fails.
    pub fn convert(&mut self) -> Result<usize, Error> {
        self.writer.write_all(self.runtime.preamble().as_bytes())?;

        let mut written = 0;
        let mut shell = 0;
        while let Some(segment) = self.lexer.next_segment()? {
            if segment.mode == Mode::Shell {
                shell += 1;
            }
            self.write_segment(&segment)?;
            written += 1;
        }
        self.writer.flush()?;

        log::debug!("converted {written} segment(s), {shell} shell");
        Ok(written)
    }

    fn write_segment(&mut self, segment: &Segment) -> io::Result<()> {
        self.writer.write_all(segment.indent.as_bytes())?;
        match segment.mode {
            Mode::Python => self.writer.write_all(segment.content.as_bytes())?,
            Mode::Shell => {
                log::debug!("shell segment: {}", segment.content);
                let call = self.runtime.call_expression(&segment.content);
                self.writer.write_all(call.as_bytes())?;
            }
        }
        self.writer.write_all(b"\n")
    }

    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// Quote `s` as a Python string literal, the way `repr` does.
///
/// Non-printable characters (controls, separators other than the ASCII
/// space, format characters and private-use code points) are written as
/// `\xNN`, `\uNNNN` or `\UNNNNNNNN`. Unassigned code points are kept.
#[must_use]
pub fn python_literal(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => {
                let code = u32::from(c);
                let _ = match code {
                    0..=0xff => write!(out, "\\x{code:02x}"),
                    0x100..=0xffff => write!(out, "\\u{code:04x}"),
                    _ => write!(out, "\\U{code:08x}"),
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn is_printable(c: char) -> bool {
    c == ' ' || !(c.is_control() || c.is_whitespace() || is_format_or_private(c))
}

const fn is_format_or_private(c: char) -> bool {
    matches!(
        c,
        '\u{ad}'
            | '\u{600}'..='\u{605}'
            | '\u{61c}'
            | '\u{6dd}'
            | '\u{70f}'
            | '\u{180e}'
            | '\u{200b}'..='\u{200f}'
            | '\u{202a}'..='\u{202e}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206f}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
            | '\u{e000}'..='\u{f8ff}'
            | '\u{e0001}'
            | '\u{e0020}'..='\u{e007f}'
            | '\u{f0000}'..='\u{ffffd}'
            | '\u{100000}'..='\u{10fffd}'
    )
}
