//! Transpiler for pysh: Python sources with embedded shell lines.
//!
//! A line whose first non-blank character is `>` is a shell command. The
//! converter turns every such line into a call into the pysh runtime and
//! leaves everything else alone, so the result is an ordinary Python
//! program.
//!
//! # Quick start
//!
//! ```
//! use pysh_rs::convert_str;
//!
//! let output = convert_str("for f in files:\n    > ls -l\n").unwrap();
//! assert_eq!(
//!     output,
//!     "import pysh.pysh\n\
//!      for f in files:\n    \
//!      pysh.pysh.run('ls -l', locals(), globals())\n"
//! );
//! ```
//!
//! ## Lex a source into segments
//!
//! ```
//! use pysh_rs::{Mode, lex};
//!
//! let segments = lex("x = 1  # comment\n> echo $x").unwrap();
//! assert_eq!(segments[0].content, "x = 1  ");
//! assert_eq!(segments[1].mode, Mode::Shell);
//! assert_eq!(segments[1].content, "echo $x");
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod config;
pub mod converter;
pub mod lexer;
pub mod response;
pub mod segment;

pub use config::{Config, ConfigError};
pub use converter::{CommandRuntime, Converter, PyshRuntime, SIGNATURE, python_literal};
pub use lexer::{IndentObserver, LexError, LexErrorKind, Lexer, NoPrediction, lex};
pub use response::response_names;
pub use segment::{Mode, Segment, Span};

/// Unified error type for a conversion run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source could not be lexed.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// Writing the output failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The config file could not be loaded.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// Convert a pysh source string to Python in one step.
pub fn convert_str(input: &str) -> Result<String, Error> {
    let mut converter = Converter::new(input.as_bytes(), Vec::new());
    converter.convert()?;
    Ok(String::from_utf8_lossy(&converter.into_writer()).into_owned())
}
