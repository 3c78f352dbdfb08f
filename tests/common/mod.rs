#![allow(dead_code)]

use pysh_rs::{Lexer, Segment, convert_str, lex};

pub const PREAMBLE: &str = "import pysh.pysh\n";

pub fn segments(input: &str) -> Vec<Segment> {
    lex(input).expect("lex failed")
}

/// Convert and strip the preamble, asserting it is there.
pub fn convert_body(input: &str) -> String {
    let output = convert_str(input).expect("convert failed");
    output
        .strip_prefix(PREAMBLE)
        .unwrap_or_else(|| panic!("missing preamble:\n{output}"))
        .to_string()
}

/// Lex `input` to completion and return every indent prediction.
pub fn predictions(input: &str) -> Vec<String> {
    let mut log = Vec::new();
    let mut lexer = Lexer::with_observer(input.as_bytes(), |indent: &str| {
        log.push(indent.to_string());
    });
    while lexer.next_segment().expect("lex failed").is_some() {}
    drop(lexer);
    log
}
