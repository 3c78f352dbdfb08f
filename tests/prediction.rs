//! Indentation prediction reported through `IndentObserver`.

mod common;

use common::predictions;
use pysh_rs::{Lexer, Segment};

#[test]
fn plain_lines_predict_their_own_indent() {
    assert_eq!(predictions("print 3 + 4\n  print 4 + 5"), vec!["", "  "]);
}

#[test]
fn block_opener() {
    assert_eq!(predictions("if x:\n"), vec!["    "]);
}

#[test]
fn block_opener_with_indent() {
    assert_eq!(predictions("  if x:\n"), vec!["      "]);
}

#[test]
fn opener_with_trailing_comment() {
    assert_eq!(predictions("while True:  # forever\n"), vec!["    "]);
}

#[test]
fn pass_returns_to_opener() {
    assert_eq!(predictions("if x:\n  pass\n"), vec!["    ", ""]);
}

#[test]
fn pass_with_indent_returns_to_opener() {
    assert_eq!(predictions("  if x:\n    pass\n"), vec!["      ", "  "]);
}

#[test]
fn return_returns_to_opener() {
    assert_eq!(predictions("if x:\n  return f(x)\n"), vec!["    ", ""]);
}

#[test]
fn nested_blocks() {
    let input = "def f():\n    for x in y:\n        if x:\n            break\n        continue\n";
    assert_eq!(
        predictions(input),
        vec!["    ", "        ", "            ", "        ", "    "]
    );
}

#[test]
fn dedent_closes_inner_blocks() {
    let input = "if a:\n    if b:\n        x\nelse:\n    raise E\n";
    assert_eq!(
        predictions(input),
        vec!["    ", "        ", "        ", "    ", ""]
    );
}

#[test]
fn terminator_without_opener_outdents_one_step() {
    assert_eq!(predictions("        return\n"), vec!["    "]);
}

#[test]
fn shell_and_blank_lines_report_nothing() {
    assert_eq!(predictions("if x:\n\n    > ls\n    # note\n"), vec!["    "]);
}

#[test]
fn prediction_is_advisory() {
    let mut log = Vec::new();
    let lexer = Lexer::with_observer("if x:\n  y = 1\n".as_bytes(), |indent: &str| {
        log.push(indent.to_string());
    });
    let segments: Vec<Segment> = lexer.collect::<Result<_, _>>().expect("lex");
    assert_eq!(
        segments,
        vec![Segment::python("", "if x:"), Segment::python("  ", "y = 1")]
    );
    assert_eq!(log, vec!["    ", "  "]);
}

#[test]
fn observer_is_returned() {
    struct Count(usize);
    impl pysh_rs::IndentObserver for Count {
        fn predict_indent(&mut self, _indent: &str) {
            self.0 += 1;
        }
    }

    let mut lexer = Lexer::with_observer("a\nb:\n> c\n".as_bytes(), Count(0));
    while lexer.next_segment().expect("lex").is_some() {}
    assert_eq!(lexer.into_observer().0, 2);
}
