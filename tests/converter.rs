//! Converter output tests.

mod common;

use common::{PREAMBLE, convert_body};
use pysh_rs::{CommandRuntime, Converter, Error, LexErrorKind, PyshRuntime, convert_str};

#[test]
fn preamble_only_for_empty_input() {
    assert_eq!(convert_str("").expect("convert"), PREAMBLE);
}

#[test]
fn python_lines_pass_through() {
    let input = "import os\n\ndef f(x):\n    return x * 2\n";
    assert_eq!(convert_body(input), input);
}

#[test]
fn missing_final_newline_is_added() {
    assert_eq!(convert_body("x = 1"), "x = 1\n");
}

#[test]
fn shell_line_becomes_runtime_call() {
    assert_eq!(
        convert_body("> ls -l\n"),
        "pysh.pysh.run('ls -l', locals(), globals())\n"
    );
}

#[test]
fn shell_indent_is_preserved() {
    let input = "for f in files:\n    > cat $f -> out\n    print(out)\n";
    let expected = "for f in files:\n    \
                    pysh.pysh.run('cat $f -> out', locals(), globals())\n    \
                    print(out)\n";
    assert_eq!(convert_body(input), expected);
}

#[test]
fn shell_content_is_quoted() {
    assert_eq!(
        convert_body("> echo 'it''s' \\\n  done"),
        "pysh.pysh.run(\"echo 'it''s'   done\", locals(), globals())\n"
    );
}

#[test]
fn comments_are_removed() {
    assert_eq!(
        convert_body("# header\nx = 1  # one\n> ls  # list\n"),
        "\nx = 1  \npysh.pysh.run('ls  ', locals(), globals())\n"
    );
}

#[test]
fn heredoc_is_kept_whole() {
    let input = "doc = '''\n> not shell\n'''\n";
    assert_eq!(convert_body(input), input);
}

#[test]
fn lex_error_aborts() {
    let err = convert_str("x = 1\n> echo \"oops\n").unwrap_err();
    match err {
        Error::Lex(e) => assert_eq!(e.kind, LexErrorKind::EolInString { quote: '"' }),
        other => panic!("expected lex error, got {other:?}"),
    }
}

#[test]
fn custom_runtime() {
    struct Echo;
    impl CommandRuntime for Echo {
        fn preamble(&self) -> String {
            String::new()
        }
        fn call_expression(&self, content: &str) -> String {
            format!("print({content:?})")
        }
    }

    let mut converter = Converter::with_runtime("> hi\n".as_bytes(), Vec::new(), Echo);
    assert_eq!(converter.convert().expect("convert"), 1);
    assert_eq!(converter.into_writer(), b"print(\"hi\")\n");
}

#[test]
fn configured_runtime_names() {
    let runtime = PyshRuntime::new("shellrt", "call");
    let mut converter = Converter::with_runtime("> ls\nx\n".as_bytes(), Vec::new(), runtime);
    assert_eq!(converter.convert().expect("convert"), 2);
    assert_eq!(
        String::from_utf8(converter.into_writer()).expect("utf8"),
        "import shellrt\nshellrt.call('ls', locals(), globals())\nx\n"
    );
}

#[test]
fn writer_failure_is_io_error() {
    struct Broken;
    impl std::io::Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let err = Converter::new("x\n".as_bytes(), Broken)
        .convert()
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
