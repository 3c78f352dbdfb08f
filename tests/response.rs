//! Response-name extraction.

use pysh_rs::response_names;

#[test]
fn plain_response() {
    assert_eq!(response_names("echo foo -> bar"), vec!["bar"]);
}

#[test]
fn redirect_response() {
    assert_eq!(response_names("echo foo => bar"), vec!["bar"]);
}

#[test]
fn in_binary_op() {
    assert_eq!(
        response_names("echo foo -> bar && echo baz => qux"),
        vec!["bar", "qux"]
    );
}

#[test]
fn in_assign_cmd() {
    assert_eq!(
        response_names("(echo foo -> bar && echo baz => qux) -> piyo"),
        vec!["bar", "qux", "piyo"]
    );
}

#[test]
fn no_operators() {
    assert!(response_names("ls -l | grep x > out.txt").is_empty());
}

#[test]
fn no_space_around_operator() {
    assert_eq!(response_names("cat a->x|sort=>y"), vec!["x", "y"]);
}
