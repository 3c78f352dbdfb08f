//! Names bound by the response operators of a shell segment.
//!
//! `cmd -> name` binds the command's output and `cmd => name` binds the
//! redirected stream. Callers use the names to know which locals a shell
//! line is going to set.

/// Plain response operator.
pub const RESPONSE_OP: &str = "->";
/// Redirecting response operator.
pub const REDIRECT_OP: &str = "=>";

/// Return the identifier after every response operator, in order of
/// appearance. Parenthesised groups are scanned like the rest of the
/// line, so inner bindings come before the outer one that follows the
/// closing parenthesis.
#[must_use]
pub fn response_names(content: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut chars = content.char_indices().peekable();
    let mut quote: Option<char> = None;

    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '\\' => {
                chars.next();
            }
            '-' | '=' if chars.peek().is_some_and(|&(_, next)| next == '>') => {
                chars.next();
                let rest = &content[i + 2..];
                if let Some(name) = leading_identifier(rest.trim_start()) {
                    names.push(name.to_string());
                }
            }
            _ => {}
        }
    }

    names
}

fn leading_identifier(s: &str) -> Option<&str> {
    let mut end = 0;
    for (i, c) in s.char_indices() {
        let ok = if i == 0 {
            c.is_alphabetic() || c == '_'
        } else {
            c.is_alphanumeric() || c == '_'
        };
        if !ok {
            break;
        }
        end = i + c.len_utf8();
    }
    (end > 0).then(|| &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_prefix() {
        assert_eq!(leading_identifier("bar && x"), Some("bar"));
        assert_eq!(leading_identifier("_x1)"), Some("_x1"));
        assert_eq!(leading_identifier("1abc"), None);
        assert_eq!(leading_identifier(""), None);
    }

    #[test]
    fn operator_without_name() {
        assert!(response_names("echo foo ->").is_empty());
        assert!(response_names("echo foo -> (bar)").is_empty());
    }

    #[test]
    fn quoted_operators_are_ignored() {
        assert_eq!(response_names("echo '-> a' \"=> b\" -> c"), vec!["c"]);
    }
}
