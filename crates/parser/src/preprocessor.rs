//! Source cleanup applied before tokenizing.

/// Remove `#` comments.
///
/// Everything from the first `#` to the end of its line is dropped, even
/// inside a string literal. Line structure is preserved so diagnostics keep
/// their line numbers.
pub(crate) fn strip_comments(text: &str) -> String {
    text.lines()
        .map(|line| match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_comments_unchanged() {
        assert_eq!(strip_comments("main do\nstop\nend"), "main do\nstop\nend");
    }

    #[test]
    fn trailing_comment_removed() {
        assert_eq!(strip_comments("push 1 # one\npop x"), "push 1 \npop x");
    }

    #[test]
    fn whole_line_comment_keeps_line() {
        assert_eq!(strip_comments("# header\nstop"), "\nstop");
    }

    #[test]
    fn hash_inside_string_is_stripped_too() {
        assert_eq!(strip_comments("print \"a#b\""), "print \"a");
    }
}
