//! Assertion macros for generated C text.

/// Assert that `text` contains `line` as a complete line.
///
/// # Example
///
/// ```rust
/// use kllgen_test_helpers::assert_has_line;
///
/// assert_has_line!("a\n#define X 1\nb", "#define X 1");
/// ```
#[macro_export]
macro_rules! assert_has_line {
    ($text:expr, $line:expr $(,)?) => {{
        let text: &str = &$text;
        let line: &str = &$line;
        if !text.lines().any(|l| l == line) {
            panic!(
                "assertion failed: text does not contain line\n  line: `{}`\n  text:\n{}",
                line, text
            );
        }
    }};
}

/// Assert that `needle` occurs exactly `count` times in `text`.
///
/// # Example
///
/// ```rust
/// use kllgen_test_helpers::assert_occurrences;
///
/// assert_occurrences!("0, 1, 0", "0", 2);
/// ```
#[macro_export]
macro_rules! assert_occurrences {
    ($text:expr, $needle:expr, $count:expr $(,)?) => {{
        let text: &str = &$text;
        let needle: &str = &$needle;
        let found = text.matches(needle).count();
        if found != $count {
            panic!(
                "assertion failed: `{}` occurs {} time(s), expected {}\n  text:\n{}",
                needle, found, $count, text
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_has_line() {
        assert_has_line!("one\ntwo\n", "two");
    }

    #[test]
    #[should_panic(expected = "does not contain line")]
    fn test_has_line_rejects_partial_match() {
        assert_has_line!("one\ntwo three\n", "two");
    }

    #[test]
    fn test_occurrences() {
        assert_occurrences!("End, End", "End", 2);
    }
}
