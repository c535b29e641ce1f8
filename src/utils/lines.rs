use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new("\r\n?|\n|\u{2028}|\u{2029}").expect("valid line break pattern"));

/// Number of lines in `text`: line breaks plus one, so an empty string has one line.
pub fn count_lines(text: &str) -> usize {
    LINE_BREAK.find_iter(text).count() + 1
}
