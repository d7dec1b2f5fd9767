//! Lines of a configuration file
//!
//! Every physical line is either a key/value [`Entry`] or a raw line kept
//! byte-for-byte (comments, blanks, free text). Entries do not store the
//! separator or escape strategy; the owning document passes them in when a
//! line is parsed or rendered.

use std::borrow::Cow;

use super::escape::Escaper;

/// First non-blank characters that mark a comment line
pub const COMMENT_MARKERS: [char; 2] = ['#', ';'];

/// A parsed `key<sep>value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Renders as `key + separator + escape(value)`
    pub fn render(&self, separator: &str, escaper: &impl Escaper) -> String {
        format!("{}{}{}", self.key, separator, escaper.escape(&self.value))
    }
}

/// One line of a configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Preserved verbatim on output
    Raw(String),
    Entry(Entry),
}

impl Line {
    /// Returns true if `text` should be parsed as a key/value line
    pub fn is_key_bearing(text: &str, separator: &str) -> bool {
        if separator.is_empty() {
            return false;
        }

        let trimmed = text.trim();
        match trimmed.chars().next() {
            None => false,
            Some(first) if COMMENT_MARKERS.contains(&first) => false,
            Some(_) => trimmed.contains(separator),
        }
    }

    /// Parses one physical line (without its trailing newline)
    pub fn parse(text: &str, separator: &str, escaper: &impl Escaper) -> Self {
        if !Self::is_key_bearing(text, separator) {
            return Line::Raw(text.to_string());
        }

        // Keep trailing whitespace: it may be an escaped space in the value
        match text.trim_start().split_once(separator) {
            Some((key, value)) => Line::Entry(Entry::new(key.trim(), escaper.unescape(value))),
            None => Line::Raw(text.to_string()),
        }
    }

    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            Line::Entry(entry) => Some(entry),
            Line::Raw(_) => None,
        }
    }

    pub fn as_entry_mut(&mut self) -> Option<&mut Entry> {
        match self {
            Line::Entry(entry) => Some(entry),
            Line::Raw(_) => None,
        }
    }

    /// Returns the key if this is an entry
    pub fn key(&self) -> Option<&str> {
        self.as_entry().map(|entry| entry.key.as_str())
    }

    /// Renders the line as it should appear in the file
    pub fn render(&self, separator: &str, escaper: &impl Escaper) -> Cow<'_, str> {
        match self {
            Line::Raw(text) => Cow::Borrowed(text.as_str()),
            Line::Entry(entry) => Cow::Owned(entry.render(separator, escaper)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::escape::{NoEscape, ShellEscape};

    #[test]
    fn comments_and_blanks_are_raw() {
        for text in ["# a comment", "  ; other=comment", "", "    ", "free text"] {
            assert_eq!(
                Line::parse(text, "=", &NoEscape),
                Line::Raw(text.to_string())
            );
        }
    }

    #[test]
    fn parses_entry() {
        let line = Line::parse("  key = value ", "=", &NoEscape);
        assert_eq!(line, Line::Entry(Entry::new("key", "value")));
        assert_eq!(line.key(), Some("key"));
    }

    #[test]
    fn splits_on_first_separator() {
        let line = Line::parse("url=http://host/?a=b", "=", &NoEscape);
        assert_eq!(line, Line::Entry(Entry::new("url", "http://host/?a=b")));
    }

    #[test]
    fn space_separator_with_indent() {
        let line = Line::parse("   key   value\\  ", " ", &ShellEscape);
        assert_eq!(line, Line::Entry(Entry::new("key", "value ")));
    }

    #[test]
    fn empty_separator_never_matches() {
        assert_eq!(Line::parse("key=value", "", &NoEscape), Line::Raw("key=value".to_string()));
    }

    #[test]
    fn render_raw_verbatim() {
        let line = Line::Raw("  # keep   me ".to_string());
        assert_eq!(line.render("=", &ShellEscape), "  # keep   me ");
    }

    #[test]
    fn render_entry_escapes_value() {
        let line = Line::Entry(Entry::new("key", "a value"));
        assert_eq!(line.render("=", &ShellEscape), "key=a\\ value");
        assert_eq!(line.render(": ", &NoEscape), "key: a value");
    }
}
