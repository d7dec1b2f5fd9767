//! Value escaping strategies
//!
//! A strategy turns a stored value into the text written after the
//! separator (`escape`) and back (`unescape`). Two strategies exist:
//!
//! - `none` - values are written as-is, surrounding whitespace is dropped on read
//! - `shell` - backslash escaping and quote handling, like a shell token
//!
//! For any value without surrounding whitespace, `unescape(escape(v)) == v`
//! holds for both. `shell` also round-trips values with leading or trailing
//! spaces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters escaped by [`ShellEscape`]. Backslash must come first.
const SHELL_SPECIAL_CHARS: [char; 4] = ['\\', '"', '\'', ' '];

#[derive(Debug, Error, PartialEq)]
pub enum EscapeError {
    #[error("Unknown escape strategy '{0}' (expected one of: none, shell)")]
    Unknown(String),
}

/// Converts values to and from their on-disk text
pub trait Escaper {
    /// Encodes a value for writing after the separator
    fn escape(&self, value: &str) -> String;

    /// Decodes the text found after the separator
    fn unescape(&self, text: &str) -> String;
}

/// Identity escaping
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEscape;

impl Escaper for NoEscape {
    fn escape(&self, value: &str) -> String {
        value.to_string()
    }

    fn unescape(&self, text: &str) -> String {
        text.trim().to_string()
    }
}

/// Shell-token escaping
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellEscape;

impl Escaper for ShellEscape {
    fn escape(&self, value: &str) -> String {
        let mut escaped = value.to_string();
        for special in SHELL_SPECIAL_CHARS {
            escaped = escaped.replace(special, &format!("\\{}", special));
        }
        escaped
    }

    fn unescape(&self, text: &str) -> String {
        let mut src: Vec<char> = text.trim_start().chars().collect();

        // Drop trailing whitespace unless it is escaped
        while src.len() >= 2 && src[src.len() - 1].is_whitespace() && src[src.len() - 2] != '\\' {
            src.pop();
        }

        let mut dst = String::with_capacity(src.len());
        let mut quote: Option<char> = None;
        let mut chars = src.into_iter();

        while let Some(ch) = chars.next() {
            match ch {
                '\\' => match chars.next() {
                    Some(next) => dst.push(next),
                    // Dangling backslash at end of input
                    None => dst.push('\\'),
                },
                '\'' | '"' => match quote {
                    None => quote = Some(ch),
                    Some(open) if open == ch => quote = None,
                    Some(_) => dst.push(ch),
                },
                _ => dst.push(ch),
            }
        }

        dst
    }
}

/// Registry of escape strategies, selectable by name
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum EscapeKind {
    /// Values are written verbatim
    #[default]
    None,
    /// Backslash-escape spaces, quotes and backslashes
    Shell,
}

impl EscapeKind {
    pub const ALL: [EscapeKind; 2] = [EscapeKind::None, EscapeKind::Shell];

    pub fn as_str(&self) -> &'static str {
        match self {
            EscapeKind::None => "none",
            EscapeKind::Shell => "shell",
        }
    }
}

impl Escaper for EscapeKind {
    fn escape(&self, value: &str) -> String {
        match self {
            EscapeKind::None => NoEscape.escape(value),
            EscapeKind::Shell => ShellEscape.escape(value),
        }
    }

    fn unescape(&self, text: &str) -> String {
        match self {
            EscapeKind::None => NoEscape.unescape(text),
            EscapeKind::Shell => ShellEscape.unescape(text),
        }
    }
}

impl fmt::Display for EscapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EscapeKind {
    type Err = EscapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EscapeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EscapeError::Unknown(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// (unescaped, escaped) pairs
    const SHELL_DATA: &[(&str, &str)] = &[
        ("bla", "bla"),
        ("tok1 tok2", "tok1\\ tok2"),
        ("tok1\\tok2", "tok1\\\\tok2"),
        ("tok1'tok2", "tok1\\'tok2"),
        ("tok1\"tok2", "tok1\\\"tok2"),
        (" ", "\\ "),
    ];

    #[test]
    fn shell_escape_data() {
        for (unescaped, escaped) in SHELL_DATA {
            assert_eq!(ShellEscape.escape(unescaped), *escaped);
        }
    }

    #[test]
    fn shell_unescape_data() {
        for (unescaped, escaped) in SHELL_DATA {
            assert_eq!(ShellEscape.unescape(escaped), *unescaped);
        }
    }

    #[test]
    fn shell_unescape_quotes_and_blanks() {
        assert_eq!(ShellEscape.unescape("   "), "");
        assert_eq!(ShellEscape.unescape("'bla'"), "bla");
        assert_eq!(ShellEscape.unescape("\"bla\""), "bla");
        assert_eq!(ShellEscape.unescape("'bl\\'a'"), "bl'a");
    }

    #[test]
    fn shell_unescape_keeps_escaped_trailing_space() {
        assert_eq!(ShellEscape.unescape("  value\\  "), "value ");
        assert_eq!(ShellEscape.unescape("value   "), "value");
    }

    #[test]
    fn shell_unescape_other_quote_inside_quotes_is_literal() {
        assert_eq!(ShellEscape.unescape("\"it's\""), "it's");
        assert_eq!(ShellEscape.unescape("'say \"hi\"'"), "say \"hi\"");
    }

    #[test]
    fn shell_unescape_dangling_backslash() {
        assert_eq!(ShellEscape.unescape("abc\\"), "abc\\");
    }

    #[test]
    fn shell_escape_backslash_first() {
        // The backslash inserted for the quote must not be doubled
        assert_eq!(ShellEscape.escape("\\'"), "\\\\\\'");
        assert_eq!(ShellEscape.unescape("\\\\\\'"), "\\'");
    }

    #[test]
    fn no_escape_trims_on_read() {
        assert_eq!(NoEscape.escape(" a "), " a ");
        assert_eq!(NoEscape.unescape(" a  value  "), "a  value");
        assert_eq!(NoEscape.unescape("    "), "");
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("none".parse::<EscapeKind>().unwrap(), EscapeKind::None);
        assert_eq!("shell".parse::<EscapeKind>().unwrap(), EscapeKind::Shell);
        assert_eq!(
            "bash".parse::<EscapeKind>(),
            Err(EscapeError::Unknown("bash".to_string()))
        );
    }

    #[test]
    fn kind_dispatches() {
        assert_eq!(EscapeKind::Shell.escape("a b"), "a\\ b");
        assert_eq!(EscapeKind::None.escape("a b"), "a b");
        assert_eq!(EscapeKind::Shell.to_string(), "shell");
    }

    proptest! {
        #[test]
        fn shell_round_trip(value in "[ -~]*") {
            prop_assert_eq!(ShellEscape.unescape(&ShellEscape.escape(&value)), value);
        }

        #[test]
        fn no_escape_round_trip(value in "[^\\s]([^\\n]*[^\\s])?") {
            prop_assert_eq!(NoEscape.unescape(&NoEscape.escape(&value)), value);
        }
    }
}
