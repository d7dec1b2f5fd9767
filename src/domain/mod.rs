//! Domain models for cfgfile
//!
//! Line parsing and value escaping, without any I/O concerns.

mod escape;
mod line;

pub use escape::{EscapeError, EscapeKind, Escaper, NoEscape, ShellEscape};
pub use line::{Entry, Line, COMMENT_MARKERS};
