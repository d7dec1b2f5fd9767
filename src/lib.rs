//! cfgfile - Edit key/value configuration files from the command line
//!
//! Loads a text file of `key<sep>value` lines, lets you get, set and delete
//! keys, and writes the file back only if something changed. Comments, blank
//! lines and free text are kept verbatim and line order is preserved.
//!
//! ```
//! use cfgfile::{Document, EscapeKind};
//!
//! let mut doc = Document::new().with_escape(EscapeKind::Shell);
//! doc.load_from_str("# settings\nname=old\n");
//! doc.set_key("name", "new value");
//! assert_eq!(doc.to_string(), "# settings\nname=new\\ value\n");
//! ```

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Entry, EscapeKind, Escaper, Line, NoEscape, ShellEscape};
pub use storage::{Document, DocumentError};
