//! # Storage Layer
//!
//! Reading and writing configuration files.
//!
//! ## Save Protocol
//!
//! [`Document::save`] only writes when a key was added, changed or removed:
//!
//! 1. If the target exists it is renamed to `<path>.pre-cfgfile`
//! 2. Otherwise missing parent directories are created
//! 3. The new content is written to `<path>`
//! 4. Permission bits are copied from the backup, which is left in place
//!
//! ## Key Types
//!
//! - [`Document`] - Ordered lines plus a key index
//! - [`Config`] - User defaults from `config.toml`

mod document;
mod config;

pub use document::{backup_path, Document, DocumentError, BACKUP_SUFFIX, DEFAULT_SEPARATOR};
pub use config::{Config, ConfigError, OutputFormat, CONFIG_ENV};
