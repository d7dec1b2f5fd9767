//! In-memory model of a key/value configuration file
//!
//! A [`Document`] keeps every line of the file in order. Key/value lines are
//! also reachable by key through an index that points at the same slot, so
//! there is exactly one copy of each entry.
//!
//! Saving is conditional: an unmodified document never touches the
//! filesystem. When it does write, the previous file is first renamed to
//! `<path>.pre-cfgfile` and its permission bits are copied onto the new file.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{EscapeKind, Entry, Line};

/// Suffix appended to the previous file when saving over it
pub const BACKUP_SUFFIX: &str = ".pre-cfgfile";

/// Default key/value separator
pub const DEFAULT_SEPARATOR: &str = "=";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read {}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to back up {} to {}", path.display(), backup.display())]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        source: io::Error,
    },

    #[error("Failed to create directory {}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to copy permissions from {} to {}", backup.display(), path.display())]
    Permissions {
        path: PathBuf,
        backup: PathBuf,
        source: io::Error,
    },
}

/// Returns the backup path used when saving over `path`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Position of a line in the document's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineId(usize);

/// A key/value configuration file
#[derive(Debug, Clone)]
pub struct Document {
    /// Line storage; deleted lines leave a `None` behind
    slots: Vec<Option<Line>>,
    /// File order
    order: Vec<LineId>,
    index: BTreeMap<String, LineId>,
    separator: String,
    escape: EscapeKind,
    modified: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document using `=` and no escaping
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            order: Vec::new(),
            index: BTreeMap::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
            escape: EscapeKind::None,
            modified: false,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_escape(mut self, escape: EscapeKind) -> Self {
        self.escape = escape;
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn escape(&self) -> EscapeKind {
        self.escape
    }

    /// Returns true if a key was added, changed or removed since the last
    /// load or save
    pub fn modified(&self) -> bool {
        self.modified
    }

    /// Loads the file at `path`, replacing the current content.
    ///
    /// A missing file is not an error: the document is left empty so that
    /// setting keys and saving creates it.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => {
                self.load_from_str(&content);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.clear();
                Ok(())
            }
            Err(source) => Err(DocumentError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Loads from any reader, replacing the current content
    pub fn load_from_reader(&mut self, mut reader: impl Read) -> io::Result<()> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        self.load_from_str(&content);
        Ok(())
    }

    /// Parses `content`, replacing the current content
    pub fn load_from_str(&mut self, content: &str) {
        self.clear();
        let texts: Vec<&str> = content
            .split_inclusive('\n')
            .map(|text| text.strip_suffix('\n').unwrap_or(text))
            .collect();

        for text in &texts {
            let line = Line::parse(text, &self.separator, &self.escape);

            // The last occurrence of a repeated key wins; earlier ones
            // become raw lines so each key has a single entry
            if let Some(&LineId(previous)) = line.key().and_then(|key| self.index.get(key)) {
                self.slots[previous] = Some(Line::Raw(texts[previous].to_string()));
            }
            self.push(line);
        }
    }

    /// Removes all lines and resets the modified flag
    fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
        self.index.clear();
        self.modified = false;
    }

    fn push(&mut self, line: Line) {
        let id = LineId(self.slots.len());
        if let Some(key) = line.key() {
            self.index.insert(key.to_string(), id);
        }
        self.slots.push(Some(line));
        self.order.push(id);
    }

    fn entry(&self, key: &str) -> Option<&Entry> {
        let id = self.index.get(key)?;
        self.slots[id.0].as_ref()?.as_entry()
    }

    /// Returns the value of `key`, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry(key).map(|entry| entry.value.as_str())
    }

    /// Returns the value of `key`, or `default` if it is absent
    pub fn get_key<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Sets `key` to `value`.
    ///
    /// An existing line is updated in place; a new key is appended at the
    /// end. Returns true if the document changed.
    pub fn set_key(&mut self, key: &str, value: &str) -> bool {
        if let Some(&id) = self.index.get(key) {
            let entry = self.slots[id.0]
                .as_mut()
                .and_then(Line::as_entry_mut);
            if let Some(entry) = entry {
                if entry.value == value {
                    return false;
                }
                entry.value = value.to_string();
                self.modified = true;
                return true;
            }
        }

        self.push(Line::Entry(Entry::new(key, value)));
        self.modified = true;
        true
    }

    /// Removes `key` and its line. Returns true if the key existed.
    pub fn del_key(&mut self, key: &str) -> bool {
        let Some(id) = self.index.remove(key) else {
            return false;
        };

        self.order.retain(|&other| other != id);
        self.slots[id.0] = None;
        self.modified = true;
        true
    }

    /// Returns all keys, in the index's (sorted) order
    pub fn key_list(&self) -> Vec<&str> {
        self.index.keys().map(String::as_str).collect()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterates over all lines in file order
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.order
            .iter()
            .filter_map(|id| self.slots[id.0].as_ref())
    }

    /// Writes every line followed by a newline and resets the modified flag
    pub fn write_to(&mut self, mut writer: impl Write) -> io::Result<()> {
        write!(writer, "{}", self)?;
        writer.flush()?;
        self.modified = false;
        Ok(())
    }

    /// Saves to `path` if the document was modified.
    ///
    /// Returns true if the file was written, false if there was nothing to
    /// save.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<bool, DocumentError> {
        if !self.modified {
            return Ok(false);
        }

        let path = path.as_ref();
        let backup = backup_path(path);

        if path.exists() {
            fs::rename(path, &backup).map_err(|source| DocumentError::Backup {
                path: path.to_path_buf(),
                backup: backup.clone(),
                source,
            })?;
        } else if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                create_dir_all(parent).map_err(|source| DocumentError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let write_err = |source| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        };
        let file = fs::File::create(path).map_err(write_err)?;
        self.write_to(BufWriter::new(file)).map_err(write_err)?;

        if backup.exists() {
            fs::metadata(&backup)
                .and_then(|metadata| fs::set_permissions(path, metadata.permissions()))
                .map_err(|source| DocumentError::Permissions {
                    path: path.to_path_buf(),
                    backup,
                    source,
                })?;
        }

        Ok(true)
    }
}

#[cfg(unix)]
fn create_dir_all(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o755).create(path)
}

#[cfg(not(unix))]
fn create_dir_all(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line.render(&self.separator, &self.escape))?;
        }
        Ok(())
    }
}
