//! Change-signal file for chaining invocations
//!
//! With `--modflag`, a save that actually wrote touches a well-known file.
//! A script can run several edits and then test for that file:
//!
//! ```bash
//! cfgfile --modflag app.conf set key value
//! cfgfile --modflag --keepflag other.conf set key value
//! [ -e /tmp/modflag ] && systemctl reload app
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub struct ModFlag {
    path: PathBuf,
}

impl ModFlag {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the flag file; returns true if it existed
    pub fn clear(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove modflag: {}", self.path.display())),
        }
    }

    /// Creates (or truncates) the flag file
    pub fn touch(&self) -> Result<()> {
        fs::write(&self.path, "")
            .with_context(|| format!("Failed to create modflag: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn touch_and_clear() {
        let dir = TempDir::new().unwrap();
        let flag = ModFlag::new(dir.path().join("modflag"));

        assert!(!flag.clear().unwrap());

        flag.touch().unwrap();
        assert!(flag.path().exists());

        assert!(flag.clear().unwrap());
        assert!(!flag.path().exists());
    }
}
