//! Actions on a loaded document

use std::path::Path;

use anyhow::Result;

use super::modflag::ModFlag;
use super::output::Output;
use crate::storage::Document;

pub struct Editor<'a> {
    pub document: &'a mut Document,
    pub path: &'a Path,
    pub modflag: Option<&'a ModFlag>,
    pub output: &'a Output,
}

impl Editor<'_> {
    /// Applies every KEY VALUE pair, then saves once
    pub fn set(self, pairs: &[String]) -> Result<()> {
        for pair in pairs.chunks_exact(2) {
            let (key, value) = (&pair[0], &pair[1]);
            if self.document.set_key(key, value) {
                self.output.verbose_ctx("set", &format!("{} = {:?}", key, value));
            } else {
                self.output.verbose_ctx("set", &format!("{} unchanged", key));
            }
        }
        self.save()
    }

    pub fn get(self, key: &str, default: &str) {
        let found = self.document.get(key);
        let value = found.unwrap_or(default);

        if self.output.is_json() {
            self.output.data(&serde_json::json!({
                "key": key,
                "value": value,
                "found": found.is_some(),
            }));
        } else {
            self.output.line(value);
        }
    }

    /// Deletes every key, then saves once
    pub fn del(self, keys: &[String]) -> Result<()> {
        for key in keys {
            if self.document.del_key(key) {
                self.output.verbose_ctx("del", &format!("Deleted {}", key));
            } else {
                self.output.verbose_ctx("del", &format!("{} not present", key));
            }
        }
        self.save()
    }

    pub fn keylist(self) {
        let keys = self.document.key_list();

        if self.output.is_json() {
            self.output.data(&keys);
        } else {
            for key in keys {
                self.output.line(key);
            }
        }
    }

    fn save(self) -> Result<()> {
        let written = self.document.save(self.path)?;

        if written {
            self.output
                .verbose_ctx("save", &format!("Wrote {}", self.path.display()));
            if let Some(flag) = self.modflag {
                flag.touch()?;
                self.output
                    .verbose_ctx("modflag", &format!("Created {}", flag.path().display()));
            }
        } else {
            self.output.verbose_ctx("save", "No changes, file left untouched");
        }

        self.output.data(&serde_json::json!({
            "path": self.path.display().to_string(),
            "modified": written,
        }));
        Ok(())
    }
}
