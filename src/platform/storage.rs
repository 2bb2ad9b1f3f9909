// Sayaç CRM - platform/storage.rs
//
// File-backed storage slots: one file per key inside a data directory.
//
// - Slots are written atomically (write→temp, rename→final) so a crash
//   during a save never corrupts the previous good content.
// - The data directory is created on first write; no user action required.
// - Read failures other than "not found" are logged and treated as absent.

use crate::app::store::StorageBackend;
use crate::util::constants::{
    MAX_SLOT_SIZE, NOTES_FILE_EXTENSION, NOTES_KEY, RECORDS_FILE_EXTENSION,
};
use crate::util::error::StorageError;
use std::path::{Path, PathBuf};

/// Storage backend writing each slot to `<dir>/<key>.<ext>`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing slot `key`. The notes slot is plain text; every other
    /// slot holds JSON.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        let ext = if key == NOTES_KEY {
            NOTES_FILE_EXTENSION
        } else {
            RECORDS_FILE_EXTENSION
        };
        self.dir.join(format!("{key}.{ext}"))
    }

    /// Where an oversized slot file is moved before the slot is rewritten.
    pub fn oversize_path(&self, key: &str) -> PathBuf {
        let mut name = self.slot_path(key).into_os_string();
        name.push(".oversize");
        PathBuf::from(name)
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.slot_path(key);

        match std::fs::metadata(&path) {
            Ok(meta) if meta.len() > MAX_SLOT_SIZE => {
                tracing::warn!(
                    path = %path.display(),
                    size = meta.len(),
                    max = MAX_SLOT_SIZE,
                    "Storage slot exceeds maximum size; ignoring"
                );
                return None;
            }
            Ok(_) => {}
            Err(e) => {
                // "Not found" is the normal first-run state.
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(path = %path.display(), error = %e, "Cannot stat storage slot");
                }
                return None;
            }
        }

        std::fs::read_to_string(&path)
            .map_err(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Cannot read storage slot");
            })
            .ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        let write_err = |path: &Path, e: std::io::Error| StorageError::Write {
            key: key.to_string(),
            path: path.to_path_buf(),
            source: e,
        };

        std::fs::create_dir_all(&self.dir).map_err(|e| write_err(&self.dir, e))?;

        // `get` never read an oversized slot, so overwriting it would lose
        // data nobody has seen. Keep it next to the new slot instead.
        if std::fs::metadata(&path).is_ok_and(|meta| meta.len() > MAX_SLOT_SIZE) {
            let aside = self.oversize_path(key);
            std::fs::rename(&path, &aside).map_err(|e| write_err(&aside, e))?;
            tracing::warn!(
                from = %path.display(),
                to = %aside.display(),
                "Oversized storage slot moved aside"
            );
        }

        // Atomic write: write to a sibling temp file then rename.
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, value.as_bytes()).map_err(|e| write_err(&tmp, e))?;

        std::fs::rename(&tmp, &path).map_err(|e| {
            // Clean up the temp file on failure; ignore any secondary error.
            let _ = std::fs::remove_file(&tmp);
            write_err(&path, e)
        })?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "Storage slot written");
        Ok(())
    }
}
