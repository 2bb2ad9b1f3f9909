// Sayaç CRM - app/notes.rs
//
// Free-text scratchpad ("Hızlı Notlar") kept in its own storage slot,
// independent of the record list. Saved on every change.

use crate::app::store::StorageBackend;
use crate::util::constants::NOTES_KEY;
use crate::util::error::StorageError;

/// The notes scratchpad bound to a storage backend.
#[derive(Debug)]
pub struct NotesPad<B: StorageBackend> {
    backend: B,
    text: String,
}

impl<B: StorageBackend> NotesPad<B> {
    /// Open the pad, reading the stored text (empty when absent).
    pub fn open(backend: B) -> Self {
        let text = backend.get(NOTES_KEY).unwrap_or_default();
        tracing::debug!(chars = text.chars().count(), "Notes loaded");
        Self { backend, text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the whole text and save it.
    pub fn set(&mut self, text: impl Into<String>) -> Result<(), StorageError> {
        self.text = text.into();
        self.backend.set(NOTES_KEY, &self.text)
    }

    /// Append a line (newline-separated from existing text) and save.
    pub fn append_line(&mut self, line: &str) -> Result<(), StorageError> {
        let mut text = std::mem::take(&mut self.text);
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(line);
        self.set(text)
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}
