//! Open documents.

use ropey::Rope;
use slotmap::new_key_type;
use std::path::{Path, PathBuf};

new_key_type! { pub struct DocumentId; }

pub const UNTITLED_PREFIX: &str = "Untitled-";

#[derive(Debug, Clone)]
pub struct Document {
    safe_id: String,
    display_name: String,
    source_path: Option<PathBuf>,
    content: Rope,
    pristine: Rope,
    dirty: bool,
    cursor: (usize, usize),
}

impl Document {
    /// Unsaved scratch document. It has no on-disk state to match, so it is
    /// born dirty.
    pub fn untitled(safe_id: String, number: u64) -> Self {
        Self {
            safe_id,
            display_name: format!("{UNTITLED_PREFIX}{number}"),
            source_path: None,
            content: Rope::new(),
            pristine: Rope::new(),
            dirty: true,
            cursor: (0, 0),
        }
    }

    pub fn from_file(safe_id: String, path: PathBuf, text: &str) -> Self {
        let display_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let content = Rope::from_str(text);
        Self {
            safe_id,
            display_name,
            source_path: Some(path),
            pristine: content.clone(),
            content,
            dirty: false,
            cursor: (0, 0),
        }
    }

    pub fn safe_id(&self) -> &str {
        &self.safe_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn content(&self) -> &Rope {
        &self.content
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_untitled(&self) -> bool {
        self.source_path.is_none()
    }

    /// Whether `live` differs from what was loaded. Untitled documents stay
    /// dirty regardless.
    pub fn diverges(&self, live: &Rope) -> bool {
        self.is_untitled() || *live != self.pristine
    }

    /// Stores the surface state captured when this document is left.
    pub fn write_back(&mut self, content: Rope, cursor: (usize, usize)) {
        self.dirty = self.diverges(&content);
        self.content = content;
        self.cursor = cursor;
    }
}
