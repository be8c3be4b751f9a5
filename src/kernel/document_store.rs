//! Open documents, tab order and the active-document pointer.
//!
//! The store owns the single shared `TextBuffer`. Whatever document is active
//! lives in that buffer while it is active; its `Document` entry only gets the
//! content back when it is left (`switch_to`, `close`). When no tab is open a
//! built-in welcome page is shown instead.

use crate::models::{safe_id, Document, DocumentId, SafeIdAllocator, TextBuffer};
use crate::services::file::{decode_text, FileError, FileProvider, LocalFileProvider};
use ropey::Rope;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const WELCOME_TITLE: &str = "Welcome";
pub const WELCOME_TEXT: &str =
    "Welcome to Text Editor!\n\nPress Ctrl+N for new file or select a file from the tree.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActiveDocument {
    Welcome,
    Document(DocumentId),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TabDirection {
    Previous,
    Next,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed { now_active: ActiveDocument },
    /// The welcome page was active; its text was restored instead.
    WelcomeReset,
    NotOpen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub id: DocumentId,
    pub safe_id: String,
    pub title: String,
    pub dirty: bool,
    pub active: bool,
}

pub struct DocumentStore {
    documents: SlotMap<DocumentId, Document>,
    tab_order: Vec<DocumentId>,
    active: ActiveDocument,
    surface: TextBuffer,
    by_path: FxHashMap<PathBuf, DocumentId>,
    untitled_counter: u64,
    ids: SafeIdAllocator,
    provider: Arc<dyn FileProvider>,
    refresh_requested: bool,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::with_provider(Arc::new(LocalFileProvider::new()))
    }

    pub fn with_provider(provider: Arc<dyn FileProvider>) -> Self {
        let mut store = Self {
            documents: SlotMap::with_key(),
            tab_order: Vec::new(),
            active: ActiveDocument::Welcome,
            surface: TextBuffer::new(),
            by_path: FxHashMap::default(),
            untitled_counter: 0,
            ids: SafeIdAllocator::new(),
            provider,
            refresh_requested: false,
        };
        store.show_welcome();
        store
    }

    // Queries

    pub fn active(&self) -> ActiveDocument {
        self.active
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        match self.active {
            ActiveDocument::Document(id) => Some(id),
            ActiveDocument::Welcome => None,
        }
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.active_id().and_then(|id| self.documents.get(id))
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.documents.contains_key(id)
    }

    pub fn tab_order(&self) -> &[DocumentId] {
        &self.tab_order
    }

    pub fn len(&self) -> usize {
        self.tab_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tab_order.is_empty()
    }

    pub fn surface(&self) -> &TextBuffer {
        &self.surface
    }

    /// The shared editing surface. Edits land on the active document.
    pub fn surface_mut(&mut self) -> &mut TextBuffer {
        &mut self.surface
    }

    /// Current text of `id`, read from the surface when `id` is active.
    pub fn text_of(&self, id: DocumentId) -> Option<String> {
        let doc = self.documents.get(id)?;
        if self.active == ActiveDocument::Document(id) {
            Some(self.surface.text())
        } else {
            Some(doc.content().to_string())
        }
    }

    pub fn is_dirty(&self, id: DocumentId) -> bool {
        let Some(doc) = self.documents.get(id) else {
            return false;
        };
        if self.active == ActiveDocument::Document(id) {
            doc.diverges(self.surface.rope())
        } else {
            doc.is_dirty()
        }
    }

    pub fn is_active_dirty(&self) -> bool {
        self.active_id().is_some_and(|id| self.is_dirty(id))
    }

    pub fn tabs(&self) -> Vec<TabInfo> {
        self.tab_order
            .iter()
            .filter_map(|&id| {
                let doc = self.documents.get(id)?;
                Some(TabInfo {
                    id,
                    safe_id: doc.safe_id().to_string(),
                    title: doc.display_name().to_string(),
                    dirty: self.is_dirty(id),
                    active: self.active == ActiveDocument::Document(id),
                })
            })
            .collect()
    }

    pub fn find_by_safe_id(&self, safe_id: &str) -> Option<DocumentId> {
        self.tab_order
            .iter()
            .copied()
            .find(|&id| self.documents.get(id).is_some_and(|d| d.safe_id() == safe_id))
    }

    /// Looks up an open document by path, resolving it first when possible.
    pub fn find_by_path(&self, path: &Path) -> Option<DocumentId> {
        let resolved = self
            .provider
            .canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf());
        self.by_path.get(&resolved).copied()
    }

    /// Set whenever the active document changed; cleared by the reader.
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    // Operations

    pub fn create_untitled(&mut self) -> DocumentId {
        self.untitled_counter += 1;
        let number = self.untitled_counter;
        let safe_id = self.allocate_safe_id(&format!("{}{number}", crate::models::UNTITLED_PREFIX));
        let id = self.documents.insert(Document::untitled(safe_id, number));
        self.tab_order.push(id);
        tracing::debug!(number, "untitled document created");
        self.switch_to(id);
        id
    }

    /// Opens `path`, or switches to it when it is already open. Nothing is
    /// created when the read or decode fails.
    pub fn open(&mut self, path: &Path) -> Result<DocumentId, FileError> {
        let resolved = self.provider.canonicalize(path)?;
        if let Some(id) = self.by_path.get(&resolved).copied() {
            self.switch_to(id);
            return Ok(id);
        }
        let text = self.provider.read_text(&resolved)?;
        Ok(self.insert_loaded(resolved, &text))
    }

    /// Second half of an off-loop open: `bytes` were read from `path`
    /// elsewhere and the document becomes visible only now.
    pub fn finish_open(&mut self, path: &Path, bytes: Vec<u8>) -> Result<DocumentId, FileError> {
        let resolved = self
            .provider
            .canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf());
        if let Some(id) = self.by_path.get(&resolved).copied() {
            self.switch_to(id);
            return Ok(id);
        }
        let text = decode_text(&resolved, bytes)?;
        Ok(self.insert_loaded(resolved, &text))
    }

    fn insert_loaded(&mut self, resolved: PathBuf, text: &str) -> DocumentId {
        let name = resolved
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| resolved.display().to_string());
        let safe_id = self.allocate_safe_id(&name);
        let id = self
            .documents
            .insert(Document::from_file(safe_id, resolved.clone(), text));
        self.by_path.insert(resolved.clone(), id);
        self.tab_order.push(id);
        tracing::debug!(path = %resolved.display(), "document opened");
        self.switch_to(id);
        id
    }

    fn allocate_safe_id(&self, display_name: &str) -> String {
        let candidate = safe_id(display_name);
        let id = self.ids.allocate(display_name, |c| self.find_by_safe_id(c).is_some());
        if id != candidate {
            tracing::debug!(%candidate, %id, "safe id collision resolved");
        }
        id
    }

    /// Makes `id` active. The outgoing document receives the surface's live
    /// content first, so a switch never loses edits. Returns false for an
    /// unknown id.
    pub fn switch_to(&mut self, id: DocumentId) -> bool {
        if !self.documents.contains_key(id) {
            tracing::warn!(?id, "switch to unknown document ignored");
            return false;
        }
        if self.active == ActiveDocument::Document(id) {
            return true;
        }

        self.write_back_active();
        self.active = ActiveDocument::Document(id);
        if let Some(doc) = self.documents.get(id) {
            self.surface.load(doc.content().clone(), doc.cursor());
        }
        self.refresh_requested = true;
        true
    }

    fn write_back_active(&mut self) {
        if let ActiveDocument::Document(current) = self.active {
            if let Some(doc) = self.documents.get_mut(current) {
                doc.write_back(self.surface.rope().clone(), self.surface.cursor());
            }
        }
    }

    fn show_welcome(&mut self) {
        self.active = ActiveDocument::Welcome;
        self.surface.load(Rope::from_str(WELCOME_TEXT), (0, 0));
        self.refresh_requested = true;
    }

    /// Removes `id`. When it was active, the tab that followed it takes over
    /// (or the new last tab); with no tabs left the welcome page is shown.
    pub fn close(&mut self, id: DocumentId) -> CloseOutcome {
        let Some(pos) = self.tab_order.iter().position(|&t| t == id) else {
            return CloseOutcome::NotOpen;
        };
        self.tab_order.remove(pos);
        if let Some(doc) = self.documents.remove(id) {
            if let Some(path) = doc.source_path() {
                self.by_path.remove(path);
            }
            tracing::debug!(name = doc.display_name(), "document closed");
        }

        if self.active == ActiveDocument::Document(id) {
            if self.tab_order.is_empty() {
                self.show_welcome();
            } else {
                let next = self.tab_order[pos.min(self.tab_order.len() - 1)];
                self.switch_to(next);
            }
        }

        CloseOutcome::Closed {
            now_active: self.active,
        }
    }

    pub fn close_active(&mut self) -> CloseOutcome {
        match self.active {
            ActiveDocument::Document(id) => self.close(id),
            ActiveDocument::Welcome => {
                self.show_welcome();
                CloseOutcome::WelcomeReset
            }
        }
    }

    /// Cycles through the tab order with wraparound. Returns false when there
    /// is nothing to move to.
    pub fn navigate(&mut self, direction: TabDirection) -> bool {
        let len = self.tab_order.len();
        if len <= 1 {
            return false;
        }
        let current = self
            .active_id()
            .and_then(|id| self.tab_order.iter().position(|&t| t == id))
            .unwrap_or(0);
        let next = match direction {
            TabDirection::Next => (current + 1) % len,
            TabDirection::Previous => (current + len - 1) % len,
        };
        let target = self.tab_order[next];
        self.switch_to(target)
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/document_store.rs"]
mod tests;
