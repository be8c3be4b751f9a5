//! Data models: documents, the shared text surface and the directory tree.

pub mod document;
pub mod file_tree;
pub mod safe_id;
pub mod text_buffer;

pub use document::{Document, DocumentId, UNTITLED_PREFIX};
pub use file_tree::{
    file_icon, is_hidden, ExpandReport, FileTree, FileTreeError, FileTreeLoader, FileTreeRow,
    LoadState, NodeId, NodeKind, TreeNode,
};
pub use safe_id::{safe_id, SafeIdAllocator};
pub use text_buffer::TextBuffer;
