//! Lazily loaded directory tree.
//!
//! Nodes live in a slotmap arena. A directory is either `Unexpanded`, in which
//! case it owns exactly one synthetic placeholder child so the view can draw an
//! expand affordance, or `Expanded` with the real listing. Expansion is a
//! one-way transition; nothing is ever re-scanned.

use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use std::{
    cmp::Ordering,
    fmt, fs, io,
    path::{Path, PathBuf},
};

new_key_type! { pub struct NodeId; }

const PLACEHOLDER_LABEL: &str = "Loading...";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
    Placeholder,
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Unexpanded,
    Expanded,
}

#[derive(Debug)]
pub enum FileTreeError {
    InvalidNodeId,
    NotADirectory,
}

impl fmt::Display for FileTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileTreeError::InvalidNodeId => write!(f, "invalid node id"),
            FileTreeError::NotADirectory => write!(f, "node is not a directory"),
        }
    }
}

impl std::error::Error for FileTreeError {}

/// One entry of a listing, detached from any arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub path: PathBuf,
    pub name: String,
    pub kind: NodeKind,
    pub error: Option<String>,
}

impl TreeNode {
    pub fn file(path: PathBuf) -> Self {
        let name = display_name(&path);
        Self {
            path,
            name,
            kind: NodeKind::File,
            error: None,
        }
    }

    pub fn directory(path: PathBuf) -> Self {
        let name = display_name(&path);
        Self {
            path,
            name,
            kind: NodeKind::Directory,
            error: None,
        }
    }

    pub fn placeholder(parent: &Path) -> Self {
        Self {
            path: parent.to_path_buf(),
            name: PLACEHOLDER_LABEL.to_string(),
            kind: NodeKind::Placeholder,
            error: None,
        }
    }

    pub fn error(path: PathBuf, message: String) -> Self {
        let name = display_name(&path);
        Self {
            path,
            name,
            kind: NodeKind::Error,
            error: Some(message),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .or_else(|| path.iter().next_back())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn describe_io_error(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::PermissionDenied => "Permission Denied".to_string(),
        io::ErrorKind::NotFound => "Not Found".to_string(),
        _ => err.to_string(),
    }
}

/// Produces the direct children of a directory, sorted directories first and
/// then case-insensitively by name. Failures never escape: an unreadable
/// directory yields a single `Error` node, an unclassifiable child becomes an
/// `Error` node in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTreeLoader {
    show_hidden: bool,
}

impl FileTreeLoader {
    pub fn new(show_hidden: bool) -> Self {
        Self { show_hidden }
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    pub fn expand(&self, path: &Path) -> Vec<TreeNode> {
        let read_dir = match fs::read_dir(path) {
            Ok(rd) => rd,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "directory listing failed");
                return vec![TreeNode::error(path.to_path_buf(), describe_io_error(&e))];
            }
        };

        let mut nodes = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "directory entry failed");
                    nodes.push(TreeNode::error(path.to_path_buf(), describe_io_error(&e)));
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            if !self.show_hidden && is_hidden(&name) {
                continue;
            }

            nodes.push(classify(entry.path()));
        }

        nodes.sort_by(compare_nodes);
        nodes
    }
}

fn classify(path: PathBuf) -> TreeNode {
    match fs::metadata(&path) {
        Ok(meta) if meta.is_dir() => TreeNode::directory(path),
        Ok(_) => TreeNode::file(path),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot classify entry");
            let message = describe_io_error(&e);
            TreeNode::error(path, message)
        }
    }
}

fn compare_nodes(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

#[derive(Debug, Clone)]
enum DirState {
    Unexpanded { placeholder: NodeId },
    Expanded(Vec<NodeId>),
}

#[derive(Debug, Clone)]
struct Node {
    entry: TreeNode,
    parent: Option<NodeId>,
    dir: Option<DirState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandReport {
    pub children: usize,
    pub errors: Vec<String>,
    pub already_expanded: bool,
}

#[derive(Debug, Clone)]
pub struct FileTreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub name: String,
    pub kind: NodeKind,
    pub is_open: bool,
    pub error: Option<String>,
}

pub struct FileTree {
    arena: SlotMap<NodeId, Node>,
    root: NodeId,
    open: FxHashSet<NodeId>,
    selected: Option<NodeId>,
    loader: FileTreeLoader,
}

impl FileTree {
    /// Builds the tree for `root_path` and expands the root. Never fails: a
    /// missing or unreadable root ends up with a single error child.
    pub fn new(root_path: &Path, loader: FileTreeLoader) -> Self {
        let absolute_root = root_path
            .canonicalize()
            .unwrap_or_else(|_| root_path.to_path_buf());

        let mut arena = SlotMap::with_key();
        let root = arena.insert(Node {
            entry: TreeNode::directory(absolute_root),
            parent: None,
            dir: None,
        });

        let mut tree = Self {
            arena,
            root,
            open: FxHashSet::default(),
            selected: None,
            loader,
        };
        tree.attach_placeholder(root);
        if let Ok(report) = tree.expand(root) {
            tracing::debug!(
                children = report.children,
                errors = report.errors.len(),
                "root expanded"
            );
        }
        tree.open.insert(root);
        tree.selected = tree.first_visible();
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_path(&self) -> &Path {
        &self.arena[self.root].entry.path
    }

    pub fn loader(&self) -> FileTreeLoader {
        self.loader
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.arena.get(id).map(|n| &n.entry)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.parent)
    }

    pub fn path(&self, id: NodeId) -> Option<&Path> {
        self.get(id).map(|n| n.path.as_path())
    }

    pub fn load_state(&self, id: NodeId) -> Option<LoadState> {
        self.arena.get(id)?.dir.as_ref().map(|state| match state {
            DirState::Unexpanded { .. } => LoadState::Unexpanded,
            DirState::Expanded(_) => LoadState::Expanded,
        })
    }

    /// Children as currently materialized: the lone placeholder for an
    /// unexpanded directory, the listing for an expanded one.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.arena.get(id).and_then(|n| n.dir.as_ref()) {
            Some(DirState::Unexpanded { placeholder }) => std::slice::from_ref(placeholder),
            Some(DirState::Expanded(children)) => children,
            None => &[],
        }
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn set_selected(&mut self, id: Option<NodeId>) {
        self.selected = id.filter(|id| self.arena.contains_key(*id));
    }

    pub fn is_open(&self, id: NodeId) -> bool {
        self.open.contains(&id)
    }

    fn attach_placeholder(&mut self, id: NodeId) {
        let Some(path) = self.get(id).map(|n| n.path.clone()) else {
            return;
        };
        let placeholder = self.arena.insert(Node {
            entry: TreeNode::placeholder(&path),
            parent: Some(id),
            dir: None,
        });
        if let Some(node) = self.arena.get_mut(id) {
            node.dir = Some(DirState::Unexpanded { placeholder });
        }
    }

    fn insert_entry(&mut self, parent: NodeId, entry: TreeNode) -> NodeId {
        let is_dir = entry.is_dir();
        let id = self.arena.insert(Node {
            entry,
            parent: Some(parent),
            dir: None,
        });
        if is_dir {
            self.attach_placeholder(id);
        }
        id
    }

    /// Replaces the placeholder of an unexpanded directory with its listing.
    pub fn expand(&mut self, id: NodeId) -> Result<ExpandReport, FileTreeError> {
        let node = self.arena.get(id).ok_or(FileTreeError::InvalidNodeId)?;
        let placeholder = match &node.dir {
            None => return Err(FileTreeError::NotADirectory),
            Some(DirState::Expanded(children)) => {
                return Ok(ExpandReport {
                    children: children.len(),
                    errors: Vec::new(),
                    already_expanded: true,
                })
            }
            Some(DirState::Unexpanded { placeholder }) => *placeholder,
        };
        let path = node.entry.path.clone();

        self.arena.remove(placeholder);
        if self.selected == Some(placeholder) {
            self.selected = Some(id);
        }

        let entries = self.loader.expand(&path);
        let mut report = ExpandReport::default();
        let mut children = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(message) = &entry.error {
                report.errors.push(format!("{}: {}", entry.name, message));
            }
            children.push(self.insert_entry(id, entry));
        }
        report.children = children.len();

        if let Some(node) = self.arena.get_mut(id) {
            node.dir = Some(DirState::Expanded(children));
        }
        tracing::debug!(path = %path.display(), children = report.children, "expanded");
        Ok(report)
    }

    /// Opens a closed directory (expanding it on first use) or closes an open
    /// one. Returns the expansion report when a listing was loaded.
    pub fn toggle(&mut self, id: NodeId) -> Result<Option<ExpandReport>, FileTreeError> {
        if self.is_open(id) {
            self.collapse(id);
            return Ok(None);
        }
        self.open_dir(id)
    }

    pub fn open_dir(&mut self, id: NodeId) -> Result<Option<ExpandReport>, FileTreeError> {
        let report = self.expand(id)?;
        self.open.insert(id);
        Ok((!report.already_expanded).then_some(report))
    }

    pub fn collapse(&mut self, id: NodeId) {
        if id != self.root {
            self.open.remove(&id);
        }
    }

    pub fn flatten_for_view(&self) -> Vec<FileTreeRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = self
            .children(self.root)
            .iter()
            .rev()
            .map(|&id| (id, 0))
            .collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            let is_open = self.open.contains(&id);
            rows.push(FileTreeRow {
                id,
                depth,
                name: node.entry.name.clone(),
                kind: node.entry.kind,
                is_open,
                error: node.entry.error.clone(),
            });

            if is_open {
                for &child in self.children(id).iter().rev() {
                    stack.push((child, depth.saturating_add(1)));
                }
            }
        }

        rows
    }

    fn first_visible(&self) -> Option<NodeId> {
        self.flatten_for_view().first().map(|row| row.id)
    }

    /// Moves the selection by `delta` visible rows, clamped to the ends.
    pub fn move_selection(&mut self, delta: isize) {
        let rows = self.flatten_for_view();
        if rows.is_empty() {
            self.selected = None;
            return;
        }
        let current = self
            .selected
            .and_then(|sel| rows.iter().position(|r| r.id == sel))
            .unwrap_or(0);
        let next = (current as isize + delta).clamp(0, rows.len() as isize - 1) as usize;
        self.selected = Some(rows[next].id);
    }
}

pub fn file_icon(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "py" => "🐍",
        "js" | "jsx" => "📜",
        "ts" | "tsx" => "📘",
        "html" | "htm" => "🌐",
        "css" | "scss" | "sass" => "🎨",
        "json" => "📋",
        "md" | "markdown" => "📝",
        "txt" => "📃",
        "toml" | "yml" | "yaml" | "ini" | "cfg" | "conf" => "🔧",
        "zip" | "tar" | "gz" | "rar" | "7z" => "📦",
        "exe" | "app" | "deb" | "rpm" => "⚡",
        _ => "📄",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
