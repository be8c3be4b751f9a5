//! The editor shell: owns the core state and routes terminal input into it.
//!
//! Nothing here holds document state of its own. Key presses and clicks are
//! translated into `DocumentStore` / `FileTree` calls, and the status bar only
//! reads what `StatusPublisher` published.

use super::theme::UiTheme;
use crate::core::event::InputEvent;
use crate::kernel::{DocumentStore, StatusPublisher, StatusSnapshot};
use crate::models::{FileTree, FileTreeLoader};
use crate::services::{AppMessage, AsyncRuntime, EditorConfig, KeybindingService};
use crate::tui::{Clipboard, EventResult, FocusArea, View};
use ratatui::layout::Rect;
use ratatui::Frame;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};
use tokio::sync::watch;

mod input;
pub mod layout;
mod mouse;
pub mod notify;
mod render;
mod tick;

pub use notify::{Notification, Notifications, Severity};

/// Upper bound on the event-loop wait while reads are outstanding.
const PENDING_POLL: Duration = Duration::from_millis(20);

/// First visible line and column of the editor area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Viewport {
    top: usize,
    left: usize,
    /// Cleared by wheel scrolling so the next frame does not snap back to the
    /// cursor; set again by any cursor movement or edit.
    follow_cursor: bool,
}

pub struct Workbench {
    tree: FileTree,
    store: DocumentStore,
    status: StatusPublisher,
    status_rx: watch::Receiver<StatusSnapshot>,
    keybindings: KeybindingService,
    runtime: Option<AsyncRuntime>,
    runtime_rx: Receiver<AppMessage>,
    pending_opens: FxHashSet<PathBuf>,
    clipboard: Clipboard,
    notifications: Notifications,
    config: EditorConfig,
    theme: UiTheme,
    focus: FocusArea,
    show_sidebar: bool,
    edit_menu_open: bool,
    viewport: Viewport,
    explorer_top: usize,
    last_area: Option<Rect>,
    cursor: Option<(u16, u16)>,
    quit: bool,
}

impl Workbench {
    /// Reads files on a background runtime and exports copies over OSC52.
    pub fn new(
        root: &Path,
        config: EditorConfig,
        keybindings: KeybindingService,
    ) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let runtime = AsyncRuntime::new(tx)?;
        let mut theme = UiTheme::default();
        theme.adapt_to_terminal_capabilities();
        Ok(Self::assemble(
            root,
            config,
            keybindings,
            Some(runtime),
            rx,
            Clipboard::new(),
            theme,
        ))
    }

    /// Synchronous reads and an internal-only clipboard; nothing touches the
    /// terminal outside of `render`.
    pub fn headless(root: &Path, config: EditorConfig) -> Self {
        let (_tx, rx) = mpsc::channel();
        Self::assemble(
            root,
            config,
            KeybindingService::new(),
            None,
            rx,
            Clipboard::internal(),
            UiTheme::default(),
        )
    }

    fn assemble(
        root: &Path,
        config: EditorConfig,
        keybindings: KeybindingService,
        runtime: Option<AsyncRuntime>,
        runtime_rx: Receiver<AppMessage>,
        clipboard: Clipboard,
        theme: UiTheme,
    ) -> Self {
        let tree = FileTree::new(root, FileTreeLoader::new(config.show_hidden));
        let store = DocumentStore::new();
        let mut status = StatusPublisher::new(config.status_interval);
        status.refresh(&store);
        let status_rx = status.subscribe();

        let mut workbench = Self {
            tree,
            store,
            status,
            status_rx,
            keybindings,
            runtime,
            runtime_rx,
            pending_opens: FxHashSet::default(),
            clipboard,
            notifications: Notifications::new(),
            config,
            theme,
            focus: FocusArea::Editor,
            show_sidebar: true,
            edit_menu_open: false,
            viewport: Viewport {
                follow_cursor: true,
                ..Viewport::default()
            },
            explorer_top: 0,
            last_area: None,
            cursor: None,
            quit: false,
        };
        workbench.report_tree_errors(workbench.tree.root());
        workbench
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DocumentStore {
        &mut self.store
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn focus(&self) -> FocusArea {
        self.focus
    }

    pub fn sidebar_visible(&self) -> bool {
        self.show_sidebar
    }

    pub fn edit_menu_open(&self) -> bool {
        self.edit_menu_open
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn status(&self) -> StatusSnapshot {
        self.status_rx.borrow().clone()
    }

    pub fn is_pending(&self, path: &Path) -> bool {
        self.pending_opens.contains(path)
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// How long the event loop may block before `tick` has work to do.
    pub fn next_wakeup(&self, now: Instant) -> Duration {
        let mut wait = self.status.until_next(now);
        if let Some(expiry) = self.notifications.next_expiry() {
            wait = wait.min(expiry.saturating_duration_since(now));
        }
        if !self.pending_opens.is_empty() {
            wait = wait.min(PENDING_POLL);
        }
        wait
    }

    /// Opens `path` from the explorer or the command line. Already-open files
    /// are switched to; others are read off-loop when a runtime is present and
    /// become visible only once the read completes.
    pub fn open_path(&mut self, path: &Path) {
        if let Some(id) = self.store.find_by_path(path) {
            self.store.switch_to(id);
            self.focus = FocusArea::Editor;
            return;
        }

        let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        match &self.runtime {
            Some(runtime) => {
                if self.pending_opens.insert(resolved.clone()) {
                    tracing::debug!(path = %resolved.display(), "read queued");
                    runtime.load_file(resolved);
                }
            }
            None => match self.store.open(&resolved) {
                Ok(_) => self.focus = FocusArea::Editor,
                Err(err) => self.report_error(&err),
            },
        }
    }

    pub fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        self.notifications.push(severity, message, Instant::now());
    }

    pub(super) fn report_error(&mut self, err: &dyn std::error::Error) {
        tracing::warn!(error = %err, "operation failed");
        self.notify(Severity::Error, err.to_string());
    }

    /// Error children under `id` become notifications; the nodes stay in the
    /// tree so the listing remains usable around them.
    fn report_tree_errors(&mut self, id: crate::models::NodeId) {
        let messages: Vec<String> = self
            .tree
            .children(id)
            .iter()
            .filter_map(|&child| self.tree.get(child))
            .filter_map(|node| {
                let error = node.error.as_ref()?;
                Some(format!("{}: {}", node.path.display(), error))
            })
            .collect();
        for message in messages {
            tracing::warn!(%message, "directory entry unreadable");
            self.notify(Severity::Error, message);
        }
    }

    /// Line-number gutter width for the current surface, zero when disabled.
    fn gutter(&self) -> u16 {
        if self.config.show_line_numbers {
            layout::gutter_width(self.store.surface().len_lines())
        } else {
            0
        }
    }

    fn sync_status(&mut self) {
        if self.store.take_refresh_request() {
            self.viewport = Viewport {
                follow_cursor: true,
                ..Viewport::default()
            };
            self.status.refresh(&self.store);
        }
    }
}

impl View for Workbench {
    fn handle_input(&mut self, event: &InputEvent) -> EventResult {
        let result = input::handle_input(self, event);
        self.sync_status();
        result
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        render::render(self, frame, area);
    }

    fn cursor_position(&self) -> Option<(u16, u16)> {
        self.cursor
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/app/workbench.rs"]
mod tests;
