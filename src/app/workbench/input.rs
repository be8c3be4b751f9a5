use super::layout::{compute_layout, inset};
use super::{Severity, Workbench};
use crate::core::event::{InputEvent, Key, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crate::core::Command;
use crate::kernel::{CloseOutcome, TabDirection};
use crate::models::{NodeId, NodeKind};
use crate::tui::{EventResult, FocusArea};

const EXPLORER_PAGE: isize = 10;

pub(super) fn handle_input(workbench: &mut Workbench, event: &InputEvent) -> EventResult {
    match event {
        InputEvent::Key(key) => workbench.handle_key(key),
        InputEvent::Mouse(mouse) => workbench.handle_mouse(mouse),
        InputEvent::Paste(text) => workbench.handle_paste(text),
        InputEvent::Resize(..) => EventResult::Consumed,
        InputEvent::FocusGained | InputEvent::FocusLost => EventResult::Ignored,
    }
}

impl Workbench {
    /// Global bindings first, then the focused pane. Editor-only commands
    /// (cursor movement, Enter, ...) fall through to the explorer while it
    /// has focus so the same keys navigate the tree.
    fn handle_key(&mut self, event: &KeyEvent) -> EventResult {
        if event.kind == KeyEventKind::Release {
            return EventResult::Ignored;
        }
        if self.edit_menu_open {
            self.edit_menu_open = false;
            return EventResult::Consumed;
        }

        let key = Key::from(*event);
        if let Some(command) = self.keybindings.get(&key).cloned() {
            let explorer_owns = self.focus == FocusArea::Explorer && command.targets_editor();
            if !explorer_owns {
                return self.run_command(command);
            }
        }

        match self.focus {
            FocusArea::Explorer => self.handle_explorer_key(event),
            FocusArea::Editor => self.handle_editor_key(event),
        }
    }

    fn handle_editor_key(&mut self, event: &KeyEvent) -> EventResult {
        let chord = event.modifiers.contains(KeyModifiers::CONTROL)
            || event.modifiers.contains(KeyModifiers::ALT);
        match event.code {
            KeyCode::Char(ch) if !chord => self.run_command(Command::InsertChar(ch)),
            _ => EventResult::Ignored,
        }
    }

    fn handle_explorer_key(&mut self, event: &KeyEvent) -> EventResult {
        let visible = self.tree.flatten_for_view().len() as isize;
        match event.code {
            KeyCode::Up => self.tree.move_selection(-1),
            KeyCode::Down => self.tree.move_selection(1),
            KeyCode::PageUp => self.tree.move_selection(-EXPLORER_PAGE),
            KeyCode::PageDown => self.tree.move_selection(EXPLORER_PAGE),
            KeyCode::Home => self.tree.move_selection(-visible),
            KeyCode::End => self.tree.move_selection(visible),
            KeyCode::Right => self.expand_selected(),
            KeyCode::Left => self.collapse_selected(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.tree.selected() {
                    self.activate_node(id);
                }
            }
            _ => return EventResult::Ignored,
        }
        self.reveal_selection();
        EventResult::Consumed
    }

    /// Scrolls the explorer so the selected row is inside the last drawn area.
    fn reveal_selection(&mut self) {
        let Some(area) = self.last_area else {
            return;
        };
        let layout = compute_layout(area, self.show_sidebar, self.config.explorer_width_percent);
        let Some(sidebar) = layout.sidebar else {
            return;
        };
        let height = inset(sidebar).height as usize;
        let Some(selected) = self.tree.selected() else {
            return;
        };
        let Some(index) = self
            .tree
            .flatten_for_view()
            .iter()
            .position(|row| row.id == selected)
        else {
            return;
        };
        if index < self.explorer_top {
            self.explorer_top = index;
        } else if height > 0 && index >= self.explorer_top + height {
            self.explorer_top = index + 1 - height;
        }
    }

    fn expand_selected(&mut self) {
        let Some(id) = self.tree.selected() else {
            return;
        };
        if self.tree.get(id).map(|n| n.kind) != Some(NodeKind::Directory) {
            return;
        }
        if self.tree.is_open(id) {
            self.tree.move_selection(1);
        } else {
            self.toggle_dir(id);
        }
    }

    fn collapse_selected(&mut self) {
        let Some(id) = self.tree.selected() else {
            return;
        };
        let is_dir = self.tree.get(id).map(|n| n.kind) == Some(NodeKind::Directory);
        if is_dir && self.tree.is_open(id) {
            self.tree.collapse(id);
        } else if let Some(parent) = self.tree.parent(id).filter(|&p| p != self.tree.root()) {
            self.tree.set_selected(Some(parent));
        }
    }

    /// Enter on a tree row, or a click on it.
    pub(super) fn activate_node(&mut self, id: NodeId) {
        let Some(node) = self.tree.get(id).cloned() else {
            return;
        };
        match node.kind {
            NodeKind::Directory => self.toggle_dir(id),
            NodeKind::File => self.open_path(&node.path),
            NodeKind::Error => {
                let message = node.error.unwrap_or_default();
                self.notify(Severity::Error, format!("{}: {message}", node.name));
            }
            NodeKind::Placeholder => {}
        }
    }

    fn toggle_dir(&mut self, id: NodeId) {
        match self.tree.toggle(id) {
            Ok(Some(_)) => self.report_tree_errors(id),
            Ok(None) => {}
            Err(err) => self.report_error(&err),
        }
    }

    pub(super) fn run_command(&mut self, command: Command) -> EventResult {
        tracing::trace!(command = command.name(), "run command");
        match command {
            Command::NewFile => {
                self.store.create_untitled();
                self.focus = FocusArea::Editor;
            }
            Command::CloseTab => self.close_active_tab(),
            Command::PrevTab => {
                self.store.navigate(TabDirection::Previous);
            }
            Command::NextTab => {
                self.store.navigate(TabDirection::Next);
            }
            Command::Save => self.notify(Severity::Info, "Save functionality coming soon!"),
            Command::Quit => {
                self.quit = true;
                return EventResult::Quit;
            }
            Command::Undo => {
                if self.store.surface_mut().undo() {
                    self.viewport.follow_cursor = true;
                } else {
                    self.notify(Severity::Warning, "Undo not available");
                }
            }
            Command::Redo => {
                if self.store.surface_mut().redo() {
                    self.viewport.follow_cursor = true;
                } else {
                    self.notify(Severity::Warning, "Redo not available");
                }
            }
            Command::Cut => self.cut(),
            Command::Copy => self.copy(),
            Command::Paste => self.paste(),
            Command::SelectAll => {
                self.store.surface_mut().select_all();
                self.notify(Severity::Info, "Selected all text");
            }
            Command::ClearSelection => self.store.surface_mut().clear_selection(),
            Command::ToggleSidebar => {
                self.show_sidebar = !self.show_sidebar;
                if !self.show_sidebar && self.focus == FocusArea::Explorer {
                    self.focus = FocusArea::Editor;
                }
            }
            Command::FocusExplorer => {
                self.show_sidebar = true;
                self.focus = FocusArea::Explorer;
            }
            Command::FocusEditor => self.focus = FocusArea::Editor,
            Command::Custom(name) => {
                tracing::warn!(command = %name, "unknown command");
                self.notify(Severity::Warning, format!("Unknown command: {name}"));
            }
            other => self.edit_surface(&other),
        }
        EventResult::Consumed
    }

    fn edit_surface(&mut self, command: &Command) {
        let tab = self.config.tab_text();
        let surface = self.store.surface_mut();
        match command {
            Command::CursorLeft => surface.move_left(false),
            Command::CursorRight => surface.move_right(false),
            Command::CursorUp => surface.move_up(false),
            Command::CursorDown => surface.move_down(false),
            Command::CursorLineStart => surface.move_line_start(false),
            Command::CursorLineEnd => surface.move_line_end(false),
            Command::CursorFileStart => surface.move_file_start(false),
            Command::CursorFileEnd => surface.move_file_end(false),
            Command::SelectLeft => surface.move_left(true),
            Command::SelectRight => surface.move_right(true),
            Command::SelectUp => surface.move_up(true),
            Command::SelectDown => surface.move_down(true),
            Command::InsertChar(ch) => surface.insert_char(*ch),
            Command::InsertNewline => surface.insert_newline(),
            Command::InsertTab => surface.insert_str(&tab),
            Command::DeleteBackward => {
                surface.backspace();
            }
            Command::DeleteForward => {
                surface.delete_forward();
            }
            _ => return,
        }
        self.viewport.follow_cursor = true;
    }

    fn close_active_tab(&mut self) {
        let name = self
            .store
            .active_document()
            .map(|doc| doc.display_name().to_string());
        match self.store.close_active() {
            CloseOutcome::WelcomeReset => self.notify(Severity::Info, "Welcome tab cleared"),
            CloseOutcome::Closed { .. } => {
                if let Some(name) = name {
                    self.notify(Severity::Info, format!("Closed {name}"));
                }
            }
            CloseOutcome::NotOpen => {}
        }
    }

    /// Copies the selection, or the whole current line when nothing is
    /// selected.
    fn copy(&mut self) {
        let surface = self.store.surface();
        let (text, message) = match surface.selected_text() {
            Some(text) => (text, "Copied to clipboard"),
            None => {
                let mut line = surface.line_text(surface.cursor().0).unwrap_or_default();
                line.push('\n');
                (line, "Copied line to clipboard")
            }
        };
        self.export_to_clipboard(&text, message);
    }

    fn cut(&mut self) {
        let surface = self.store.surface_mut();
        let message = if surface.has_selection() {
            "Cut to clipboard"
        } else {
            let row = surface.cursor().0;
            surface.select_line(row);
            "Cut line to clipboard"
        };
        let Some(text) = surface.selected_text() else {
            return;
        };
        surface.delete_selection();
        self.viewport.follow_cursor = true;
        self.export_to_clipboard(&text, message);
    }

    fn paste(&mut self) {
        let text = self.clipboard.contents().to_string();
        if text.is_empty() {
            self.notify(Severity::Warning, "Clipboard is empty");
            return;
        }
        self.store.surface_mut().insert_str(&text);
        self.viewport.follow_cursor = true;
        self.notify(Severity::Info, "Pasted from clipboard");
    }

    fn export_to_clipboard(&mut self, text: &str, message: &str) {
        match self.clipboard.copy(text) {
            Ok(()) => self.notify(Severity::Info, message),
            Err(err) => {
                tracing::warn!(error = %err, "clipboard export failed");
                self.notify(Severity::Warning, format!("{message} (terminal: {err})"));
            }
        }
    }

    /// Bracketed paste from the terminal, independent of the internal register.
    fn handle_paste(&mut self, text: &str) -> EventResult {
        if self.focus != FocusArea::Editor {
            return EventResult::Ignored;
        }
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.store.surface_mut().insert_str(&normalized);
        self.viewport.follow_cursor = true;
        EventResult::Consumed
    }
}
