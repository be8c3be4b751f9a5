use super::layout::{
    column_at, compute_layout, contains, edit_menu_area, edit_menu_row_at, inset,
    menu_hits, tab_strip, MenuTarget, TabTarget, WorkbenchLayout, EDIT_MENU,
};
use super::{Severity, Workbench};
use crate::core::event::{MouseButton, MouseEvent, MouseEventKind};
use crate::core::Command;
use crate::tui::{EventResult, FocusArea};
use ratatui::layout::Rect;

const SCROLL_STEP: isize = 3;

impl Workbench {
    /// Clicks are resolved against the geometry of the last rendered frame.
    pub(super) fn handle_mouse(&mut self, event: &MouseEvent) -> EventResult {
        let Some(area) = self.last_area else {
            return EventResult::Ignored;
        };
        let layout = compute_layout(area, self.show_sidebar, self.config.explorer_width_percent);
        let (column, row) = (event.column, event.row);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.handle_click(area, &layout, column, row)
            }
            MouseEventKind::ScrollUp => self.scroll_at(&layout, column, row, -SCROLL_STEP),
            MouseEventKind::ScrollDown => self.scroll_at(&layout, column, row, SCROLL_STEP),
            _ => EventResult::Ignored,
        }
    }

    fn handle_click(
        &mut self,
        screen: Rect,
        layout: &WorkbenchLayout,
        column: u16,
        row: u16,
    ) -> EventResult {
        if self.edit_menu_open {
            self.edit_menu_open = false;
            let menu = edit_menu_area(screen, layout.header);
            let entry = edit_menu_row_at(menu, column, row)
                .and_then(|index| EDIT_MENU.get(index).cloned().flatten());
            if let Some((_, _, command)) = entry {
                self.focus = FocusArea::Editor;
                return self.run_command(command);
            }
            return EventResult::Consumed;
        }

        if contains(layout.header, column, row) {
            return self.click_header(layout.header, column, row);
        }
        if contains(layout.tabs, column, row) {
            return self.click_tabs(layout.tabs, column, row);
        }
        if let Some(sidebar) = layout.sidebar.filter(|s| contains(*s, column, row)) {
            self.focus = FocusArea::Explorer;
            self.click_explorer(sidebar, column, row);
            return EventResult::Consumed;
        }
        if contains(layout.editor, column, row) {
            self.focus = FocusArea::Editor;
            self.click_editor(layout.editor, column, row);
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    fn click_header(&mut self, header: Rect, column: u16, row: u16) -> EventResult {
        let Some((_, _, target)) = menu_hits(header)
            .into_iter()
            .find(|(rect, _, _)| contains(*rect, column, row))
        else {
            return EventResult::Ignored;
        };
        match target {
            MenuTarget::File => self.notify(Severity::Info, "File menu - coming soon!"),
            MenuTarget::Edit => self.edit_menu_open = true,
        }
        EventResult::Consumed
    }

    fn click_tabs(&mut self, tabs_area: Rect, column: u16, row: u16) -> EventResult {
        let tabs = self.store.tabs();
        let Some(slot) = tab_strip(tabs_area, &tabs)
            .into_iter()
            .find(|slot| contains(slot.area, column, row))
        else {
            return EventResult::Ignored;
        };
        match slot.target {
            TabTarget::Document(id) => {
                self.store.switch_to(id);
                self.focus = FocusArea::Editor;
            }
            TabTarget::NewTab => return self.run_command(Command::NewFile),
            TabTarget::Welcome => self.focus = FocusArea::Editor,
        }
        EventResult::Consumed
    }

    fn click_explorer(&mut self, sidebar: Rect, column: u16, row: u16) {
        let inner = inset(sidebar);
        if !contains(inner, column, row) {
            return;
        }
        let index = self.explorer_top + (row - inner.y) as usize;
        let Some(id) = self.tree.flatten_for_view().get(index).map(|r| r.id) else {
            return;
        };
        self.tree.set_selected(Some(id));
        self.activate_node(id);
    }

    fn click_editor(&mut self, editor: Rect, column: u16, row: u16) {
        let text_x = editor.x + self.gutter();
        let surface = self.store.surface();
        let target_row = self.viewport.top + (row - editor.y) as usize;
        if target_row >= surface.len_lines() {
            let last = surface.len_lines().saturating_sub(1);
            let end = surface.line_len(last);
            self.store.surface_mut().set_cursor(last, end);
        } else {
            let line = surface.line_text(target_row).unwrap_or_default();
            let cells = column.saturating_sub(text_x) as usize;
            let col = column_at(&line, self.viewport.left, cells);
            self.store.surface_mut().set_cursor(target_row, col);
        }
        self.viewport.follow_cursor = true;
    }

    fn scroll_at(
        &mut self,
        layout: &WorkbenchLayout,
        column: u16,
        row: u16,
        delta: isize,
    ) -> EventResult {
        if contains(layout.editor, column, row) {
            let max = self.store.surface().len_lines().saturating_sub(1);
            self.viewport.top = offset(self.viewport.top, delta, max);
            self.viewport.follow_cursor = false;
            return EventResult::Consumed;
        }
        if layout.sidebar.is_some_and(|s| contains(s, column, row)) {
            let max = self.tree.flatten_for_view().len().saturating_sub(1);
            self.explorer_top = offset(self.explorer_top, delta, max);
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }
}

fn offset(value: usize, delta: isize, max: usize) -> usize {
    value.saturating_add_signed(delta).min(max)
}
