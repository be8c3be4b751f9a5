use super::layout::{
    cells_between, char_cells, compute_layout, edit_menu_area, inset, menu_hits,
    tab_strip, MenuTarget, TabTarget, EDIT_MENU, EDIT_MENU_WIDTH,
};
use super::{Notification, Severity, Workbench};
use crate::models::{file_icon, NodeKind};
use crate::tui::FocusArea;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

const TITLE: &str = "Text Editor";
const TOAST_HEIGHT: u16 = 3;
const TOAST_MIN_WIDTH: u16 = 20;

pub(super) fn render(workbench: &mut Workbench, frame: &mut Frame, area: Rect) {
    workbench.last_area = Some(area);
    workbench.cursor = None;

    let layout = compute_layout(
        area,
        workbench.show_sidebar,
        workbench.config.explorer_width_percent,
    );

    workbench.render_header(frame, layout.header);
    if let Some(sidebar) = layout.sidebar {
        workbench.render_explorer(frame, sidebar);
    }
    workbench.render_tabs(frame, layout.tabs);
    workbench.render_editor(frame, layout.editor);
    workbench.render_status(frame, layout.status);
    workbench.render_notifications(frame, area, layout.status);
    if workbench.edit_menu_open {
        workbench.render_edit_menu(frame, edit_menu_area(area, layout.header));
    }

    if let Some(position) = workbench.cursor {
        frame.set_cursor_position(position);
    }
}

impl Workbench {
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let base = Style::default()
            .bg(self.theme.header_bg)
            .fg(self.theme.header_fg);
        let title = Paragraph::new(TITLE).alignment(Alignment::Center).style(
            base.fg(self.theme.title_fg)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(title, area);

        for (rect, name, target) in menu_hits(area) {
            let style = if self.edit_menu_open && target == MenuTarget::Edit {
                base.add_modifier(Modifier::REVERSED)
            } else {
                base
            };
            frame.render_widget(Paragraph::new(format!(" {name} ")).style(style), rect);
        }
    }

    fn render_explorer(&mut self, frame: &mut Frame, area: Rect) {
        let rows = self.tree.flatten_for_view();
        let inner = inset(area);
        let height = inner.height as usize;
        self.explorer_top = self.explorer_top.min(rows.len().saturating_sub(height));

        let focused = self.focus == FocusArea::Explorer;
        let theme = &self.theme;
        let border = if focused {
            theme.focus_border
        } else {
            theme.inactive_border
        };
        let root_name = self
            .tree
            .get(self.tree.root())
            .map(|n| n.name.as_str())
            .unwrap_or_default();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {root_name} "));

        let selected = self.tree.selected();
        let lines: Vec<Line> = rows
            .iter()
            .skip(self.explorer_top)
            .take(height)
            .map(|row| {
                let indent = "  ".repeat(row.depth as usize);
                let (label, mut style) = match row.kind {
                    NodeKind::Directory => {
                        let marker = if row.is_open { "▾" } else { "▸" };
                        (
                            format!("{indent}{marker} {}", row.name),
                            Style::default().fg(theme.explorer_dir_fg),
                        )
                    }
                    NodeKind::File => {
                        let icon = self.tree.path(row.id).map(file_icon).unwrap_or("📄");
                        (format!("{indent}{icon} {}", row.name), Style::default())
                    }
                    NodeKind::Placeholder => (
                        format!("{indent}  {}", row.name),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                    NodeKind::Error => (
                        format!(
                            "{indent}⚠ {}: {}",
                            row.name,
                            row.error.as_deref().unwrap_or_default()
                        ),
                        Style::default().fg(theme.error_fg),
                    ),
                };
                if selected == Some(row.id) {
                    style = style.bg(theme.explorer_selected_bg);
                    if focused {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                }
                Line::from(Span::styled(label, style))
            })
            .collect();

        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.header_bg)),
            area,
        );
        for slot in tab_strip(area, &self.store.tabs()) {
            let style = match slot.target {
                TabTarget::NewTab => Style::default().fg(theme.new_tab_fg),
                _ if slot.active => Style::default()
                    .bg(theme.tab_active_bg)
                    .fg(theme.tab_active_fg)
                    .add_modifier(Modifier::BOLD),
                _ => Style::default().fg(theme.tab_inactive_fg),
            };
            frame.render_widget(Paragraph::new(slot.label).style(style), slot.area);
        }
    }

    fn render_editor(&mut self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let gutter = self.gutter().min(area.width);
        let surface = self.store.surface();
        let line_count = surface.len_lines();
        let text_width = (area.width - gutter) as usize;
        let height = area.height as usize;
        let (cursor_row, cursor_col) = surface.cursor();
        let cursor_line = surface.line_text(cursor_row).unwrap_or_default();

        let viewport = &mut self.viewport;
        if viewport.follow_cursor {
            if cursor_row < viewport.top {
                viewport.top = cursor_row;
            } else if cursor_row >= viewport.top + height {
                viewport.top = cursor_row + 1 - height;
            }
            if cursor_col < viewport.left {
                viewport.left = cursor_col;
            }
            while viewport.left < cursor_col
                && cells_between(&cursor_line, viewport.left, cursor_col) >= text_width
            {
                viewport.left += 1;
            }
        }
        viewport.top = viewport.top.min(line_count.saturating_sub(1));
        let (top, left) = (viewport.top, viewport.left);

        let selection = surface.selection_range();
        let rope = surface.rope();
        let number_style = Style::default().fg(self.theme.line_number_fg);
        let lines: Vec<Line> = (top..(top + height).min(line_count))
            .map(|row| {
                let mut spans = Vec::new();
                if gutter > 0 {
                    let number = format!("{:>width$} ", row + 1, width = gutter as usize - 1);
                    spans.push(Span::styled(number, number_style));
                }
                let text = surface.line_text(row).unwrap_or_default();
                spans.extend(text_spans(
                    &text,
                    rope.line_to_char(row),
                    left,
                    text_width,
                    selection,
                    self.theme.selection_bg,
                ));
                Line::from(spans)
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), area);

        let cursor_shown = self.focus == FocusArea::Editor && !self.edit_menu_open;
        let on_screen = cursor_row >= top && cursor_row < top + height && cursor_col >= left;
        if cursor_shown && on_screen {
            let cells = cells_between(&cursor_line, left, cursor_col);
            if cells < text_width {
                self.cursor = Some((
                    area.x + gutter + cells as u16,
                    area.y + (cursor_row - top) as u16,
                ));
            }
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let style = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        let status = self.status();
        frame.render_widget(Block::default().style(style), area);

        let [name_area, position_area, type_area] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(20),
            Constraint::Length(16),
        ])
        .areas(area);

        let mut name = format!(" {}", status.file_name);
        if !self.pending_opens.is_empty() {
            name.push_str("  (loading...)");
        }
        frame.render_widget(Paragraph::new(name).style(style), name_area);
        frame.render_widget(
            Paragraph::new(status.position_label())
                .alignment(Alignment::Center)
                .style(style),
            position_area,
        );
        frame.render_widget(
            Paragraph::new(format!("{} ", status.file_type))
                .alignment(Alignment::Right)
                .style(style),
            type_area,
        );
    }

    /// Newest toast sits directly above the status bar.
    fn render_notifications(&self, frame: &mut Frame, screen: Rect, status: Rect) {
        let max_width = (screen.width / 2).max(TOAST_MIN_WIDTH).min(screen.width);
        let notes: Vec<&Notification> = self.notifications.iter().collect();
        let mut bottom = status.y;
        for note in notes.into_iter().rev() {
            if bottom < screen.y + 1 + TOAST_HEIGHT || max_width == 0 {
                break;
            }
            let width = (note.message.width() as u16 + 4).min(max_width);
            let x = screen.right().saturating_sub(width + 1).max(screen.x);
            let rect = Rect::new(x, bottom - TOAST_HEIGHT, width, TOAST_HEIGHT);
            let color = match note.severity {
                Severity::Info => self.theme.info_fg,
                Severity::Warning => self.theme.warning_fg,
                Severity::Error => self.theme.error_fg,
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color));
            frame.render_widget(Clear, rect);
            frame.render_widget(Paragraph::new(note.message.as_str()).block(block), rect);
            bottom -= TOAST_HEIGHT;
        }
    }

    fn render_edit_menu(&self, frame: &mut Frame, area: Rect) {
        let style = Style::default()
            .bg(self.theme.menu_bg)
            .fg(self.theme.menu_fg);
        let inner_width = EDIT_MENU_WIDTH.saturating_sub(2) as usize;
        let lines: Vec<Line> = EDIT_MENU
            .iter()
            .map(|entry| match entry {
                Some((label, shortcut, _)) => {
                    let pad = inner_width.saturating_sub(label.width() + shortcut.width() + 2);
                    Line::from(format!(" {label}{}{shortcut} ", " ".repeat(pad)))
                }
                None => Line::from("─".repeat(inner_width)),
            })
            .collect();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.focus_border))
            .style(style);
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(lines).style(style).block(block), area);
    }
}

/// Visible part of one line, split into runs by selection state.
fn text_spans(
    text: &str,
    line_start: usize,
    left: usize,
    width: usize,
    selection: Option<(usize, usize)>,
    selection_bg: Color,
) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_selected = false;
    let mut used = 0;
    for (offset, ch) in text.chars().enumerate().skip(left) {
        let cells = char_cells(ch);
        if used + cells > width {
            break;
        }
        used += cells;
        let index = line_start + offset;
        let selected = selection.is_some_and(|(start, end)| index >= start && index < end);
        if selected != run_selected && !run.is_empty() {
            spans.push(styled_run(std::mem::take(&mut run), run_selected, selection_bg));
        }
        run_selected = selected;
        run.push(if ch.is_control() { ' ' } else { ch });
    }
    if !run.is_empty() {
        spans.push(styled_run(run, run_selected, selection_bg));
    }
    spans
}

fn styled_run(text: String, selected: bool, bg: Color) -> Span<'static> {
    if selected {
        Span::styled(text, Style::default().bg(bg))
    } else {
        Span::raw(text)
    }
}
