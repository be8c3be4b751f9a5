//! Screen geometry shared by rendering and mouse routing. Everything here is a
//! pure function of the terminal area and the current store, so a click is
//! resolved against exactly what the last frame drew.

use crate::core::Command;
use crate::kernel::{TabInfo, WELCOME_TITLE};
use crate::models::DocumentId;
use ratatui::layout::{Constraint, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SIDEBAR_MIN_WIDTH: u16 = 16;
const NEW_TAB_LABEL: &str = " + ";
pub(super) const EDIT_MENU_WIDTH: u16 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkbenchLayout {
    pub header: Rect,
    pub sidebar: Option<Rect>,
    pub tabs: Rect,
    pub editor: Rect,
    pub status: Rect,
}

pub fn compute_layout(area: Rect, show_sidebar: bool, sidebar_percent: u16) -> WorkbenchLayout {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let (sidebar, main) = if show_sidebar && body.width >= SIDEBAR_MIN_WIDTH * 2 {
        let width = ((body.width as u32 * sidebar_percent as u32) / 100) as u16;
        let [side, main] = Layout::horizontal([
            Constraint::Length(width.max(SIDEBAR_MIN_WIDTH)),
            Constraint::Min(0),
        ])
        .areas(body);
        (Some(side), main)
    } else {
        (None, body)
    };

    let [tabs, editor] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(main);

    WorkbenchLayout {
        header,
        sidebar,
        tabs,
        editor,
        status,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    File,
    Edit,
}

const MENUS: [(&str, MenuTarget); 2] = [("File", MenuTarget::File), ("Edit", MenuTarget::Edit)];

pub fn menu_hits(header: Rect) -> Vec<(Rect, &'static str, MenuTarget)> {
    let mut x = header.x;
    let mut hits = Vec::with_capacity(MENUS.len());
    for (name, target) in MENUS {
        let width = name.width() as u16 + 2;
        if x + width > header.right() {
            break;
        }
        hits.push((Rect::new(x, header.y, width, 1), name, target));
        x += width;
    }
    hits
}

/// `None` rows are separators.
pub const EDIT_MENU: [Option<(&str, &str, Command)>; 8] = [
    Some(("Undo", "Ctrl+Z", Command::Undo)),
    Some(("Redo", "Ctrl+U", Command::Redo)),
    None,
    Some(("Cut", "Ctrl+X", Command::Cut)),
    Some(("Copy", "Ctrl+C", Command::Copy)),
    Some(("Paste", "Ctrl+V", Command::Paste)),
    None,
    Some(("Select All", "Ctrl+A", Command::SelectAll)),
];

/// Dropdown under the `Edit` header item, bordered, clipped to `screen`.
pub fn edit_menu_area(screen: Rect, header: Rect) -> Rect {
    let anchor_x = menu_hits(header)
        .iter()
        .find(|(_, _, target)| *target == MenuTarget::Edit)
        .map(|(rect, _, _)| rect.x)
        .unwrap_or(header.x);
    Rect::new(
        anchor_x,
        header.bottom(),
        EDIT_MENU_WIDTH,
        EDIT_MENU.len() as u16 + 2,
    )
    .intersection(screen)
}

/// Index into [`EDIT_MENU`] of the row at `(column, row)`.
pub fn edit_menu_row_at(menu: Rect, column: u16, row: u16) -> Option<usize> {
    let inner = inset(menu);
    if !contains(inner, column, row) {
        return None;
    }
    Some((row - inner.y) as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabTarget {
    Document(DocumentId),
    /// Shown while no document is open; not closable.
    Welcome,
    NewTab,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSlot {
    pub area: Rect,
    pub label: String,
    pub target: TabTarget,
    pub active: bool,
}

pub fn tab_label(tab: &TabInfo) -> String {
    if tab.dirty {
        format!(" {}* ", tab.title)
    } else {
        format!(" {} ", tab.title)
    }
}

/// Lays out the tab row, scrolled so the active tab is visible, with the `+`
/// button after the last visible tab.
pub fn tab_strip(area: Rect, tabs: &[TabInfo]) -> Vec<TabSlot> {
    let entries: Vec<(String, TabTarget, bool)> = if tabs.is_empty() {
        vec![(format!(" {WELCOME_TITLE} "), TabTarget::Welcome, true)]
    } else {
        tabs.iter()
            .map(|t| (tab_label(t), TabTarget::Document(t.id), t.active))
            .collect()
    };

    let plus_width = NEW_TAB_LABEL.width() as u16;
    let available = area.width.saturating_sub(plus_width);
    let widths: Vec<u16> = entries
        .iter()
        .map(|(l, _, _)| u16::try_from(l.width()).unwrap_or(u16::MAX))
        .collect();
    let active = entries.iter().position(|(_, _, a)| *a).unwrap_or(0);

    let mut start = 0;
    while start < active
        && widths[start..=active]
            .iter()
            .map(|&w| u32::from(w))
            .sum::<u32>()
            > u32::from(available)
    {
        start += 1;
    }

    let mut slots = Vec::new();
    let mut x = area.x;
    let limit = area.x + available;
    for ((label, target, is_active), width) in entries.into_iter().zip(widths).skip(start) {
        if x >= limit {
            break;
        }
        let width = width.min(limit - x);
        slots.push(TabSlot {
            area: Rect::new(x, area.y, width, 1),
            label,
            target,
            active: is_active,
        });
        x += width;
    }

    if x + plus_width <= area.right() {
        slots.push(TabSlot {
            area: Rect::new(x, area.y, plus_width, 1),
            label: NEW_TAB_LABEL.to_string(),
            target: TabTarget::NewTab,
            active: false,
        });
    }
    slots
}

/// Line-number gutter width for a buffer of `lines` lines.
pub fn gutter_width(lines: usize) -> u16 {
    let digits = lines.max(1).to_string().len() as u16;
    digits.max(3) + 1
}

/// Inside of a one-cell border.
pub fn inset(rect: Rect) -> Rect {
    Rect::new(
        rect.x.saturating_add(1),
        rect.y.saturating_add(1),
        rect.width.saturating_sub(2),
        rect.height.saturating_sub(2),
    )
}

/// Terminal cells taken by a char; control chars and tabs draw as one blank.
pub fn char_cells(ch: char) -> usize {
    if ch.is_control() {
        1
    } else {
        ch.width().unwrap_or(0)
    }
}

/// Cells spanned by chars `from..to` of `line`.
pub fn cells_between(line: &str, from: usize, to: usize) -> usize {
    line.chars()
        .skip(from)
        .take(to.saturating_sub(from))
        .map(char_cells)
        .sum()
}

/// Char column under a click `cells` to the right of the first visible char
/// `left`. Clicks past the end land on the end of the line.
pub fn column_at(line: &str, left: usize, cells: usize) -> usize {
    let mut used = 0;
    let mut col = left;
    for ch in line.chars().skip(left) {
        let width = char_cells(ch);
        if used + width > cells {
            break;
        }
        used += width;
        col += 1;
    }
    col
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

#[cfg(test)]
#[path = "../../../tests/unit/app/workbench/layout.rs"]
mod tests;
