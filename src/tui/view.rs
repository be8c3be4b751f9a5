use crate::core::event::InputEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

/// A rectangle of the screen that takes input and draws itself.
pub trait View {
    fn handle_input(&mut self, event: &InputEvent) -> EventResult;

    fn render(&mut self, frame: &mut Frame, area: Rect);

    /// Terminal cursor position after the last render, if it should be shown.
    fn cursor_position(&self) -> Option<(u16, u16)> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed,
    Ignored,
    Quit,
}

impl EventResult {
    pub fn is_consumed(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, EventResult::Ignored)
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, EventResult::Quit)
    }
}

/// Which pane receives keys that are not global bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusArea {
    Explorer,
    #[default]
    Editor,
}

#[cfg(test)]
#[path = "../../tests/unit/tui/view.rs"]
mod tests;
