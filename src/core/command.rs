//! Semantic commands, independent of the keys bound to them.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    // ==================== Cursor ====================
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorLineStart,
    CursorLineEnd,
    CursorFileStart,
    CursorFileEnd,
    SelectLeft,
    SelectRight,
    SelectUp,
    SelectDown,

    // ==================== Editing ====================
    InsertChar(char),
    InsertNewline,
    InsertTab,
    DeleteBackward,
    DeleteForward,
    SelectAll,
    ClearSelection,

    // ==================== Documents ====================
    NewFile,
    Save,
    CloseTab,
    NextTab,
    PrevTab,

    // ==================== System ====================
    Quit,
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,

    // ==================== View ====================
    ToggleSidebar,
    FocusExplorer,
    FocusEditor,

    Custom(String),
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Command::CursorLeft => "cursorLeft",
            Command::CursorRight => "cursorRight",
            Command::CursorUp => "cursorUp",
            Command::CursorDown => "cursorDown",
            Command::CursorLineStart => "cursorLineStart",
            Command::CursorLineEnd => "cursorLineEnd",
            Command::CursorFileStart => "cursorFileStart",
            Command::CursorFileEnd => "cursorFileEnd",
            Command::SelectLeft => "selectLeft",
            Command::SelectRight => "selectRight",
            Command::SelectUp => "selectUp",
            Command::SelectDown => "selectDown",
            Command::InsertChar(_) => "insertChar",
            Command::InsertNewline => "insertNewline",
            Command::InsertTab => "insertTab",
            Command::DeleteBackward => "deleteBackward",
            Command::DeleteForward => "deleteForward",
            Command::SelectAll => "selectAll",
            Command::ClearSelection => "clearSelection",
            Command::NewFile => "newFile",
            Command::Save => "save",
            Command::CloseTab => "closeTab",
            Command::NextTab => "nextTab",
            Command::PrevTab => "prevTab",
            Command::Quit => "quit",
            Command::Undo => "undo",
            Command::Redo => "redo",
            Command::Copy => "copy",
            Command::Cut => "cut",
            Command::Paste => "paste",
            Command::ToggleSidebar => "toggleSidebar",
            Command::FocusExplorer => "focusExplorer",
            Command::FocusEditor => "focusEditor",
            Command::Custom(name) => name,
        }
    }

    /// Inverse of [`Command::name`]. Unknown names become `Custom`.
    /// `insertChar` has no payload to recover and is also `Custom`.
    pub fn from_name(name: &str) -> Command {
        match name {
            "cursorLeft" => Command::CursorLeft,
            "cursorRight" => Command::CursorRight,
            "cursorUp" => Command::CursorUp,
            "cursorDown" => Command::CursorDown,
            "cursorLineStart" => Command::CursorLineStart,
            "cursorLineEnd" => Command::CursorLineEnd,
            "cursorFileStart" => Command::CursorFileStart,
            "cursorFileEnd" => Command::CursorFileEnd,
            "selectLeft" => Command::SelectLeft,
            "selectRight" => Command::SelectRight,
            "selectUp" => Command::SelectUp,
            "selectDown" => Command::SelectDown,
            "insertNewline" => Command::InsertNewline,
            "insertTab" => Command::InsertTab,
            "deleteBackward" => Command::DeleteBackward,
            "deleteForward" => Command::DeleteForward,
            "selectAll" => Command::SelectAll,
            "clearSelection" => Command::ClearSelection,
            "newFile" => Command::NewFile,
            "save" => Command::Save,
            "closeTab" => Command::CloseTab,
            "nextTab" => Command::NextTab,
            "prevTab" => Command::PrevTab,
            "quit" => Command::Quit,
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            "copy" => Command::Copy,
            "cut" => Command::Cut,
            "paste" => Command::Paste,
            "toggleSidebar" => Command::ToggleSidebar,
            "focusExplorer" => Command::FocusExplorer,
            "focusEditor" => Command::FocusEditor,
            other => Command::Custom(other.to_string()),
        }
    }

    pub fn is_edit_command(&self) -> bool {
        matches!(
            self,
            Command::InsertChar(_)
                | Command::InsertNewline
                | Command::InsertTab
                | Command::DeleteBackward
                | Command::DeleteForward
                | Command::Paste
                | Command::Cut
                | Command::Undo
                | Command::Redo
        )
    }

    pub fn is_cursor_command(&self) -> bool {
        matches!(
            self,
            Command::CursorLeft
                | Command::CursorRight
                | Command::CursorUp
                | Command::CursorDown
                | Command::CursorLineStart
                | Command::CursorLineEnd
                | Command::CursorFileStart
                | Command::CursorFileEnd
                | Command::SelectLeft
                | Command::SelectRight
                | Command::SelectUp
                | Command::SelectDown
        )
    }

    /// Commands that only make sense with the editor focused.
    pub fn targets_editor(&self) -> bool {
        self.is_edit_command()
            || self.is_cursor_command()
            || matches!(self, Command::SelectAll | Command::ClearSelection | Command::Copy)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/command.rs"]
mod tests;
