use super::*;

#[test]
fn test_command_names() {
    assert_eq!(Command::NewFile.name(), "newFile");
    assert_eq!(Command::PrevTab.name(), "prevTab");
    assert_eq!(Command::InsertChar('a').name(), "insertChar");
    assert_eq!(Command::Custom("myCommand".to_string()).name(), "myCommand");
}

#[test]
fn test_from_name_inverts_name() {
    for cmd in [
        Command::NewFile,
        Command::CloseTab,
        Command::PrevTab,
        Command::NextTab,
        Command::Save,
        Command::Undo,
        Command::Redo,
        Command::Cut,
        Command::Copy,
        Command::Paste,
        Command::SelectAll,
        Command::Quit,
        Command::ToggleSidebar,
        Command::FocusExplorer,
        Command::FocusEditor,
        Command::SelectDown,
    ] {
        assert_eq!(Command::from_name(cmd.name()), cmd);
    }
}

#[test]
fn test_unknown_name_is_custom() {
    assert_eq!(
        Command::from_name("doesNotExist"),
        Command::Custom("doesNotExist".to_string())
    );
}

#[test]
fn test_categories() {
    assert!(Command::InsertChar('a').is_edit_command());
    assert!(Command::Paste.is_edit_command());
    assert!(!Command::NewFile.is_edit_command());
    assert!(Command::CursorFileEnd.is_cursor_command());
    assert!(!Command::Save.is_cursor_command());
    assert!(Command::Copy.targets_editor());
    assert!(!Command::NextTab.targets_editor());
}
