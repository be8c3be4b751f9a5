use super::layout::{compute_layout, edit_menu_area, menu_hits, tab_strip, MenuTarget, TabTarget};
use super::*;
use crate::core::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crate::core::Command;
use crate::kernel::{ActiveDocument, WELCOME_TITLE};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::fs;
use tempfile::{tempdir, TempDir};

const WIDTH: u16 = 100;
const HEIGHT: u16 = 30;

fn key(code: KeyCode) -> InputEvent {
    InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(ch: char) -> InputEvent {
    InputEvent::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
}

fn click(column: u16, row: u16) -> InputEvent {
    InputEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn type_text(workbench: &mut Workbench, text: &str) {
    for ch in text.chars() {
        workbench.handle_input(&key(KeyCode::Char(ch)));
    }
}

fn screen() -> Rect {
    Rect::new(0, 0, WIDTH, HEIGHT)
}

fn render_lines(workbench: &mut Workbench) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            workbench.render(frame, area);
        })
        .unwrap();
    let buffer = terminal.backend().buffer();
    (0..HEIGHT)
        .map(|y| {
            (0..WIDTH)
                .map(|x| buffer.content[(y * WIDTH + x) as usize].symbol())
                .collect::<String>()
        })
        .collect()
}

fn screen_contains(lines: &[String], needle: &str) -> bool {
    lines.iter().any(|line| line.contains(needle))
}

fn workspace() -> (TempDir, Workbench) {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("alpha.txt"), "alpha line\nsecond\n").unwrap();
    fs::write(dir.path().join("beta.py"), "print('hi')\n").unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src").join("lib.rs"), "fn main() {}\n").unwrap();
    let workbench = Workbench::headless(dir.path(), EditorConfig::default());
    (dir, workbench)
}

fn latest_message(workbench: &Workbench) -> String {
    workbench
        .notifications()
        .latest()
        .map(|n| n.message.clone())
        .unwrap_or_default()
}

#[test]
fn starts_on_welcome_with_full_chrome() {
    let (_dir, mut workbench) = workspace();
    assert_eq!(workbench.store().active(), ActiveDocument::Welcome);
    assert_eq!(workbench.status().file_name, WELCOME_TITLE);

    let lines = render_lines(&mut workbench);
    assert!(screen_contains(&lines, "Text Editor"));
    assert!(screen_contains(&lines, " File  Edit "));
    assert!(screen_contains(&lines, WELCOME_TITLE));
    assert!(screen_contains(&lines, "Ln 1, Col 1"));
    assert!(screen_contains(&lines, "alpha.txt"));
    assert!(screen_contains(&lines, "src"));
}

#[test]
fn new_and_close_tabs_from_keyboard() {
    let (_dir, mut workbench) = workspace();
    workbench.handle_input(&ctrl('n'));
    workbench.handle_input(&ctrl('n'));
    assert_eq!(workbench.store().len(), 2);
    assert_eq!(workbench.status().file_name, "Untitled-2");

    workbench.handle_input(&ctrl('w'));
    assert_eq!(workbench.store().len(), 1);
    assert_eq!(latest_message(&workbench), "Closed Untitled-2");
    assert_eq!(workbench.status().file_name, "Untitled-1");

    workbench.handle_input(&ctrl('w'));
    assert_eq!(workbench.store().active(), ActiveDocument::Welcome);
    assert_eq!(workbench.status().file_name, WELCOME_TITLE);

    workbench.handle_input(&ctrl('w'));
    assert_eq!(latest_message(&workbench), "Welcome tab cleared");
    assert!(workbench.store().is_empty());
}

#[test]
fn tab_navigation_wraps_around() {
    let (_dir, mut workbench) = workspace();
    let first = workbench.store_mut().create_untitled();
    let _second = workbench.store_mut().create_untitled();
    let third = workbench.store_mut().create_untitled();
    assert_eq!(workbench.store().active_id(), Some(third));

    workbench.handle_input(&ctrl('l'));
    assert_eq!(workbench.store().active_id(), Some(first));
    assert_eq!(workbench.status().file_name, "Untitled-1");

    workbench.handle_input(&ctrl('j'));
    assert_eq!(workbench.store().active_id(), Some(third));
}

#[test]
fn explorer_keys_navigate_and_open_files() {
    let (dir, mut workbench) = workspace();
    workbench.handle_input(&ctrl('e'));
    assert_eq!(workbench.focus(), FocusArea::Explorer);

    // Rows are: src/, alpha.txt, beta.py.
    workbench.handle_input(&key(KeyCode::Down));
    workbench.handle_input(&key(KeyCode::Enter));

    let doc = workbench.store().active_document().unwrap();
    assert_eq!(doc.display_name(), "alpha.txt");
    assert_eq!(workbench.focus(), FocusArea::Editor);
    assert_eq!(workbench.status().file_type, ".txt");
    assert_eq!(workbench.store().surface().text(), "alpha line\nsecond\n");

    workbench.open_path(&dir.path().join("alpha.txt"));
    assert_eq!(workbench.store().len(), 1);
}

#[test]
fn explorer_right_and_left_expand_and_collapse() {
    let (_dir, mut workbench) = workspace();
    workbench.handle_input(&ctrl('e'));
    let src = workbench.tree().selected().unwrap();
    assert_eq!(workbench.tree().get(src).unwrap().name, "src");

    workbench.handle_input(&key(KeyCode::Right));
    assert!(workbench.tree().is_open(src));
    let names: Vec<String> = workbench
        .tree()
        .flatten_for_view()
        .into_iter()
        .map(|row| row.name)
        .collect();
    assert_eq!(names, ["src", "lib.rs", "alpha.txt", "beta.py"]);

    workbench.handle_input(&key(KeyCode::Left));
    assert!(!workbench.tree().is_open(src));
    assert!(workbench.store().is_empty());
}

#[test]
fn typing_marks_dirty_and_status_follows_cursor() {
    let (_dir, mut workbench) = workspace();
    workbench.handle_input(&ctrl('n'));
    type_text(&mut workbench, "hey");
    workbench.handle_input(&key(KeyCode::Enter));
    type_text(&mut workbench, "yo");

    assert_eq!(workbench.store().surface().text(), "hey\nyo");
    assert!(workbench.store().is_active_dirty());

    assert!(workbench.tick(Instant::now()));
    let status = workbench.status();
    assert_eq!((status.line, status.column), (2, 3));
    assert_eq!(status.position_label(), "Ln 2, Col 3");
}

#[test]
fn control_chords_are_not_inserted_as_text() {
    let (_dir, mut workbench) = workspace();
    workbench.handle_input(&ctrl('n'));
    workbench.handle_input(&ctrl('k'));
    assert_eq!(workbench.store().surface().text(), "");
}

#[test]
fn save_and_file_menu_are_placeholders() {
    let (_dir, mut workbench) = workspace();
    workbench.handle_input(&ctrl('s'));
    assert_eq!(latest_message(&workbench), "Save functionality coming soon!");

    render_lines(&mut workbench);
    let layout = compute_layout(screen(), true, 25);
    let (file_rect, _, _) = menu_hits(layout.header)[0];
    workbench.handle_input(&click(file_rect.x, file_rect.y));
    assert_eq!(latest_message(&workbench), "File menu - coming soon!");
}

#[test]
fn copy_without_selection_takes_the_line_and_paste_inserts_it() {
    let (dir, mut workbench) = workspace();
    workbench.open_path(&dir.path().join("alpha.txt"));

    workbench.handle_input(&ctrl('c'));
    assert_eq!(workbench.clipboard().contents(), "alpha line\n");
    assert_eq!(latest_message(&workbench), "Copied line to clipboard");

    workbench.handle_input(&ctrl('v'));
    assert_eq!(
        workbench.store().surface().text(),
        "alpha line\nalpha line\nsecond\n"
    );
    assert_eq!(latest_message(&workbench), "Pasted from clipboard");
}

#[test]
fn cut_without_selection_removes_the_line() {
    let (dir, mut workbench) = workspace();
    workbench.open_path(&dir.path().join("alpha.txt"));

    workbench.handle_input(&ctrl('x'));
    assert_eq!(workbench.store().surface().text(), "second\n");
    assert_eq!(workbench.clipboard().contents(), "alpha line\n");
    assert!(workbench.store().is_active_dirty());

    workbench.handle_input(&ctrl('z'));
    assert_eq!(workbench.store().surface().text(), "alpha line\nsecond\n");
}

#[test]
fn empty_clipboard_and_history_warn() {
    let (_dir, mut workbench) = workspace();
    workbench.handle_input(&ctrl('n'));

    workbench.handle_input(&ctrl('v'));
    assert_eq!(latest_message(&workbench), "Clipboard is empty");
    workbench.handle_input(&ctrl('z'));
    assert_eq!(latest_message(&workbench), "Undo not available");
    workbench.handle_input(&ctrl('u'));
    let latest = workbench.notifications().latest().unwrap();
    assert_eq!(latest.message, "Redo not available");
    assert_eq!(latest.severity, Severity::Warning);
}

#[test]
fn bracketed_paste_normalizes_line_endings() {
    let (_dir, mut workbench) = workspace();
    workbench.handle_input(&ctrl('n'));
    workbench.handle_input(&InputEvent::Paste("a\r\nb\rc".to_string()));
    assert_eq!(workbench.store().surface().text(), "a\nb\nc");
}

#[test]
fn hiding_sidebar_moves_focus_back_to_editor() {
    let (_dir, mut workbench) = workspace();
    workbench.handle_input(&ctrl('e'));
    assert_eq!(workbench.focus(), FocusArea::Explorer);

    workbench.handle_input(&ctrl('b'));
    assert!(!workbench.sidebar_visible());
    assert_eq!(workbench.focus(), FocusArea::Editor);

    let lines = render_lines(&mut workbench);
    assert!(!screen_contains(&lines, "alpha.txt"));

    workbench.handle_input(&ctrl('e'));
    assert!(workbench.sidebar_visible());
}

#[test]
fn clicking_plus_and_tabs() {
    let (_dir, mut workbench) = workspace();
    render_lines(&mut workbench);
    let layout = compute_layout(screen(), true, 25);

    let plus = tab_strip(layout.tabs, &workbench.store().tabs())
        .into_iter()
        .find(|slot| slot.target == TabTarget::NewTab)
        .unwrap();
    workbench.handle_input(&click(plus.area.x, plus.area.y));
    assert_eq!(workbench.store().len(), 1);
    let first = workbench.store().active_id().unwrap();

    workbench.handle_input(&ctrl('n'));
    render_lines(&mut workbench);
    let slot = tab_strip(layout.tabs, &workbench.store().tabs())
        .into_iter()
        .find(|slot| slot.target == TabTarget::Document(first))
        .unwrap();
    workbench.handle_input(&click(slot.area.x + 1, slot.area.y));
    assert_eq!(workbench.store().active_id(), Some(first));
    assert_eq!(workbench.status().file_name, "Untitled-1");
}

#[test]
fn dirty_tabs_render_with_marker() {
    let (_dir, mut workbench) = workspace();
    workbench.handle_input(&ctrl('n'));
    let lines = render_lines(&mut workbench);
    assert!(screen_contains(&lines, " Untitled-1* "));
}

#[test]
fn edit_menu_opens_dismisses_and_runs_entries() {
    let (_dir, mut workbench) = workspace();
    workbench.handle_input(&ctrl('n'));
    type_text(&mut workbench, "abc");
    render_lines(&mut workbench);

    let layout = compute_layout(screen(), true, 25);
    let (edit_rect, _, target) = menu_hits(layout.header)[1];
    assert_eq!(target, MenuTarget::Edit);

    workbench.handle_input(&click(edit_rect.x, edit_rect.y));
    assert!(workbench.edit_menu_open());
    let lines = render_lines(&mut workbench);
    assert!(screen_contains(&lines, "Select All"));

    // Any key only dismisses.
    workbench.handle_input(&key(KeyCode::Char('z')));
    assert!(!workbench.edit_menu_open());
    assert_eq!(workbench.store().surface().text(), "abc");

    workbench.handle_input(&click(edit_rect.x, edit_rect.y));
    let menu = edit_menu_area(screen(), layout.header);
    workbench.handle_input(&click(menu.x + 2, menu.y + 1 + 7));
    assert!(!workbench.edit_menu_open());
    assert_eq!(
        workbench.store().surface().selected_text().as_deref(),
        Some("abc")
    );
    assert_eq!(latest_message(&workbench), "Selected all text");
}

#[test]
fn clicking_explorer_rows_toggles_and_opens() {
    let (_dir, mut workbench) = workspace();
    render_lines(&mut workbench);
    let sidebar = compute_layout(screen(), true, 25).sidebar.unwrap();
    let (x, first_row) = (sidebar.x + 2, sidebar.y + 1);

    workbench.handle_input(&click(x, first_row));
    let src = workbench.tree().selected().unwrap();
    assert!(workbench.tree().is_open(src));
    assert_eq!(workbench.focus(), FocusArea::Explorer);

    // src/, lib.rs, alpha.txt
    workbench.handle_input(&click(x, first_row + 1));
    assert_eq!(
        workbench.store().active_document().unwrap().display_name(),
        "lib.rs"
    );
    assert_eq!(workbench.status().file_type, ".rs");
}

#[test]
fn clicking_in_editor_places_cursor() {
    let (dir, mut workbench) = workspace();
    workbench.open_path(&dir.path().join("alpha.txt"));
    render_lines(&mut workbench);

    let editor = compute_layout(screen(), true, 25).editor;
    let gutter = layout::gutter_width(workbench.store().surface().len_lines());
    workbench.handle_input(&click(editor.x + gutter + 3, editor.y + 1));
    assert_eq!(workbench.store().surface().cursor(), (1, 3));

    workbench.handle_input(&click(editor.x + gutter + 50, editor.y));
    assert_eq!(workbench.store().surface().cursor(), (0, 10));
}

#[test]
fn unknown_commands_are_reported() {
    let (_dir, mut workbench) = workspace();
    let result = workbench.run_command(Command::Custom("doTheThing".to_string()));
    assert_eq!(result, EventResult::Consumed);
    assert_eq!(latest_message(&workbench), "Unknown command: doTheThing");
}

#[test]
fn quit_command_requests_exit() {
    let (_dir, mut workbench) = workspace();
    let result = workbench.handle_input(&ctrl('q'));
    assert!(result.is_quit());
    assert!(workbench.should_quit());
}

#[test]
fn missing_root_is_reported_not_fatal() {
    let dir = tempdir().unwrap();
    let workbench = Workbench::headless(&dir.path().join("gone"), EditorConfig::default());
    let latest = workbench.notifications().latest().unwrap();
    assert_eq!(latest.severity, Severity::Error);
    assert!(latest.message.contains("Not Found"));
}

#[test]
fn missing_file_open_becomes_error_notification() {
    let (dir, mut workbench) = workspace();
    workbench.open_path(&dir.path().join("nope.txt"));
    assert!(workbench.store().is_empty());
    assert_eq!(
        workbench.notifications().latest().unwrap().severity,
        Severity::Error
    );
}

#[test]
fn background_reads_open_after_tick() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.md");
    fs::write(&path, "# notes\n").unwrap();
    let mut workbench = Workbench::new(
        dir.path(),
        EditorConfig::default(),
        KeybindingService::new(),
    )
    .unwrap();

    workbench.open_path(&path);
    let resolved = fs::canonicalize(&path).unwrap();
    assert!(workbench.is_pending(&resolved));
    assert!(workbench.store().is_empty());

    let deadline = Instant::now() + Duration::from_secs(5);
    while workbench.store().is_empty() {
        assert!(Instant::now() < deadline, "read never completed");
        workbench.tick(Instant::now());
        std::thread::sleep(Duration::from_millis(10));
    }

    assert!(!workbench.is_pending(&resolved));
    assert_eq!(workbench.store().surface().text(), "# notes\n");
    assert_eq!(workbench.status().file_name, "notes.md");
    assert_eq!(workbench.status().file_type, ".md");
}

#[test]
fn wakeup_is_bounded_by_status_interval() {
    let (_dir, mut workbench) = workspace();
    let now = Instant::now();
    workbench.tick(now);
    assert!(workbench.next_wakeup(now) <= EditorConfig::default().status_interval);
}
