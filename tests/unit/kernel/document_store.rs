use super::*;
use std::fs;
use tempfile::tempdir;

fn assert_invariants(store: &DocumentStore) {
    for id in store.tab_order() {
        assert!(store.contains(*id));
    }
    match store.active() {
        ActiveDocument::Welcome => assert!(store.is_empty()),
        ActiveDocument::Document(id) => assert!(store.tab_order().contains(&id)),
    }
    let active_tabs = store.tabs().iter().filter(|t| t.active).count();
    assert_eq!(active_tabs, usize::from(!store.is_empty()));
}

#[test]
fn new_store_shows_welcome() {
    let store = DocumentStore::new();
    assert_eq!(store.active(), ActiveDocument::Welcome);
    assert!(store.is_empty());
    assert_eq!(store.surface().text(), WELCOME_TEXT);
}

#[test]
fn create_untitled_three_times() {
    let mut store = DocumentStore::new();
    let a = store.create_untitled();
    let b = store.create_untitled();
    let c = store.create_untitled();

    assert_eq!(store.tab_order(), &[a, b, c]);
    let names: Vec<_> = [a, b, c]
        .iter()
        .map(|&id| store.document(id).unwrap().display_name().to_string())
        .collect();
    assert_eq!(names, ["Untitled-1", "Untitled-2", "Untitled-3"]);

    let safe_ids: Vec<_> = store.tabs().into_iter().map(|t| t.safe_id).collect();
    assert_eq!(safe_ids, ["Untitled-1", "Untitled-2", "Untitled-3"]);
    assert_eq!(store.active(), ActiveDocument::Document(c));
    assert_invariants(&store);
}

#[test]
fn untitled_numbers_are_never_reused() {
    let mut store = DocumentStore::new();
    let a = store.create_untitled();
    store.close(a);
    let b = store.create_untitled();

    assert_eq!(store.document(b).unwrap().display_name(), "Untitled-2");
}

#[test]
fn untitled_documents_start_dirty() {
    let mut store = DocumentStore::new();
    let id = store.create_untitled();
    assert!(store.is_dirty(id));
    assert!(store.document(id).unwrap().source_path().is_none());
}

#[test]
fn switch_round_trip_keeps_edits() {
    let mut store = DocumentStore::new();
    let a = store.create_untitled();
    store.surface_mut().insert_str("alpha edits");
    let b = store.create_untitled();
    store.surface_mut().insert_str("beta");

    assert!(store.switch_to(a));
    assert_eq!(store.surface().text(), "alpha edits");

    store.surface_mut().insert_str(" more");
    store.switch_to(b);
    assert_eq!(store.surface().text(), "beta");
    store.switch_to(a);
    assert_eq!(store.surface().text(), "alpha edits more");
    assert_eq!(store.text_of(b).as_deref(), Some("beta"));
}

#[test]
fn switch_restores_cursor() {
    let mut store = DocumentStore::new();
    let a = store.create_untitled();
    store.surface_mut().insert_str("one\ntwo");
    store.create_untitled();

    store.switch_to(a);
    assert_eq!(store.surface().cursor(), (1, 3));
}

#[test]
fn switch_to_active_is_noop() {
    let mut store = DocumentStore::new();
    let a = store.create_untitled();
    store.take_refresh_request();
    store.surface_mut().insert_str("x");

    assert!(store.switch_to(a));
    assert!(!store.take_refresh_request());
    assert_eq!(store.surface().text(), "x");
}

#[test]
fn switch_to_unknown_id_is_rejected() {
    let mut store = DocumentStore::new();
    let a = store.create_untitled();
    store.close(a);
    let b = store.create_untitled();

    assert!(!store.switch_to(a));
    assert_eq!(store.active(), ActiveDocument::Document(b));
}

#[test]
fn switch_requests_status_refresh() {
    let mut store = DocumentStore::new();
    store.take_refresh_request();
    store.create_untitled();
    assert!(store.take_refresh_request());
    assert!(!store.take_refresh_request());
}

#[test]
fn open_twice_yields_same_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.py");
    fs::write(&path, "print(1)\n").unwrap();

    let mut store = DocumentStore::new();
    let first = store.open(&path).unwrap();
    store.create_untitled();
    let second = store.open(&dir.path().join(".").join("a.py")).unwrap();

    assert_eq!(first, second);
    assert_eq!(store.len(), 2);
    assert_eq!(store.active(), ActiveDocument::Document(first));
}

#[test]
fn opened_file_is_clean_until_edited() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "hello").unwrap();

    let mut store = DocumentStore::new();
    let id = store.open(&path).unwrap();
    assert!(!store.is_dirty(id));

    store.surface_mut().move_file_end(false);
    store.surface_mut().insert_char('!');
    assert!(store.is_active_dirty());

    store.surface_mut().backspace();
    assert!(!store.is_active_dirty());
}

#[test]
fn open_two_files_and_switch_back() {
    let dir = tempdir().unwrap();
    let a_path = dir.path().join("a.py");
    let b_path = dir.path().join("b.py");
    fs::write(&a_path, "a = 1\n").unwrap();
    fs::write(&b_path, "b = 2\n").unwrap();

    let mut store = DocumentStore::new();
    let a = store.open(&a_path).unwrap();
    store.surface_mut().move_file_end(false);
    store.surface_mut().insert_str("a += 1\n");
    store.open(&b_path).unwrap();
    assert_eq!(store.surface().text(), "b = 2\n");

    store.switch_to(a);
    assert_eq!(store.surface().text(), "a = 1\na += 1\n");
    assert_eq!(store.active_document().unwrap().display_name(), "a.py");
}

#[test]
fn open_failure_creates_nothing() {
    let dir = tempdir().unwrap();
    let bin = dir.path().join("blob.bin");
    fs::write(&bin, [0xff, 0xfe, 0xfd]).unwrap();

    let mut store = DocumentStore::new();
    let err = store.open(&bin).unwrap_err();
    assert!(matches!(err, FileError::Decode(_)));

    let err = store.open(&dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, FileError::NotFound(_)));

    assert!(store.is_empty());
    assert_eq!(store.active(), ActiveDocument::Welcome);
}

#[test]
fn finish_open_decodes_and_dedups() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lib.rs");
    fs::write(&path, "pub fn f() {}\n").unwrap();

    let mut store = DocumentStore::new();
    let id = store.finish_open(&path, b"pub fn f() {}\n".to_vec()).unwrap();
    let again = store.finish_open(&path, b"ignored".to_vec()).unwrap();

    assert_eq!(id, again);
    assert_eq!(store.len(), 1);
    assert_eq!(store.surface().text(), "pub fn f() {}\n");
    assert_eq!(store.find_by_path(&path), Some(id));

    let err = store
        .finish_open(&dir.path().join("x.bin"), vec![0xc3, 0x28])
        .unwrap_err();
    assert!(matches!(err, FileError::Decode(_)));
    assert_eq!(store.len(), 1);
}

#[test]
fn colliding_names_get_distinct_safe_ids() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("x")).unwrap();
    fs::create_dir(dir.path().join("y")).unwrap();
    let first = dir.path().join("x/a.b");
    let second = dir.path().join("y/a_b");
    fs::write(&first, "").unwrap();
    fs::write(&second, "").unwrap();

    let mut store = DocumentStore::new();
    let a = store.open(&first).unwrap();
    let b = store.open(&second).unwrap();

    assert_eq!(store.document(a).unwrap().safe_id(), "a-b");
    assert_eq!(store.document(b).unwrap().safe_id(), "a-b-2");
    assert_eq!(store.find_by_safe_id("a-b-2"), Some(b));
}

#[test]
fn closing_only_tab_shows_welcome_then_new_tab_is_sole_entry() {
    let mut store = DocumentStore::new();
    let a = store.create_untitled();

    assert_eq!(
        store.close(a),
        CloseOutcome::Closed {
            now_active: ActiveDocument::Welcome
        }
    );
    assert!(store.is_empty());
    assert_eq!(store.surface().text(), WELCOME_TEXT);

    let b = store.create_untitled();
    assert_eq!(store.tab_order(), &[b]);
    assert_eq!(store.active(), ActiveDocument::Document(b));
    assert_invariants(&store);
}

#[test]
fn closing_active_activates_following_tab() {
    let mut store = DocumentStore::new();
    let a = store.create_untitled();
    let b = store.create_untitled();
    let c = store.create_untitled();

    store.switch_to(b);
    store.close(b);
    assert_eq!(store.active(), ActiveDocument::Document(c));
    assert_eq!(store.tab_order(), &[a, c]);

    store.close(c);
    assert_eq!(store.active(), ActiveDocument::Document(a));
}

#[test]
fn closing_inactive_tab_keeps_active() {
    let mut store = DocumentStore::new();
    let a = store.create_untitled();
    let b = store.create_untitled();
    store.surface_mut().insert_str("live");

    store.close(a);
    assert_eq!(store.active(), ActiveDocument::Document(b));
    assert_eq!(store.surface().text(), "live");
}

#[test]
fn close_unknown_id_reports_not_open() {
    let mut store = DocumentStore::new();
    let a = store.create_untitled();
    store.close(a);
    assert_eq!(store.close(a), CloseOutcome::NotOpen);
}

#[test]
fn close_active_on_welcome_resets_text() {
    let mut store = DocumentStore::new();
    store.surface_mut().insert_str("scribble");

    assert_eq!(store.close_active(), CloseOutcome::WelcomeReset);
    assert_eq!(store.surface().text(), WELCOME_TEXT);
}

#[test]
fn closed_file_can_be_reopened() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "disk").unwrap();

    let mut store = DocumentStore::new();
    let id = store.open(&path).unwrap();
    store.surface_mut().insert_str("unsaved ");
    store.close(id);

    let reopened = store.open(&path).unwrap();
    assert_ne!(id, reopened);
    assert_eq!(store.surface().text(), "disk");
}

#[test]
fn navigate_wraps_around() {
    let mut store = DocumentStore::new();
    let a = store.create_untitled();
    let b = store.create_untitled();
    let c = store.create_untitled();

    assert!(store.navigate(TabDirection::Next));
    assert_eq!(store.active(), ActiveDocument::Document(a));

    assert!(store.navigate(TabDirection::Previous));
    assert_eq!(store.active(), ActiveDocument::Document(c));

    store.navigate(TabDirection::Previous);
    assert_eq!(store.active(), ActiveDocument::Document(b));
}

#[test]
fn navigate_is_noop_with_fewer_than_two_tabs() {
    let mut store = DocumentStore::new();
    assert!(!store.navigate(TabDirection::Next));

    let a = store.create_untitled();
    assert!(!store.navigate(TabDirection::Previous));
    assert_eq!(store.active(), ActiveDocument::Document(a));
}

#[test]
fn invariants_hold_over_mixed_sequence() {
    let dir = tempdir().unwrap();
    let mut paths = Vec::new();
    for i in 0..3 {
        let p = dir.path().join(format!("f{i}.txt"));
        fs::write(&p, format!("file {i}")).unwrap();
        paths.push(p);
    }

    let mut store = DocumentStore::new();
    let mut seed: u32 = 0x2545_f491;
    for step in 0..200 {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        match seed % 6 {
            0 => {
                store.create_untitled();
            }
            1 => {
                let _ = store.open(&paths[step % paths.len()]);
            }
            2 => {
                store.close_active();
            }
            3 => {
                if let Some(&id) = store.tab_order().first() {
                    store.close(id);
                }
            }
            4 => {
                store.navigate(TabDirection::Next);
            }
            _ => {
                store.surface_mut().insert_char('z');
            }
        }
        assert_invariants(&store);
    }
}

struct FailingProvider {
    kind: std::io::ErrorKind,
}

impl FileProvider for FailingProvider {
    fn read_file_bytes(&self, path: &Path) -> Result<Vec<u8>, FileError> {
        Err(FileError::from_io(path, std::io::Error::from(self.kind)))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, FileError> {
        Ok(path.to_path_buf())
    }
}

fn store_failing_with(kind: std::io::ErrorKind) -> DocumentStore {
    DocumentStore::with_provider(Arc::new(FailingProvider { kind }))
}

#[test]
fn open_denied_creates_no_document() {
    let mut store = store_failing_with(std::io::ErrorKind::PermissionDenied);
    let path = Path::new("/work/secret.txt");

    let err = store.open(path).unwrap_err();
    assert!(matches!(err, FileError::PermissionDenied(ref p) if p == path));
    assert!(store.is_empty());
    assert_eq!(store.active(), ActiveDocument::Welcome);
    assert!(store.find_by_path(path).is_none());
    assert_invariants(&store);
}

#[test]
fn open_io_failure_creates_no_document() {
    let mut store = store_failing_with(std::io::ErrorKind::Other);
    let path = Path::new("/work/flaky.txt");

    let err = store.open(path).unwrap_err();
    assert!(matches!(err, FileError::Io { path: ref p, .. } if p == path));
    assert!(store.is_empty());
    assert_eq!(store.active(), ActiveDocument::Welcome);
    assert_eq!(store.surface().text(), WELCOME_TEXT);
    assert_invariants(&store);
}

#[test]
fn failed_open_keeps_the_active_document() {
    let mut store = store_failing_with(std::io::ErrorKind::PermissionDenied);
    let id = store.create_untitled();

    assert!(store.open(Path::new("/work/secret.txt")).is_err());
    assert_eq!(store.tab_order(), &[id]);
    assert_eq!(store.active(), ActiveDocument::Document(id));
    assert_invariants(&store);
}
