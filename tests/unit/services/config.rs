use super::*;
use tempfile::tempdir;

#[test]
fn ensure_writes_defaults_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    ensure_settings_file_at(&path).unwrap();
    assert_eq!(load_settings_from(&path), Some(Settings::default()));

    std::fs::write(&path, r#"{ "show_hidden": true }"#).unwrap();
    ensure_settings_file_at(&path).unwrap();
    let loaded = load_settings_from(&path).unwrap();
    assert!(loaded.show_hidden);
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "status_interval_ms": 250, "keybindings": [{ "key": "ctrl+t", "command": "newFile" }] }"#,
    )
    .unwrap();

    let settings = load_settings_from(&path).unwrap();
    assert_eq!(settings.status_interval_ms, 250);
    assert_eq!(settings.explorer_width_percent, 25);
    assert_eq!(
        settings.keybindings,
        vec![KeybindingRule {
            key: "ctrl+t".to_string(),
            command: "newFile".to_string(),
        }]
    );
}

#[test]
fn malformed_or_missing_file_yields_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    assert_eq!(load_settings_from(&path), None);

    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(load_settings_from(&path), None);
}

#[test]
fn editor_config_clamps_values() {
    let settings = Settings {
        status_interval_ms: 40,
        explorer_width_percent: 95,
        tab_size: 0,
        ..Settings::default()
    };
    let config = EditorConfig::from_settings(&settings);
    assert_eq!(config.status_interval, Duration::from_millis(40));
    assert_eq!(config.explorer_width_percent, 60);
    assert_eq!(config.tab_text(), " ");
}

#[test]
fn default_interval_matches_status_default() {
    assert_eq!(EditorConfig::default().status_interval, DEFAULT_STATUS_INTERVAL);
}
