use std::fs;
use std::path::PathBuf;

use script_writer_gui::UserPreferences;
use tempfile::tempdir;

#[test]
fn missing_preferences_fall_back_to_defaults() {
    let dir = tempdir().expect("tempdir");
    let loaded = UserPreferences::load_from(&dir.path().join("prefs.json")).expect("load prefs");
    assert_eq!(loaded, UserPreferences::default());
    assert_eq!(loaded.window_width, 800.0);
}

#[test]
fn saves_and_loads_preferences() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config").join("prefs.json");
    let prefs = UserPreferences {
        window_width: 1024.0,
        window_height: 700.0,
        ui_scale: 1.25,
        last_script_dir: Some(PathBuf::from("scripts")),
    };

    prefs.save_to(&path).expect("save prefs");
    let loaded = UserPreferences::load_from(&path).expect("load prefs");

    assert_eq!(prefs, loaded);
    let stored = fs::read_to_string(&path).expect("read prefs");
    assert!(stored.contains("\"ui_scale\": 1.25"));
}

#[test]
fn older_preference_files_keep_new_fields_default() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("prefs.json");
    fs::write(&path, r#"{"window_width": 900.0}"#).expect("write prefs");

    let loaded = UserPreferences::load_from(&path).expect("load prefs");
    assert_eq!(loaded.window_width, 900.0);
    assert_eq!(loaded.window_height, 600.0);
    assert!(loaded.last_script_dir.is_none());
}

#[test]
fn corrupt_preferences_are_reported() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("prefs.json");
    fs::write(&path, "not json").expect("write prefs");

    let err = UserPreferences::load_from(&path).expect_err("corrupt prefs");
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn remembers_directory_of_last_file() {
    let mut prefs = UserPreferences::default();
    prefs.remember_dir_of(&PathBuf::from("scripts").join("scene.json"));
    assert_eq!(prefs.last_script_dir, Some(PathBuf::from("scripts")));

    prefs.remember_dir_of(&PathBuf::from("bare.json"));
    assert_eq!(prefs.last_script_dir, Some(PathBuf::from("scripts")));
}

#[test]
fn window_size_tracks_live_viewport() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("prefs.json");
    let mut prefs = UserPreferences::default();

    prefs.remember_window_size(1280.0, 720.0);
    prefs.remember_window_size(0.0, 0.0);
    prefs.save_to(&path).expect("save prefs");

    let loaded = UserPreferences::load_from(&path).expect("load prefs");
    assert_eq!((loaded.window_width, loaded.window_height), (1280.0, 720.0));
}
