use feedbot_console::config::{ActionMode, BotConfig, ConsoleConfig, DEFAULT_CONSOLE_PORT};
use feedbot_console::settings::{load_settings, save_settings, settings_path};

fn make_config(data_dir: &std::path::Path) -> ConsoleConfig {
    ConsoleConfig {
        port: DEFAULT_CONSOLE_PORT,
        data_dir: data_dir.to_path_buf(),
        log_file: None,
    }
}

#[test]
fn test_settings_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = make_config(dir.path());
    let path = settings_path(&config);

    let mut settings = BotConfig::default();
    settings.mode = ActionMode::Comment;
    settings.iterations = 7;
    settings.profile.username = "tester".to_string();

    save_settings(&path, &settings);
    let loaded = load_settings(&path);

    assert_eq!(loaded.mode, ActionMode::Comment);
    assert_eq!(loaded.iterations, 7);
    assert_eq!(loaded.profile.username, "tester");
}

#[test]
fn test_missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = make_config(dir.path());

    let loaded = load_settings(&settings_path(&config));
    assert_eq!(loaded.mode, ActionMode::Like);
    assert_eq!(loaded.iterations, BotConfig::default().iterations);
}

#[test]
fn test_corrupt_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = make_config(dir.path());
    let path = settings_path(&config);

    std::fs::write(&path, "{not json at all").unwrap();

    let loaded = load_settings(&path);
    assert_eq!(loaded.mode, ActionMode::Like);
}

#[test]
fn test_save_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("deeper").join("still-deeper");
    let config = make_config(&nested);
    let path = settings_path(&config);

    save_settings(&path, &BotConfig::default());
    assert!(path.exists());
}
