//! Tests for bootstrap configuration and root folder resolution
//!
//! Tests that manipulate SCHOOLOPS_* environment variables are marked
//! #[serial] so they never run concurrently.

use schoolops_common::config::{
    database_path, default_root_folder, resolve_root_folder, TomlConfig, CONFIG_FILE_ENV,
    DEFAULT_DATABASE_FILE, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

#[test]
fn test_empty_toml_uses_defaults() {
    let config = TomlConfig::from_toml_str("").unwrap();

    assert!(config.root_folder.is_none());
    assert!(config.database_path.is_none());
    assert!(config.port.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_full_toml_parses() {
    let config = TomlConfig::from_toml_str(
        r#"
        root_folder = "/srv/schoolops"
        database_path = "data/ops.db"
        port = 6000

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/schoolops")));
    assert_eq!(config.port, Some(6000));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_malformed_toml_is_config_error() {
    let result = TomlConfig::from_toml_str("port = \"not a number\"");
    assert!(matches!(result, Err(schoolops_common::Error::Config(_))));
}

#[test]
#[serial]
fn test_cli_argument_wins() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(Some(Path::new("/from/cli")), &config);
    env::remove_var(ROOT_FOLDER_ENV);

    assert_eq!(root, PathBuf::from("/from/cli"));
}

#[test]
#[serial]
fn test_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(None, &config);
    env::remove_var(ROOT_FOLDER_ENV);

    assert_eq!(root, PathBuf::from("/from/env"));
}

#[test]
#[serial]
fn test_toml_then_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };
    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/from/toml"));

    let root = resolve_root_folder(None, &TomlConfig::default());
    assert_eq!(root, default_root_folder());
    assert!(!root.as_os_str().is_empty());
}

#[test]
fn test_database_path_resolution() {
    let root = Path::new("/srv/schoolops");

    assert_eq!(
        database_path(root, &TomlConfig::default()),
        root.join(DEFAULT_DATABASE_FILE)
    );

    let relative = TomlConfig {
        database_path: Some(PathBuf::from("data/ops.db")),
        ..Default::default()
    };
    assert_eq!(database_path(root, &relative), root.join("data/ops.db"));

    let absolute = TomlConfig {
        database_path: Some(PathBuf::from("/var/db/ops.db")),
        ..Default::default()
    };
    assert_eq!(database_path(root, &absolute), PathBuf::from("/var/db/ops.db"));
}

#[test]
#[serial]
fn test_load_missing_file_degrades_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let config = TomlConfig::load(Some(&missing)).unwrap();
    assert!(config.port.is_none());
}

#[test]
#[serial]
fn test_load_from_config_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = 7001\n").unwrap();

    env::set_var(CONFIG_FILE_ENV, &path);
    let config = TomlConfig::load(None);
    env::remove_var(CONFIG_FILE_ENV);

    assert_eq!(config.unwrap().port, Some(7001));
}
