use std::io::Write;

use lumen_runtime::{LevelConfig, RuntimeConfig, RuntimeError};
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_full_ron_file() {
    let file = config_file(
        r#"(
            seed: 1234,
            level: (
                width: 64,
                height: 48,
                wall_density: 0.05,
                monsters: 2,
                items: 3,
                torches: 1,
            ),
            message_capacity: 16,
            logging: (directive: "lumen=trace", to_file: true, directory: Some("/tmp/lumen-logs")),
        )"#,
    );

    let config = RuntimeConfig::load(file.path()).unwrap();
    assert_eq!(config.seed, 1234);
    assert_eq!(
        config.level,
        LevelConfig {
            width: 64,
            height: 48,
            wall_density: 0.05,
            monsters: 2,
            items: 3,
            torches: 1,
        }
    );
    assert_eq!(config.message_capacity, 16);
    assert_eq!(config.logging.directive, "lumen=trace");
    assert!(config.logging.to_file);
}

#[test]
fn missing_fields_keep_defaults() {
    let file = config_file("(seed: 9, level: (width: 20))");

    let config = RuntimeConfig::load(file.path()).unwrap();
    let defaults = RuntimeConfig::default();
    assert_eq!(config.seed, 9);
    assert_eq!(config.level.width, 20);
    assert_eq!(config.level.height, defaults.level.height);
    assert_eq!(config.player, defaults.player);
    assert_eq!(config.logging, defaults.logging);
}

#[test]
fn malformed_file_reports_parse_error() {
    let file = config_file("(seed: \"not a number\")");

    let err = RuntimeConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, RuntimeError::ConfigParse { .. }));
}

#[test]
fn missing_file_reports_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RuntimeConfig::load(dir.path().join("absent.ron")).unwrap_err();
    assert!(matches!(err, RuntimeError::ConfigRead { .. }));
}

#[test]
fn out_of_range_values_are_rejected() {
    let file = config_file("(level: (wall_density: 2.0))");
    let err = RuntimeConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidConfig(_)));

    let file = config_file("(level: (height: 0))");
    let err = RuntimeConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidConfig(_)));

    let file = config_file("(player: (vision_radius: 5000000))");
    let err = RuntimeConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidConfig(_)));
}
