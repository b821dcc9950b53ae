//! Integration tests for engine configuration files.

use overworld_config::{ConfigError, DispatchPolicy, EngineConfig, STACK_CAPACITY};
use std::io::Write;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[primary]
enabled = false
dispatch = "single-instruction"

[level]
dispatch = "until-suspend"
max_instructions_per_tick = 8
"#
    )
    .unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    assert!(!config.primary.enabled);
    assert_eq!(config.level.dispatch, DispatchPolicy::UntilSuspend);
    assert_eq!(config.level.max_instructions_per_tick, 8);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    match EngineConfig::load(&path) {
        Err(ConfigError::Io { path: reported, .. }) => {
            assert!(reported.ends_with("absent.toml"));
        }
        other => panic!("expected io error, got {:?}", other),
    }
}

#[test]
fn test_round_trip_through_toml() {
    let mut config = EngineConfig::default();
    config.primary.dispatch = DispatchPolicy::UntilSuspend;
    config.level.enabled = false;

    let text = config.to_toml_string().unwrap();
    assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
}

#[test]
fn test_malformed_toml() {
    let err = EngineConfig::from_toml_str("[primary\nenabled = yes").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_stack_capacity_matches_engine_layout() {
    assert_eq!(STACK_CAPACITY, 20);
}
