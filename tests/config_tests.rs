//! Tests for launcher configuration loading.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use warmstart::{BootstrapConfig, Error};

fn scratch_file(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("warmstart-cfg-{}", uuid::Uuid::now_v7()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_defaults_are_usable() {
    let config = BootstrapConfig::default();
    assert!(!config.code_search_path.is_empty());
    assert!(!config.app_library.is_empty());
    assert_eq!(config.warmup_delay(), warmstart::WARMUP_DELAY);
}

#[test]
fn test_partial_file_is_filled_with_defaults() {
    let path = scratch_file("config.json", r#"{ "warmup_delay_ms": 250 }"#);
    let config = BootstrapConfig::load_from(&path).unwrap();
    assert_eq!(config.warmup_delay(), Duration::from_millis(250));
    assert!(!config.app_library.is_empty());
}

#[test]
fn test_full_file_overrides_everything() {
    let path = scratch_file(
        "config.json",
        r#"{
            "resource_root": "/opt/editor/resources",
            "code_search_path": ["/opt/editor/core", "/opt/editor/plugins"],
            "app_library": "libmyeditor.so",
            "warmup_delay_ms": 1500
        }"#,
    );
    let config = BootstrapConfig::load_from(&path).unwrap();
    assert_eq!(config.resource_root, PathBuf::from("/opt/editor/resources"));
    assert_eq!(config.code_search_path.len(), 2);
    assert_eq!(config.app_library, "libmyeditor.so");
    assert_eq!(config.warmup_delay(), Duration::from_millis(1500));
}

#[test]
fn test_invalid_json_is_a_config_error() {
    let path = scratch_file("config.json", "{ not json }");
    let err = BootstrapConfig::load_from(&path).unwrap_err();
    match err {
        Error::Config { path: p, .. } => assert_eq!(p, path),
        other => panic!("expected Config error, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_an_io_error() {
    let err = BootstrapConfig::load_from(std::path::Path::new("/definitely/not/here.json"))
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
