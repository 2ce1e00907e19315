//! Integration tests for Settings loading from explicit config files.
//!
//! These tests only use temp directories; a global config on the test
//! machine would be merged underneath but is overridden by every key set here.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use regiontree::application::services::ResolverSettings;
use regiontree::application::ApplicationError;
use regiontree::config::Settings;
use regiontree::domain::SiblingOrder;

#[test]
fn given_explicit_config_when_load_then_values_applied() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("regiontree.toml");
    let content = r#"
username = "alice"
throttle_secs = 0.5
host = "secure.geonames.org"
secure = true
timeout_secs = 5
output_dir = "/tmp/maps"

[export]
sibling_order = "name"
"#;
    fs::write(&path, content).unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.username, "alice");
    assert_eq!(settings.throttle().unwrap(), Duration::from_millis(500));
    assert_eq!(settings.base_url(), "https://secure.geonames.org/");
    assert_eq!(settings.timeout(), Duration::from_secs(5));
    assert_eq!(settings.output_dir, PathBuf::from("/tmp/maps"));
    assert_eq!(settings.export.sibling_order, SiblingOrder::Name);
}

#[test]
fn given_loaded_settings_when_deriving_resolver_settings_then_carries_account_and_throttle() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("regiontree.toml");
    fs::write(
        &path,
        "username = \"bob\"\nthrottle_secs = 2.0\nhost = \"api.geonames.org\"\nsecure = false\n",
    )
    .unwrap();

    let settings = Settings::load(Some(&path)).unwrap();
    let resolver = ResolverSettings::from_settings(&settings).unwrap();

    assert_eq!(resolver.base_url, "http://api.geonames.org/");
    assert_eq!(resolver.username, "bob");
    assert_eq!(resolver.throttle, Duration::from_secs(2));
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();

    let result = Settings::load(Some(&temp.path().join("absent.toml")));

    match result {
        Err(ApplicationError::Config { message }) => {
            assert!(message.contains("absent.toml"), "message: {message}")
        }
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn given_malformed_toml_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("regiontree.toml");
    fs::write(&path, "username = [unterminated").unwrap();

    assert!(matches!(
        Settings::load(Some(&path)),
        Err(ApplicationError::Config { .. })
    ));
}

#[test]
fn given_negative_throttle_in_file_when_load_then_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("regiontree.toml");
    fs::write(&path, "throttle_secs = -1.0\n").unwrap();

    assert!(matches!(
        Settings::load(Some(&path)),
        Err(ApplicationError::Config { .. })
    ));
}

#[test]
fn given_unknown_sibling_order_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("regiontree.toml");
    fs::write(&path, "[export]\nsibling_order = \"random\"\n").unwrap();

    assert!(matches!(
        Settings::load(Some(&path)),
        Err(ApplicationError::Config { .. })
    ));
}
