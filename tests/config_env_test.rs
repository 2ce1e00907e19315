//! Environment layer of Settings::load.
//!
//! Kept in its own test binary: the variables set here are process-wide and
//! would leak into the file-based config tests.

use std::env;
use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use regiontree::config::Settings;
use regiontree::domain::SiblingOrder;

#[test]
fn given_regiontree_env_vars_when_load_then_override_config_file() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("regiontree.toml");
    fs::write(
        &path,
        "username = \"from-file\"\nthrottle_secs = 3.0\n\n[export]\nsibling_order = \"id\"\n",
    )
    .unwrap();
    env::set_var("REGIONTREE_USERNAME", "from-env");
    env::set_var("REGIONTREE_THROTTLE_SECS", "0.25");
    env::set_var("REGIONTREE_EXPORT__SIBLING_ORDER", "name");

    // Act
    let result = Settings::load(Some(&path));
    env::remove_var("REGIONTREE_USERNAME");
    env::remove_var("REGIONTREE_THROTTLE_SECS");
    env::remove_var("REGIONTREE_EXPORT__SIBLING_ORDER");
    let settings = result.expect("load settings");

    // Assert
    assert_eq!(settings.username, "from-env");
    assert_eq!(settings.throttle().unwrap(), Duration::from_millis(250));
    assert_eq!(settings.export.sibling_order, SiblingOrder::Name);
}
