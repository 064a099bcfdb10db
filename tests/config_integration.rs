//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use nightstreet::config::AppConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("NS_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "Test From Env");
    std::env::remove_var("NS_WINDOW__TITLE");
}

#[test]
#[serial]
fn test_env_override_nested_scene_value() {
    std::env::set_var("NS_SCENE__FOG__DENSITY", "0.05");
    std::env::set_var("NS_DEBUG__LEGACY_LIGHT_HANDLERS", "true");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("NS_SCENE__FOG__DENSITY");
    std::env::remove_var("NS_DEBUG__LEGACY_LIGHT_HANDLERS");

    assert_eq!(config.scene.fog.density, 0.05);
    assert_eq!(config.scene.fog.color, 0x5761ea);
    assert!(config.debug.legacy_light_handlers);
}

#[test]
#[serial]
fn test_default_file_matches_built_in_defaults() {
    let from_file = AppConfig::load().unwrap();
    let built_in = AppConfig::default();

    assert_eq!(from_file.scene, built_in.scene);
    assert_eq!(from_file.window.title, built_in.window.title);
    assert_eq!(from_file.camera.position, built_in.camera.position);
    assert_eq!(from_file.input.damping_factor, built_in.input.damping_factor);
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = std::env::temp_dir().join(format!("nightstreet-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("default.toml"), "[scene.fireflies]\namount = 40\n").unwrap();
    std::fs::write(dir.join("user.toml"), "[scene.fireflies]\namount = 7\nseed = 42\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(config.scene.fireflies.amount, 7);
    assert_eq!(config.scene.fireflies.seed, Some(42));
}

#[test]
#[serial]
fn test_invalid_value_reports_error() {
    std::env::set_var("NS_WINDOW__WIDTH", "wide");
    let result = AppConfig::load();
    std::env::remove_var("NS_WINDOW__WIDTH");

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}
