//! Tests for launcher configuration loading and defaults

use devtray::config::LauncherConfig;

#[test]
fn test_default_general_config() {
    let config = LauncherConfig::default();

    assert_eq!(config.general.poll_interval_ms, 2000);
    assert_eq!(config.general.browser_delay_ms, 2000);
    assert!(config
        .general
        .icon_path
        .to_string_lossy()
        .contains("undertale-sans.jpg"));
}

#[test]
fn test_default_services() {
    let config = LauncherConfig::default();

    assert_eq!(config.services.len(), 2);

    let backend = &config.services[0];
    assert_eq!(backend.name, "backend");
    assert_eq!(backend.url, "http://localhost:4000/");
    assert!(!backend.open_on_start);
    assert!(!backend.command.is_empty());

    let frontend = &config.services[1];
    assert_eq!(frontend.name, "frontend");
    assert_eq!(frontend.url, "http://localhost:5173/");
    assert!(frontend.open_on_start);
}

#[test]
fn test_default_logging_settings() {
    let config = LauncherConfig::default();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.max_file_size, 5 * 1024 * 1024);
    assert_eq!(config.logging.max_files, 3);
}

#[test]
fn test_config_roundtrip() {
    let mut config = LauncherConfig::default();
    config.general.poll_interval_ms = 500;
    config.services[0].url = "http://localhost:8080/".to_string();
    config.logging.level = "debug".to_string();

    let toml_str = toml::to_string(&config).expect("Serialization failed");
    let parsed: LauncherConfig = toml::from_str(&toml_str).expect("Deserialization failed");

    assert_eq!(parsed.general.poll_interval_ms, 500);
    assert_eq!(parsed.services[0].url, "http://localhost:8080/");
    assert_eq!(parsed.logging.level, "debug");
}

#[test]
fn test_partial_config_gets_defaults() {
    // Missing sections and fields fall back to defaults
    let partial_toml = r#"
        [general]
        poll_interval_ms = 1000
    "#;

    let config: LauncherConfig = toml::from_str(partial_toml).expect("parse failed");

    assert_eq!(config.general.poll_interval_ms, 1000);
    assert_eq!(config.general.browser_delay_ms, 2000);
    assert_eq!(config.services.len(), 2);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_custom_service_list() {
    let custom = r#"
        [[services]]
        name = "api"
        command = ["sh", "-c", "cargo run"]
        url = "http://localhost:3000/"
        open_on_start = true
    "#;

    let config: LauncherConfig = toml::from_str(custom).expect("parse failed");

    assert_eq!(config.services.len(), 1);
    assert_eq!(config.services[0].name, "api");
    assert!(config.services[0].open_on_start);
}
