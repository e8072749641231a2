//! Configuration tests
//!
//! The round-trip tests guard `to_toml()`: every field written to the template
//! must parse back to the same value.

use super::*;
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn parse(toml_str: &str) -> FileConfig {
    toml::from_str(toml_str)
        .unwrap_or_else(|e| panic!("TOML should parse.\nTOML:\n{}\nError: {}", toml_str, e))
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let reloaded = Config::from_sources(parse(&config.to_toml()), no_env);

    assert_eq!(reloaded.backend_url, config.backend_url);
    assert_eq!(reloaded.export_dir, config.export_dir);
    assert_eq!(reloaded.theme, config.theme);
    assert_eq!(reloaded.ui.variant, config.ui.variant);
    assert_eq!(reloaded.ui.toast_secs, 4);
    assert_eq!(reloaded.logging.file_rotation, LogRotation::Daily);
}

#[test]
fn test_config_roundtrip_customized() {
    let mut config = Config::default();
    config.backend_url = "https://fiches.example.com/api".to_string();
    config.export_dir = PathBuf::from("/tmp/fiches");
    config.theme = "nord".to_string();
    config.ui.variant = CardVariant::Simple;
    config.ui.lazy_tabs = true;
    config.ui.toast_secs = 9;
    config.ui.list_limit = 0;
    config.logging.level = "debug".to_string();
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Never;
    config.logging.file_prefix = "fg".to_string();

    let reloaded = Config::from_sources(parse(&config.to_toml()), no_env);

    assert_eq!(reloaded.backend_url, "https://fiches.example.com/api");
    assert_eq!(reloaded.export_dir, PathBuf::from("/tmp/fiches"));
    assert_eq!(reloaded.theme, "nord");
    assert_eq!(reloaded.ui.variant, CardVariant::Simple);
    assert!(reloaded.ui.lazy_tabs);
    assert_eq!(reloaded.ui.toast_secs, 9);
    assert_eq!(reloaded.ui.list_limit, 0);
    assert_eq!(reloaded.logging.level, "debug");
    assert!(reloaded.logging.file_enabled);
    assert_eq!(reloaded.logging.file_rotation, LogRotation::Never);
    assert_eq!(reloaded.logging.file_prefix, "fg");
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_env_overrides_file() {
    let file = parse(
        r#"
backend_url = "http://file/api"
theme = "dracula"
"#,
    );
    let env: HashMap<&str, &str> = [
        ("FICHEGEN_BACKEND_URL", "http://env/api"),
        ("FICHEGEN_DEMO", "true"),
        ("FICHEGEN_NO_TUI", "1"),
    ]
    .into_iter()
    .collect();

    let config = Config::from_sources(file, |k| env.get(k).map(|v| v.to_string()));

    assert_eq!(config.backend_url, "http://env/api");
    assert_eq!(config.theme, "dracula");
    assert!(config.demo_mode);
    assert!(!config.enable_tui);
}

#[test]
fn test_missing_sections_use_defaults() {
    let config = Config::from_sources(parse(""), no_env);
    assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    assert!(config.enable_tui);
    assert!(!config.demo_mode);
    assert_eq!(config.ui.list_limit, 50);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_unknown_enum_values_fall_back() {
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
    assert_eq!(LogRotation::parse("HOURLY"), LogRotation::Hourly);
    assert_eq!(CardVariant::from_str("fancy"), CardVariant::Detailed);
    assert_eq!(CardVariant::from_str("compact"), CardVariant::Simple);
}

#[test]
fn test_controller_settings_mapping() {
    let mut config = Config::default();
    config.ui.list_limit = 0;
    config.ui.toast_secs = 2;
    let settings = config.controller_settings();
    assert_eq!(settings.list_limit, None);
    assert_eq!(settings.alert_ttl, std::time::Duration::from_secs(2));

    config.ui.list_limit = 20;
    assert_eq!(config.controller_settings().list_limit, Some(20));
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_log_level_env_and_validation() {
    let file = parse(
        r#"
[logging]
level = "WARN"
"#,
    );
    let config = Config::from_sources(file, no_env);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(
        config.logging.filter_directive(),
        "fichegen=warn,reqwest=warn,hyper=warn,axum=warn"
    );

    let env = |k: &str| (k == "FICHEGEN_LOG_LEVEL").then(|| "verbose".to_string());
    let config = Config::from_sources(parse(""), env);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_log_dir_env_enables_file_logging() {
    let file = parse(
        r#"
[logging]
file_enabled = false
file_prefix = ""
"#,
    );
    let env = |k: &str| (k == "FICHEGEN_LOG_DIR").then(|| "/tmp/fichegen-logs".to_string());
    let config = Config::from_sources(file, env);

    assert!(config.logging.file_enabled);
    assert_eq!(config.logging.file_dir, PathBuf::from("/tmp/fichegen-logs"));
    assert_eq!(config.logging.file_prefix, "fichegen");
}
