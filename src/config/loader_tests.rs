//! Tests for resource file loading.

use super::*;
use crate::config::{parse_flags, FlagOutcome};
use ratatui::style::Color;
use serial_test::serial;
use std::env;
use std::fs;

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(name);
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

#[test]
fn default_config_path_contains_dzbar_config_toml() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("dzbar") && path_str.ends_with("config.toml"),
        "Path should contain 'dzbar' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn default_log_path_ends_with_dzbar_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("dzbar.log"),
        "Default log path should end with 'dzbar.log', got: {:?}",
        path
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = write_temp(
        "dzbar_test_config.toml",
        r##"
font = "-misc-fixed-medium-r-normal--13-*"
foreground = "#ffffff"
background = "black"
title_name = "status"
slave_name = "details"
log_file_path = "/tmp/dzbar-test.log"
"##,
    );

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.font.as_deref(), Some("-misc-fixed-medium-r-normal--13-*"));
    assert_eq!(config.foreground.as_deref(), Some("#ffffff"));
    assert_eq!(config.background.as_deref(), Some("black"));
    assert_eq!(config.title_name.as_deref(), Some("status"));
    assert_eq!(config.slave_name.as_deref(), Some("details"));
    assert_eq!(config.log_file_path, Some(PathBuf::from("/tmp/dzbar-test.log")));

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = write_temp("dzbar_test_invalid.toml", "font = [unclosed");

    let result = load_config_file(&config_path);
    assert!(
        matches!(result, Err(ConfigError::ParseError { .. })),
        "Invalid TOML should be a parse error, got: {:?}",
        result
    );

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_rejects_unknown_keys() {
    let config_path = write_temp("dzbar_test_unknown_key.toml", "theme = \"dark\"\n");

    let result = load_config_file(&config_path);
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));

    fs::remove_file(config_path).ok();
}

#[test]
fn merge_config_without_file_returns_defaults() {
    let resolved = merge_config(None).expect("defaults always merge");
    assert_eq!(resolved, ResolvedConfig::default());
}

#[test]
fn merge_config_applies_file_values() {
    let file = ConfigFile {
        foreground: Some("#ff0000".to_string()),
        background: Some("blue".to_string()),
        title_name: Some("bar".to_string()),
        log_file_path: Some(PathBuf::from("/custom/app.log")),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(file)).expect("valid colours");
    assert_eq!(resolved.options.foreground, Color::Rgb(0xff, 0, 0));
    assert_eq!(resolved.options.background, Color::Blue);
    assert_eq!(resolved.options.title_name, "bar");
    assert_eq!(resolved.options.slave_name, "dzen slave");
    assert_eq!(resolved.log_file_path, PathBuf::from("/custom/app.log"));
}

#[test]
fn merge_config_applies_alignment_and_actions() {
    let file = ConfigFile {
        title_align: Some("right".to_string()),
        slave_align: Some("c".to_string()),
        actions: Some("button1=exit:2".to_string()),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(file)).expect("valid file");
    assert_eq!(resolved.options.title_align, Alignment::Right);
    assert_eq!(resolved.options.slave_align, Alignment::Center);
    assert_eq!(resolved.options.actions.as_deref(), Some("button1=exit:2"));
}

#[test]
fn file_actions_yield_to_the_e_flag() {
    let file = ConfigFile {
        actions: Some("button1=exit:2".to_string()),
        ..ConfigFile::default()
    };
    let resolved = merge_config(Some(file)).expect("valid file");
    let args = ["-e".to_string(), "button3=exit".to_string()];
    let FlagOutcome::Run(options) = parse_flags(&args, resolved.options).expect("flags") else {
        panic!("expected run");
    };
    assert_eq!(options.actions.as_deref(), Some("button3=exit"));
}

#[test]
fn merge_config_rejects_unknown_colour() {
    let file = ConfigFile {
        background: Some("no-such-colour".to_string()),
        ..ConfigFile::default()
    };

    let result = merge_config(Some(file));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            key: "background",
            ..
        })
    ));
}

#[test]
#[serial(env)]
fn explicit_path_takes_precedence_over_env() {
    let explicit = write_temp("dzbar_test_explicit.toml", "title_name = \"explicit\"\n");
    let from_env = write_temp("dzbar_test_env.toml", "title_name = \"env\"\n");

    env::set_var(CONFIG_ENV, &from_env);
    let config = load_config_with_precedence(Some(explicit.clone()))
        .expect("loads")
        .expect("file exists");
    env::remove_var(CONFIG_ENV);

    assert_eq!(config.title_name.as_deref(), Some("explicit"));

    fs::remove_file(explicit).ok();
    fs::remove_file(from_env).ok();
}

#[test]
#[serial(env)]
fn env_path_used_when_no_explicit_path() {
    let from_env = write_temp("dzbar_test_env_only.toml", "slave_name = \"env\"\n");

    env::set_var(CONFIG_ENV, &from_env);
    let config = load_config_with_precedence(None)
        .expect("loads")
        .expect("file exists");
    env::remove_var(CONFIG_ENV);

    assert_eq!(config.slave_name.as_deref(), Some("env"));

    fs::remove_file(from_env).ok();
}

#[test]
#[serial(env)]
fn empty_env_path_is_invalid() {
    env::set_var(CONFIG_ENV, "");
    let result = load_config_with_precedence(None);
    env::remove_var(CONFIG_ENV);

    assert!(matches!(result, Err(ConfigError::InvalidPath(_))));
}

#[test]
#[serial(env)]
fn env_log_file_override() {
    env::set_var(LOG_FILE_ENV, "/tmp/from-env.log");
    let config = apply_env_overrides(ResolvedConfig::default());
    env::remove_var(LOG_FILE_ENV);

    assert_eq!(config.log_file_path, PathBuf::from("/tmp/from-env.log"));
}

#[test]
fn cli_log_file_overrides_everything() {
    let base = ResolvedConfig {
        log_file_path: PathBuf::from("/from/file.log"),
        ..ResolvedConfig::default()
    };

    let config = apply_cli_overrides(base.clone(), Some(PathBuf::from("/from/cli.log")));
    assert_eq!(config.log_file_path, PathBuf::from("/from/cli.log"));

    let config = apply_cli_overrides(base, None);
    assert_eq!(config.log_file_path, PathBuf::from("/from/file.log"));
}
