use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tempfile::TempDir;

use wpt_import::config::RenderConfig;
use wpt_import::{Cli, Config, ConfigManager, EnvProvider, OutputFormat, VerbosityLevel};

struct FixedEnv(HashMap<&'static str, &'static str>);

impl EnvProvider for FixedEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|v| v.to_string())
    }
}

fn empty_env() -> FixedEnv {
    FixedEnv(HashMap::new())
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.render.spider_name, None);
    assert_eq!(config.output.format, OutputFormat::Human);
    assert_eq!(ConfigManager::verbosity(&config), VerbosityLevel::Normal);
    assert!(ConfigManager::validate_config(&config).is_ok());
}

#[test]
fn test_partial_toml_file_keeps_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("wpt-import.toml");
    fs::write(&path, "[output]\ntimestamps = true\n").unwrap();

    let config = ConfigManager::load_from_file(&path).unwrap();
    assert!(config.output.timestamps);
    assert!(!config.output.verbose);
    assert_eq!(config.render, RenderConfig::default());
}

#[test]
fn test_cli_overrides_file_and_environment() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{"render": {"spider_name": "file_name"}, "output": {"verbose": true}}"#,
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "wpt-import",
        "-c",
        path.to_str().unwrap(),
        "-q",
        "-o",
        "spider.py",
        "input.xml",
    ])
    .unwrap();
    let env = FixedEnv(HashMap::from([("WPT_IMPORT_SPIDER_NAME", "env_name")]));

    let config = ConfigManager::load_config_with(&env, &cli).unwrap();

    assert_eq!(config.render.spider_name.as_deref(), Some("env_name"));
    assert_eq!(config.output.file, Some(PathBuf::from("spider.py")));
    assert_eq!(ConfigManager::verbosity(&config), VerbosityLevel::Quiet);
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    fs::write(&path, "[output]\nverbose = true\nquiet = true\n").unwrap();

    let cli = Cli::try_parse_from(["wpt-import", "-c", path.to_str().unwrap(), "in.xml"]).unwrap();
    assert!(ConfigManager::load_config_with(&empty_env(), &cli).is_err());
}

#[test]
fn test_missing_config_file_is_an_error() {
    let cli = Cli::try_parse_from(["wpt-import", "-c", "/nonexistent/wpt-import.toml", "in.xml"])
        .unwrap();
    assert!(ConfigManager::load_config_with(&empty_env(), &cli).is_err());
}
