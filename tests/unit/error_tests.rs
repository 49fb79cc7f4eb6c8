//! Error type tests
//!
//! The rendered messages are what users see after the `ERROR:` tag, so they
//! are checked verbatim.

use std::path::{Path, PathBuf};
use wpt_import::{Config, ConfigManager, ImportError, Rule};

#[test]
fn test_load_error_messages() {
    let not_found = ImportError::NotFound {
        path: PathBuf::from("some_non_existent_file"),
    };
    assert_eq!(not_found.to_string(), "File not found: some_non_existent_file");

    let malformed = ImportError::MalformedMarkup {
        path: PathBuf::from("/tmp/x/mytemplate.xml"),
        details: "unexpected end of stream".to_string(),
    };
    assert_eq!(
        malformed.to_string(),
        "There is a markup error in /tmp/x/mytemplate.xml"
    );

    assert!(not_found.is_load_error());
    assert!(malformed.is_load_error());
}

#[test]
fn test_validation_failed_counts_rules() {
    let error = ImportError::ValidationFailed {
        failures: vec![Rule::HostUrl, Rule::UrlSection],
    };
    assert_eq!(error.to_string(), "WPT validation failed: 2 rule(s) broken");
    assert!(!error.is_load_error());
}

#[test]
fn test_config_failure_propagates_as_import_error() {
    fn load_config(path: &Path) -> wpt_import::Result<Config> {
        Ok(ConfigManager::load_from_file(path)?)
    }

    match load_config(Path::new("/nonexistent/wpt-import.toml")) {
        Err(ImportError::Config(message)) => assert!(message.starts_with("IO error")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}
