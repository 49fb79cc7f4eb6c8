//! # wpt-import Library
//!
//! Validates Website Parse Template (WPT) files and generates scrapy spider
//! and item source from them.
//!
//! ```no_run
//! use std::path::Path;
//! use wpt_import::{ImportCommand, MemorySink};
//!
//! let sink = MemorySink::new();
//! let outcome = ImportCommand::new(&sink).run(Path::new("mytemplate.xml"));
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod document;
pub mod domain;
pub mod error;
pub mod loader;
pub mod output;
pub mod render;
pub mod reporter;
pub mod rules;

pub use cli::{Cli, OutputFormat, VerbosityLevel};
pub use command::{CommandState, ImportCommand, ImportOutcome, import_file};
pub use config::{Config, ConfigError, ConfigManager, EnvProvider, SystemEnvProvider};
pub use document::{Block, Document, Locator, Template, UrlMapping};
pub use domain::{HostDomain, extract_domain};
pub use error::{ImportError, Result};
pub use loader::{load, parse_str};
pub use output::Output;
pub use render::{GeneratedSource, RenderOptions, SpiderSpec, render, render_with};
pub use reporter::{DiagnosticSink, MemorySink, Reporter, Severity};
pub use rules::{Rule, RuleOutcome, ValidationReport, check_all};
