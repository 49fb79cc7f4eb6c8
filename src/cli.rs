use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbosityLevel {
    /// Only show errors
    Quiet,
    /// Show warnings and errors
    #[default]
    Normal,
    /// Also show progress information
    Verbose,
    /// Show all available debugging information
    Debug,
}

/// Format of the validation report printed by `--check`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per rule
    #[default]
    Human,
    /// Machine-readable report
    Json,
}

/// Import a Website Parse Template and generate a spider for it
#[derive(Parser, Debug, Clone)]
#[command(name = "wpt-import")]
#[command(about = "Validate a WPT file and generate spider source from it")]
#[command(version)]
pub struct Cli {
    /// WPT file to import
    #[arg(help = "WPT (Website Parse Template) XML file")]
    pub file: PathBuf,

    /// Write generated source to a file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Configuration file (TOML or JSON)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Name of the generated spider
    #[arg(long = "spider-name")]
    pub spider_name: Option<String>,

    /// Template to render instead of the first one
    #[arg(long = "template")]
    pub template: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", help = "Enable verbose output")]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long = "debug", conflicts_with = "quiet")]
    pub debug: bool,

    /// Enable quiet mode (errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Prefix diagnostics with the time of day
    #[arg(long = "timestamps")]
    pub timestamps: bool,

    /// Validate only, do not generate source
    #[arg(long = "check")]
    pub check: bool,

    /// Report format for --check
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.debug {
            VerbosityLevel::Debug
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.spider_name
            && name.trim().is_empty()
        {
            return Err("Spider name must not be empty".to_string());
        }
        if let Some(output) = &self.output
            && output == &self.file
        {
            return Err(format!(
                "Refusing to overwrite the input file: {}",
                output.display()
            ));
        }
        Ok(())
    }
}
