use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::cli::VerbosityLevel;
use crate::error::ImportError;

/// Severity tag carried by every diagnostic line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver of severity-tagged diagnostics
///
/// The import command never reaches for a global logger; the caller hands it
/// a sink and owns its lifetime.
pub trait DiagnosticSink {
    fn emit(&self, severity: Severity, message: &str);

    fn error(&self, message: &str) {
        self.emit(Severity::Error, message);
    }

    fn warning(&self, message: &str) {
        self.emit(Severity::Warning, message);
    }

    fn info(&self, message: &str) {
        self.emit(Severity::Info, message);
    }

    fn debug(&self, message: &str) {
        self.emit(Severity::Debug, message);
    }

    /// Report an import failure as a single error line
    fn report_error(&self, error: &ImportError) {
        self.error(&error.to_string());
    }
}

/// Stderr reporter with configurable verbosity
pub struct Reporter {
    verbosity: VerbosityLevel,
    show_timestamps: bool,
}

impl Reporter {
    /// Create a new reporter with specified verbosity
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_timestamps: false,
        }
    }

    /// Create a new reporter with additional options
    pub fn with_options(verbosity: VerbosityLevel, show_timestamps: bool) -> Self {
        Self {
            verbosity,
            show_timestamps,
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    /// Lowest severity that is still printed
    pub fn threshold(&self) -> Severity {
        match self.verbosity {
            VerbosityLevel::Quiet => Severity::Error,
            VerbosityLevel::Normal => Severity::Warning,
            VerbosityLevel::Verbose => Severity::Info,
            VerbosityLevel::Debug => Severity::Debug,
        }
    }

    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity >= self.threshold()
    }

    /// Format one diagnostic line
    pub fn format_line(&self, severity: Severity, message: &str) -> String {
        let timestamp = if self.show_timestamps {
            format!("[{}] ", chrono::Local::now().format("%H:%M:%S"))
        } else {
            String::new()
        };

        format!("{}{}: {}", timestamp, severity, message)
    }
}

impl DiagnosticSink for Reporter {
    fn emit(&self, severity: Severity, message: &str) {
        if self.is_enabled(severity) {
            eprintln!("{}", self.format_line(severity, message));
        }
    }
}

/// Sink that keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: RefCell<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded diagnostics, oldest first
    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.borrow().clone()
    }

    /// Recorded messages of one severity
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Recorded diagnostics rendered as `SEVERITY: message` lines
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|(s, m)| format!("{}: {}", s, m))
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, severity: Severity, message: &str) {
        let mut entries = self.entries.borrow_mut();
        entries.push((severity, message.to_string()));
    }
}
