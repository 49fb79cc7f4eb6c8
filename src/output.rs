//! Output for generated source and validation reports
//!
//! Generated source goes to stdout or to a file. Diagnostics never pass
//! through here; they belong to the reporter on stderr.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::render::GeneratedSource;
use crate::rules::ValidationReport;

/// Formatter for `--check` reports and generated source
pub struct Output {
    format: OutputFormat,
}

#[derive(Serialize)]
struct JsonRule<'a> {
    id: &'a str,
    passed: bool,
    message: &'a str,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    valid: bool,
    passed: usize,
    total: usize,
    rules: Vec<JsonRule<'a>>,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_report(&self, report: &ValidationReport) -> serde_json::Result<String> {
        match self.format {
            OutputFormat::Human => Ok(self.format_human(report)),
            OutputFormat::Json => self.format_json(report),
        }
    }

    fn format_human(&self, report: &ValidationReport) -> String {
        let mut output = String::new();

        for outcome in &report.outcomes {
            let status = if outcome.passed { "PASS" } else { "FAIL" };
            output.push_str(&format!(
                "{} {}: {}\n",
                status,
                outcome.rule.id(),
                outcome.rule.message()
            ));
        }

        output.push_str(&format!(
            "{} of {} rules passed\n",
            report.passed_count(),
            report.outcomes.len()
        ));
        output
    }

    fn format_json(&self, report: &ValidationReport) -> serde_json::Result<String> {
        let json = JsonReport {
            valid: report.is_valid(),
            passed: report.passed_count(),
            total: report.outcomes.len(),
            rules: report
                .outcomes
                .iter()
                .map(|o| JsonRule {
                    id: o.rule.id(),
                    passed: o.passed,
                    message: o.rule.message(),
                })
                .collect(),
        };

        let mut text = serde_json::to_string_pretty(&json)?;
        text.push('\n');
        Ok(text)
    }

    /// Write generated source to `destination`, or to stdout when unset
    pub fn write_source(
        &self,
        source: &GeneratedSource,
        destination: Option<&Path>,
    ) -> io::Result<()> {
        let text = format!("{}\n", source);
        match destination {
            Some(path) => fs::write(path, text),
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()
            }
        }
    }

    /// Print a validation report to stdout
    pub fn print_report(&self, report: &ValidationReport) -> io::Result<()> {
        let text = self.format_report(report)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()
    }
}
