//! Import command orchestration
//!
//! One [`ImportCommand`] drives a single file through
//! `Idle -> Loading -> Validating -> Rendering -> Done`. Any failure moves it
//! to `Errored`, which is terminal. Diagnostics go to the injected
//! [`DiagnosticSink`]: one line for a load or render failure, one line per
//! broken rule for a validation failure.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};
use crate::loader;
use crate::render::{self, GeneratedSource, RenderOptions};
use crate::reporter::DiagnosticSink;
use crate::rules::{self, ValidationReport};

/// Phase of the import process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandState {
    /// Not started
    Idle,
    /// Reading and parsing the file
    Loading,
    /// Checking business rules
    Validating,
    /// Generating spider source
    Rendering,
    /// Finished successfully
    Done,
    /// Stopped on a failure
    Errored,
}

impl CommandState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CommandState::Done | CommandState::Errored)
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub report: ValidationReport,
    /// `None` when the command only validates
    pub source: Option<GeneratedSource>,
}

/// Single-shot import of one WPT file
pub struct ImportCommand<'a> {
    sink: &'a dyn DiagnosticSink,
    options: RenderOptions,
    validate_only: bool,
    state: CommandState,
    history: Vec<CommandState>,
}

impl<'a> ImportCommand<'a> {
    pub fn new(sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            sink,
            options: RenderOptions::default(),
            validate_only: false,
            state: CommandState::Idle,
            history: vec![CommandState::Idle],
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Stop after validation instead of rendering
    pub fn validate_only(mut self, validate_only: bool) -> Self {
        self.validate_only = validate_only;
        self
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    /// Every state visited so far, starting with `Idle`
    pub fn history(&self) -> &[CommandState] {
        &self.history
    }

    /// Load, validate and render `path`
    ///
    /// State changes are recorded in [`ImportCommand::history`], not reported
    /// to the sink. A file that fails to load produces exactly one diagnostic.
    pub fn run(&mut self, path: &Path) -> Result<ImportOutcome> {
        if self.state != CommandState::Idle {
            return Err(ImportError::AlreadyRun);
        }

        self.transition(CommandState::Loading);
        let document = loader::load(path).map_err(|e| self.fail(e))?;
        let loaded = format!(
            "Loaded {} template(s) and {} url section(s) from {}",
            document.templates.len(),
            document.url_mappings.len(),
            path.display()
        );
        self.sink.debug(&loaded);

        self.transition(CommandState::Validating);
        let report = rules::check_all(&document);
        let failures = report.failures();
        for rule in &failures {
            self.sink.error(rule.message());
        }
        let summary = format!(
            "{} of {} rules passed",
            report.passed_count(),
            report.outcomes.len()
        );
        self.sink.info(&summary);
        if !failures.is_empty() {
            self.transition(CommandState::Errored);
            return Err(ImportError::ValidationFailed { failures });
        }

        if self.validate_only {
            self.transition(CommandState::Done);
            return Ok(ImportOutcome {
                report,
                source: None,
            });
        }

        self.transition(CommandState::Rendering);
        let spec = render::build_spec(&document, &self.options).map_err(|e| self.fail(e))?;
        if spec.start_urls.is_empty() {
            let warning = format!("Spider {} has no start urls", spec.spider_name);
            self.sink.warning(&warning);
        }
        let source = render::render_spec(&spec);
        let generated = format!(
            "Generated spider {} with {} field(s) for {}",
            spec.spider_name,
            spec.fields.len(),
            spec.domain
        );
        self.sink.info(&generated);

        self.transition(CommandState::Done);
        Ok(ImportOutcome {
            report,
            source: Some(source),
        })
    }

    fn transition(&mut self, next: CommandState) {
        self.state = next;
        self.history.push(next);
    }

    fn fail(&mut self, error: ImportError) -> ImportError {
        self.sink.report_error(&error);
        self.transition(CommandState::Errored);
        error
    }
}

/// Convenience wrapper: run a fresh command over `path`
pub fn import_file(
    path: &Path,
    sink: &dyn DiagnosticSink,
    options: RenderOptions,
) -> Result<ImportOutcome> {
    ImportCommand::new(sink).with_options(options).run(path)
}
