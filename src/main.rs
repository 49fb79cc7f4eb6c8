use std::process;

use anyhow::Context;

use wpt_import::{
    Cli, ConfigManager, DiagnosticSink, ImportCommand, ImportError, Output, Reporter,
    ValidationReport,
};

fn main() {
    // clap exits with status 2 on usage errors
    let cli = Cli::parse_args();

    if let Err(message) = cli.validate() {
        eprintln!("ERROR: {}", message);
        process::exit(2);
    }

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let config = ConfigManager::load_config(cli).context("Failed to load configuration")?;
    if let Err(e) = ConfigManager::check_output_target(&config, &cli.file) {
        eprintln!("ERROR: {}", e);
        return Ok(2);
    }

    let reporter = Reporter::with_options(
        ConfigManager::verbosity(&config),
        config.output.timestamps,
    );
    let output = Output::new(config.output.format);

    let mut command = ImportCommand::new(&reporter)
        .with_options(ConfigManager::render_options(&config))
        .validate_only(cli.check);

    match command.run(&cli.file) {
        Ok(outcome) => {
            match &outcome.source {
                Some(source) => {
                    let destination = config.output.file.as_deref();
                    output.write_source(source, destination).with_context(|| {
                        match destination {
                            Some(path) => format!("Failed to write {}", path.display()),
                            None => "Failed to write to stdout".to_string(),
                        }
                    })?;
                    if let Some(path) = destination {
                        reporter.info(&format!("Wrote {}", path.display()));
                    }
                }
                None => output.print_report(&outcome.report)?,
            }
            Ok(0)
        }
        Err(ImportError::ValidationFailed { failures }) => {
            if cli.check {
                output.print_report(&ValidationReport::from_failures(&failures))?;
            }
            Ok(1)
        }
        // The command already reported the failure through the reporter
        Err(_) => Ok(1),
    }
}
