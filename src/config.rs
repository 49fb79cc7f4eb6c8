use crate::cli::{Cli, OutputFormat, VerbosityLevel};
use crate::render::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub output: OutputConfig,
}

/// Spider generation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct RenderConfig {
    /// Name of the generated spider (defaults to the site name)
    pub spider_name: Option<String>,
    /// Template to render (defaults to the first one)
    pub template: Option<String>,
}

/// Output and diagnostics settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination file for generated source (stdout when unset)
    pub file: Option<PathBuf>,
    /// Report format for validate-only runs
    pub format: OutputFormat,
    /// Verbose output
    pub verbose: bool,
    /// Debug output
    pub debug: bool,
    /// Quiet mode (errors only)
    pub quiet: bool,
    /// Timestamp every diagnostic line
    pub timestamps: bool,
}

const CONFIG_NAMES: [&str; 4] = [
    "wpt-import.toml",
    "wpt-import.json",
    ".wpt-import.toml",
    ".wpt-import.json",
];

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: file -> environment -> CLI
    pub fn load_config(cli: &Cli) -> Result<Config> {
        Self::load_config_with(&SystemEnvProvider, cli)
    }

    /// Same as [`ConfigManager::load_config`] with a custom environment provider
    pub fn load_config_with(env: &impl EnvProvider, cli: &Cli) -> Result<Config> {
        let mut config = Config::default();

        if let Some(config_path) = &cli.config {
            let file_config = Self::load_from_file(config_path)?;
            config = Self::merge_configs(config, file_config);
        } else if let Some(found_config) = Self::find_config_file()? {
            config = Self::merge_configs(config, found_config);
        }

        config = Self::apply_environment_overrides_with(env, config)?;

        // CLI arguments have the highest precedence
        config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find configuration file in standard locations
    pub fn find_config_file() -> Result<Option<Config>> {
        Self::find_config_file_in(Path::new("."))
    }

    /// Look in `dir` first, then in the user config directory
    pub fn find_config_file_in(dir: &Path) -> Result<Option<Config>> {
        for name in &CONFIG_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path)?));
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("wpt-import");
            for name in &CONFIG_NAMES {
                let path = app_config_dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path)?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides using the system environment
    pub fn apply_environment_overrides(config: Config) -> Result<Config> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, config)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        // Render settings
        if let Some(name) = env.get("WPT_IMPORT_SPIDER_NAME") {
            config.render.spider_name = Some(name);
        }

        if let Some(template) = env.get("WPT_IMPORT_TEMPLATE") {
            config.render.template = Some(template);
        }

        // Output settings
        if let Some(file) = env.get("WPT_IMPORT_OUTPUT") {
            config.output.file = Some(PathBuf::from(file));
        }

        if let Some(format) = env.get("WPT_IMPORT_FORMAT") {
            config.output.format = match format.to_lowercase().as_str() {
                "human" => OutputFormat::Human,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::Environment(format!(
                        "Invalid WPT_IMPORT_FORMAT value: {}",
                        format
                    )));
                }
            };
        }

        config.output.verbose = Self::env_flag(env, "WPT_IMPORT_VERBOSE", config.output.verbose)?;
        config.output.debug = Self::env_flag(env, "WPT_IMPORT_DEBUG", config.output.debug)?;
        config.output.quiet = Self::env_flag(env, "WPT_IMPORT_QUIET", config.output.quiet)?;
        config.output.timestamps =
            Self::env_flag(env, "WPT_IMPORT_TIMESTAMPS", config.output.timestamps)?;

        Ok(config)
    }

    fn env_flag(env: &impl EnvProvider, key: &str, current: bool) -> Result<bool> {
        match env.get(key) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Environment(format!("Invalid {} value: {}", key, value))),
            None => Ok(current),
        }
    }

    /// Merge CLI arguments with configuration (CLI takes precedence when given)
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if cli.spider_name.is_some() {
            config.render.spider_name = cli.spider_name.clone();
        }
        if cli.template.is_some() {
            config.render.template = cli.template.clone();
        }

        if cli.output.is_some() {
            config.output.file = cli.output.clone();
        }
        if cli.format != OutputFormat::default() {
            config.output.format = cli.format;
        }

        // A verbosity flag on the command line replaces whatever was configured
        if cli.verbose || cli.debug || cli.quiet {
            config.output.verbose = cli.verbose;
            config.output.debug = cli.debug;
            config.output.quiet = cli.quiet;
        }
        config.output.timestamps |= cli.timestamps;

        config
    }

    /// Merge two configurations (second takes precedence for set values)
    pub fn merge_configs(mut base: Config, override_config: Config) -> Config {
        if override_config.render.spider_name.is_some() {
            base.render.spider_name = override_config.render.spider_name;
        }
        if override_config.render.template.is_some() {
            base.render.template = override_config.render.template;
        }

        if override_config.output.file.is_some() {
            base.output.file = override_config.output.file;
        }
        base.output.format = override_config.output.format;
        base.output.verbose = override_config.output.verbose;
        base.output.debug = override_config.output.debug;
        base.output.quiet = override_config.output.quiet;
        base.output.timestamps = override_config.output.timestamps;

        base
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        if let Some(name) = &config.render.spider_name {
            if name.is_empty() {
                return Err(ConfigError::Validation(
                    "Spider name must not be empty".to_string(),
                ));
            }
            if !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            {
                return Err(ConfigError::Validation(format!(
                    "Invalid spider name: {}",
                    name
                )));
            }
        }

        if let Some(template) = &config.render.template
            && template.is_empty()
        {
            return Err(ConfigError::Validation(
                "Template name must not be empty".to_string(),
            ));
        }

        if config.output.quiet && (config.output.verbose || config.output.debug) {
            return Err(ConfigError::Validation(
                "Cannot enable both verbose and quiet modes".to_string(),
            ));
        }

        Ok(())
    }

    /// Refuse an output file that resolves to the input file
    pub fn check_output_target(config: &Config, input: &Path) -> Result<()> {
        let Some(output) = config.output.file.as_deref() else {
            return Ok(());
        };

        let same = output == input
            || matches!(
                (std::fs::canonicalize(output), std::fs::canonicalize(input)),
                (Ok(a), Ok(b)) if a == b
            );
        if same {
            return Err(ConfigError::Validation(format!(
                "Refusing to overwrite the input file: {}",
                output.display()
            )));
        }
        Ok(())
    }

    /// Effective verbosity
    pub fn verbosity(config: &Config) -> VerbosityLevel {
        if config.output.quiet {
            VerbosityLevel::Quiet
        } else if config.output.debug {
            VerbosityLevel::Debug
        } else if config.output.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Render options derived from the configuration
    pub fn render_options(config: &Config) -> RenderOptions {
        RenderOptions {
            spider_name: config.render.spider_name.clone(),
            template: config.render.template.clone(),
        }
    }
}
