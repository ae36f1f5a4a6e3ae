//! Configuration management for the CLI.
//!
//! Configuration comes from an optional `schemaform.toml` and is then
//! overridden by command-line arguments.

use crate::error::{CliResult, ConfigError};
use schemaform::{ConverterConfig, DuplicateKeyPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "schemaform.toml";

/// Environment variable holding a tracing filter; wins over `[logging] level`.
pub const LOG_ENV: &str = "SCHEMAFORM_LOG";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where class definitions are read from.
    pub input: InputConfig,

    /// Where the form schema is written.
    pub output: OutputConfig,

    /// Converter settings.
    pub conversion: ConversionConfig,

    /// Log settings.
    pub logging: LoggingConfig,

    /// File this configuration was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Input configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory scanned for class definition files.
    pub dir: PathBuf,

    /// File extensions treated as definitions.
    pub extensions: Vec<String>,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for the generated document.
    pub dir: PathBuf,

    /// Output filename.
    pub file: String,

    /// Pretty-print the JSON.
    pub pretty: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// What to do with repeated keys inside one mapping.
    pub duplicate_keys: DuplicateKeyPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Tracing filter used when `SCHEMAFORM_LOG` is unset.
    pub level: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            extensions: vec!["toml".to_string(), "json".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./generated"),
            file: "schema.json".to_string(),
            pretty: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Full path of the output document.
    pub fn output_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.file)
    }

    /// Files under the input directory that are never class definitions:
    /// the generated document and the configuration file.
    pub fn excluded_paths(&self) -> Vec<PathBuf> {
        std::iter::once(self.output_path())
            .chain(self.source.clone())
            .collect()
    }

    /// Converter settings for the library.
    pub fn converter_config(&self) -> ConverterConfig {
        ConverterConfig::new().with_duplicate_keys(self.conversion.duplicate_keys)
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.extensions.is_empty() {
            return Err(ConfigError::invalid_value(
                "input.extensions",
                "at least one extension is required",
            ));
        }
        if self.output.file.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "output.file",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without a path, `schemaform.toml` in the working directory is used if
    /// it exists and defaults otherwise. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
                .into());
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(CONFIG_FILENAME),
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let mut config = Self::parse(&content, config_path.clone())?;
        config.source = Some(config_path);
        Ok(config)
    }

    /// Parse configuration text; `path` is only used in errors.
    pub fn parse(content: &str, path: PathBuf) -> CliResult<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::invalid_toml(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref input) = args.input {
            config.input.dir = input.clone();
        }

        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(ref file) = args.output_file {
            config.output.file = file.clone();
        }

        if let Some(pretty) = args.pretty {
            config.output.pretty = pretty;
        }

        if let Some(policy) = args.duplicate_keys {
            config.conversion.duplicate_keys = policy;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# schemaform configuration file

[input]
# Directory scanned (recursively) for class definition files
dir = "."

# File extensions read as class definitions
extensions = ["toml", "json"]

[output]
# Output directory for the generated form schema
dir = "./generated"

# Output file name
file = "schema.json"

# Pretty-print the generated JSON
pretty = true

[conversion]
# Repeated keys inside one mapping: "overwrite" keeps the later entry,
# "reject" fails the conversion
duplicate_keys = "overwrite"

[logging]
# Log filter (error, warn, info, debug, trace); SCHEMAFORM_LOG takes precedence
level = "warn"
"#
    }
}

/// Overrides that change the generated document, shared by `generate` and
/// `validate` so both build the same output.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct OutputOverrides {
    /// Write compact JSON
    #[arg(long)]
    pub compact: bool,

    /// Fail on repeated keys inside a mapping
    #[arg(long)]
    pub reject_duplicates: bool,
}

impl OutputOverrides {
    /// Fold the flags into `args`; unset flags leave the config value alone.
    pub fn apply(&self, args: CliArgs) -> CliArgs {
        CliArgs {
            pretty: self.compact.then_some(false).or(args.pretty),
            duplicate_keys: self
                .reject_duplicates
                .then_some(DuplicateKeyPolicy::Reject)
                .or(args.duplicate_keys),
            ..args
        }
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Input directory override.
    pub input: Option<PathBuf>,

    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Output filename override.
    pub output_file: Option<String>,

    /// Pretty-print override.
    pub pretty: Option<bool>,

    /// Duplicate key policy override.
    pub duplicate_keys: Option<DuplicateKeyPolicy>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.dir, PathBuf::from("."));
        assert_eq!(config.input.extensions, vec!["toml", "json"]);
        assert_eq!(config.output.dir, PathBuf::from("./generated"));
        assert_eq!(config.output.file, "schema.json");
        assert!(config.output.pretty);
        assert_eq!(config.conversion.duplicate_keys, DuplicateKeyPolicy::Overwrite);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_default_content_matches_defaults() {
        let parsed = ConfigManager::parse(
            ConfigManager::default_config_content(),
            PathBuf::from(CONFIG_FILENAME),
        )
        .unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.input.dir, defaults.input.dir);
        assert_eq!(parsed.input.extensions, defaults.input.extensions);
        assert_eq!(parsed.output_path(), defaults.output_path());
        assert_eq!(parsed.output.pretty, defaults.output.pretty);
        assert_eq!(
            parsed.conversion.duplicate_keys,
            defaults.conversion.duplicate_keys
        );
        assert_eq!(parsed.logging.level, defaults.logging.level);
    }

    #[test]
    fn test_merge_cli_args_output() {
        let config = Config::default();
        let args = CliArgs {
            output: Some(PathBuf::from("./custom")),
            duplicate_keys: Some(DuplicateKeyPolicy::Reject),
            ..Default::default()
        };

        let merged = ConfigManager::merge_cli_args(config, &args);
        assert_eq!(merged.output.dir, PathBuf::from("./custom"));
        assert_eq!(merged.conversion.duplicate_keys, DuplicateKeyPolicy::Reject);
    }

    #[test]
    fn test_merge_cli_args_preserves_unset() {
        let config = Config::default();
        let args = CliArgs::default();

        let merged = ConfigManager::merge_cli_args(config.clone(), &args);
        assert_eq!(merged.input.dir, config.input.dir);
        assert_eq!(merged.output.dir, config.output.dir);
        assert_eq!(merged.output.file, config.output.file);
    }

    #[test]
    fn test_output_overrides() {
        let overrides = OutputOverrides {
            compact: true,
            reject_duplicates: true,
        };
        let args = overrides.apply(CliArgs {
            input: Some(PathBuf::from("defs")),
            ..Default::default()
        });
        assert_eq!(args.input, Some(PathBuf::from("defs")));
        assert_eq!(args.pretty, Some(false));
        assert_eq!(args.duplicate_keys, Some(DuplicateKeyPolicy::Reject));

        let args = OutputOverrides::default().apply(CliArgs::default());
        assert_eq!(args.pretty, None);
        assert_eq!(args.duplicate_keys, None);
    }

    #[test]
    fn test_loaded_config_excludes_itself_and_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, ConfigManager::default_config_content()).unwrap();

        let config = ConfigManager::load(Some(&path)).unwrap();
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert_eq!(
            config.excluded_paths(),
            vec![PathBuf::from("./generated/schema.json"), path]
        );
        assert_eq!(
            Config::default().excluded_paths(),
            vec![PathBuf::from("./generated/schema.json")]
        );
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[input]
dir = "./effects"
extensions = ["json"]

[output]
dir = "./web/schemas"
file = "effects.json"
pretty = false

[conversion]
duplicate_keys = "reject"

[logging]
level = "debug"
"#;

        let config = ConfigManager::parse(toml, PathBuf::from("test.toml")).unwrap();
        assert_eq!(config.input.dir, PathBuf::from("./effects"));
        assert_eq!(config.input.extensions, vec!["json"]);
        assert_eq!(config.output_path(), PathBuf::from("./web/schemas/effects.json"));
        assert!(!config.output.pretty);
        assert_eq!(
            config.converter_config().duplicate_keys,
            DuplicateKeyPolicy::Reject
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config =
            ConfigManager::parse("[output]\npretty = false\n", PathBuf::from("test.toml")).unwrap();
        assert!(!config.output.pretty);
        assert_eq!(config.output.file, "schema.json");
        assert_eq!(config.input.extensions, vec!["toml", "json"]);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result = ConfigManager::parse(
            "[conversion]\nduplicate_keys = \"merge\"\n",
            PathBuf::from("test.toml"),
        );
        assert!(matches!(
            result,
            Err(CliError::Config(ConfigError::InvalidToml { .. }))
        ));
    }

    #[test]
    fn test_empty_extensions_are_rejected() {
        let result = ConfigManager::parse("[input]\nextensions = []\n", PathBuf::from("test.toml"));
        match result {
            Err(CliError::Config(ConfigError::InvalidValue { key, .. })) => {
                assert_eq!(key, "input.extensions")
            }
            other => panic!("expected an invalid value error, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let result = ConfigManager::load(Some(Path::new("/nonexistent/schemaform.toml")));
        assert!(matches!(
            result,
            Err(CliError::Config(ConfigError::NotFound { .. }))
        ));
    }
}
