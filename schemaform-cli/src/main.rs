//! # schemaform
//!
//! CLI tool that turns class definition files into a form schema document.
//!
//! ## Usage
//!
//! ```bash
//! # Describe every class under the current directory
//! schemaform generate
//!
//! # Read definitions from ./effects and write to ./web/schemas
//! schemaform generate --input ./effects --output ./web/schemas
//!
//! # Convert a single class without the registry selector
//! schemaform generate --class rainbow
//!
//! # Watch mode for development
//! schemaform generate --watch
//!
//! # Initialize configuration
//! schemaform init
//!
//! # Check that a generated document is up to date
//! schemaform validate --path ./generated/schema.json
//!
//! # A document generated with --compact is checked with the same flag
//! schemaform validate --path ./generated/schema.json --compact
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use schemaform_cli::{
    config::{CliArgs, Config, ConfigManager, OutputOverrides, LOG_ENV},
    error::CliError,
    generator::{BuildOptions, GeneratedOutput, SchemaGenerator},
    watcher::FileWatcher,
    writer::{FileWriter, OutputStatus, WriteResult},
};

#[derive(Parser)]
#[command(name = "schemaform")]
#[command(author, version, about = "Generate form schemas from validation class definitions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the form schema document from class definition files
    Generate {
        /// Directory containing class definition files
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory for the generated document
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Convert only this class, without the registry selector
        #[arg(long)]
        class: Option<String>,

        /// Filter definition files by relative path (glob)
        #[arg(long)]
        filter: Option<String>,

        /// Watch for file changes and regenerate
        #[arg(short, long)]
        watch: bool,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        overrides: OutputOverrides,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize a new schemaform configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "schemaform.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Validate that a generated document is up-to-date
    Validate {
        /// Path to the generated document
        #[arg(short, long)]
        path: PathBuf,

        /// Directory containing class definition files
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// The document was generated for this class only
        #[arg(long)]
        class: Option<String>,

        #[command(flatten)]
        overrides: OutputOverrides,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Options shared by one generation run.
struct RunOptions<'a> {
    filter: Option<&'a str>,
    class: Option<&'a str>,
    dry_run: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            match e {
                CliError::Validation(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            input,
            output,
            class,
            filter,
            watch,
            dry_run,
            overrides,
            config,
        } => {
            let args = overrides.apply(CliArgs {
                input,
                output,
                ..Default::default()
            });
            let config = load_config(config.as_deref(), &args)?;
            let options = RunOptions {
                filter: filter.as_deref(),
                class: class.as_deref(),
                dry_run,
            };

            if watch {
                run_watch_mode(&config, &options)
            } else {
                run_generate(&config, &options)
            }
        }

        Commands::Init { output, force } => {
            init_tracing(&Config::default().logging.level);
            cmd_init(output, force)
        }

        Commands::Validate {
            path,
            input,
            class,
            overrides,
            config,
        } => {
            let args = overrides.apply(CliArgs {
                input,
                ..Default::default()
            });
            let config = load_config(config.as_deref(), &args)?;
            cmd_validate(&path, &config, class.as_deref())
        }
    }
}

/// Load the config file, apply overrides and start logging.
fn load_config(path: Option<&Path>, args: &CliArgs) -> Result<Config, CliError> {
    let config = ConfigManager::merge_cli_args(ConfigManager::load(path)?, args);
    init_tracing(&config.logging.level);
    Ok(config)
}

/// Install the log subscriber. `SCHEMAFORM_LOG` wins over the configured
/// level; a failure only disables logging.
fn init_tracing(level: &str) {
    if let Err(error) = try_init_tracing(level) {
        eprintln!("{} {}", "Warning:".yellow(), error);
    }
}

fn try_init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .map_err(|error| anyhow::anyhow!("invalid log level '{level}': {error}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Scan, load and convert. `None` means there was nothing to describe.
fn build(config: &Config, options: &RunOptions<'_>) -> Result<Option<GeneratedOutput>, CliError> {
    let output = SchemaGenerator::new(config.clone()).build(BuildOptions {
        filter: options.filter,
        class: options.class,
    })?;

    if let Some(ref output) = output {
        println!(
            "  Found {} definition file(s)",
            output.sources.len().to_string().green()
        );
    }
    Ok(output)
}

/// Run schema generation once.
fn run_generate(config: &Config, options: &RunOptions<'_>) -> Result<(), CliError> {
    println!("{}", "Scanning for class definitions...".cyan());

    let Some(output) = build(config, options)? else {
        println!("{}", "No class definitions found.".yellow());
        return Ok(());
    };

    println!(
        "  Described {} class(es): {}",
        output.classes.len().to_string().green(),
        output.classes.join(", ")
    );

    let writer = FileWriter::new(options.dry_run);
    match writer.write(&config.output_path(), &output.content)? {
        WriteResult::Written { path, bytes } => {
            println!(
                "{} Written {} bytes to {}",
                "✓".green(),
                bytes,
                path.display()
            );
        }
        WriteResult::Unchanged { path } => {
            println!("{} {} is up-to-date", "✓".green(), path.display());
        }
        WriteResult::DryRun { content, path } => {
            println!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            println!("{}", "─".repeat(60).dimmed());
            print!("{}", content);
            println!("{}", "─".repeat(60).dimmed());
        }
    }

    Ok(())
}

/// Run in watch mode.
fn run_watch_mode(config: &Config, options: &RunOptions<'_>) -> Result<(), CliError> {
    println!("{}", "Starting watch mode...".cyan());
    println!("  Watching: {}", config.input.dir.display());
    println!("  Press Ctrl+C to stop\n");

    if let Err(e) = run_generate(config, options) {
        println!("{} {}", "Generation error:".red(), e);
    }

    let watcher = FileWatcher::new(&config.input.dir).with_extensions(&config.input.extensions);
    let (_debouncer, rx) = watcher.watch()?;
    let output_path = config.output_path();

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(event) = rx.recv() {
        if let Some(message) = event.error_message() {
            println!("{} {}", "Watch error:".red(), message);
            continue;
        }

        // Writing the output must not trigger another run
        if event
            .path()
            .is_some_and(|path| is_same_file(path, &output_path))
        {
            continue;
        }

        if let Some(path) = event.path() {
            println!("\n{} {}", "File changed:".cyan(), path.display());
        }

        if let Err(e) = run_generate(config, options) {
            println!("{} {}", "Generation error:".red(), e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!(
            "{} Configuration file already exists: {}",
            "Error:".red(),
            output.display()
        );
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(
            "Configuration file already exists".to_string(),
        ));
    }

    std::fs::write(&output, ConfigManager::default_config_content())?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Validate command implementation.
fn cmd_validate(path: &Path, config: &Config, class: Option<&str>) -> Result<(), CliError> {
    println!("{}", "Validating form schema...".cyan());

    if !path.exists() {
        return Err(CliError::Validation(format!(
            "Schema file not found: {}",
            path.display()
        )));
    }

    let options = RunOptions {
        filter: None,
        class,
        dry_run: true,
    };
    let Some(output) = build(config, &options)? else {
        return Err(CliError::Validation(format!(
            "No class definitions found in {}",
            config.input.dir.display()
        )));
    };

    match FileWriter::status(path, &output.content) {
        OutputStatus::UpToDate => {
            println!("{} Form schema is up-to-date", "✓".green());
            Ok(())
        }
        OutputStatus::Stale | OutputStatus::Missing => {
            println!("{} Form schema is out of date", "✗".red());
            println!("  Run 'schemaform generate' to update");
            Err(CliError::Validation("Form schema is out of date".to_string()))
        }
    }
}

fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
