// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use crate::app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod language_utils;
mod providers;
mod subtitle_merger;
mod subtitle_processor;
mod text_formatting;
mod translation;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full translate-merge-cleanup pipeline (default command)
    Process(ProcessArgs),

    /// Merge two subtitle files; the first one is the timestamp authority
    Merge {
        /// Subtitle file whose timestamps are kept
        first: PathBuf,

        /// Subtitle file supplying the second text line
        second: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Repair the blank-line structure of a translated subtitle file
    Format {
        /// Input subtitle file
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Strip full-width punctuation from a file or a directory of files
    Strip {
        /// Subtitle file or directory containing subtitle files
        path: PathBuf,
    },

    /// Generate shell completions for subfuse
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Input subtitle file (.srt or .txt)
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Put the original text on top and make it the timestamp authority
    /// (default: the translation is on top)
    #[arg(long)]
    original_on_top: bool,

    /// Number of cues per translation batch
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Keep the per-run intermediate files
    #[arg(short, long)]
    keep_intermediate: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subfuse - bilingual subtitle processing
///
/// Translates a subtitle file with an AI provider and merges the result with
/// the original into one bilingual file, cleaning up punctuation on the way.
#[derive(Parser, Debug)]
#[command(name = "subfuse")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered bilingual subtitle processing")]
#[command(long_about = "subfuse translates a subtitle file through an AI provider and merges the
translation with the original into a single bilingual subtitle file.

EXAMPLES:
    subfuse movie.srt                         # Full pipeline with default config
    subfuse --original-on-top movie.srt       # Original text above the translation
    subfuse --chunk-size 50 movie.srt         # Smaller translation batches
    subfuse merge movie.zh.srt movie.en.srt   # Merge two existing files
    subfuse format translated.txt             # Repair model-mangled blocks
    subfuse strip ./subs                      # Punctuation cleanup for a folder
    subfuse completions bash > subfuse.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different file with --config-path. If the config file doesn't exist, a
    default one will be created automatically.

SUPPORTED PROVIDERS:
    deepseek - DeepSeek chat API (requires API key in the config file)
    ollama   - Local Ollama server (default: qwen2.5:14b)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input subtitle file (.srt or .txt)
    #[arg(value_name = "INPUT_FILE")]
    input_file: Option<PathBuf>,

    /// Put the original text on top and make it the timestamp authority
    /// (default: the translation is on top)
    #[arg(long)]
    original_on_top: bool,

    /// Number of cues per translation batch
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Keep the per-run intermediate files
    #[arg(short, long)]
    keep_intermediate: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subfuse", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Process(args)) => run_process(args).await,
        Some(Commands::Merge {
            first,
            second,
            output,
        }) => {
            let controller = Controller::with_config(load_config_lenient("conf.json")?);
            controller.run_merge(&first, &second, output.as_deref())?;
            Ok(())
        }
        Some(Commands::Format { input, output }) => {
            let controller = Controller::with_config(load_config_lenient("conf.json")?);
            controller.run_format(&input, output.as_deref())?;
            Ok(())
        }
        Some(Commands::Strip { path }) => {
            let controller = Controller::with_config(load_config_lenient("conf.json")?);
            controller.run_strip(&path)
        }
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_file = cli
                .input_file
                .ok_or_else(|| anyhow!("INPUT_FILE is required when no subcommand is specified"))?;

            let process_args = ProcessArgs {
                input_file,
                original_on_top: cli.original_on_top,
                chunk_size: cli.chunk_size,
                keep_intermediate: cli.keep_intermediate,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_process(process_args).await
        }
    }
}

async fn run_process(options: ProcessArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if options.original_on_top {
        config.pipeline.translation_on_top = false;
    }

    if let Some(chunk_size) = options.chunk_size {
        config.pipeline.chunk_size = chunk_size;
    }

    if options.keep_intermediate {
        config.pipeline.keep_intermediate = true;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller and run the pipeline
    let controller = Controller::with_config(config);
    controller.run_pipeline(&options.input_file).await?;

    Ok(())
}

/// Load the config for the standalone subcommands, which need no provider
/// credentials: a missing or unreadable file falls back to defaults instead
/// of being created or rejected.
fn load_config_lenient(config_path: &str) -> Result<Config> {
    if !Path::new(config_path).exists() {
        return Ok(Config::default());
    }

    let file = File::open(config_path)
        .context(format!("Failed to open config file: {}", config_path))?;
    let reader = BufReader::new(file);
    let config: Config = serde_json::from_reader(reader)
        .context(format!("Failed to parse config file: {}", config_path))?;

    log::set_max_level(level_filter(&config.log_level));
    Ok(config)
}
